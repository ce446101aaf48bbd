use std::net::TcpListener;

use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use tracing_actix_web::TracingLogger;

use crate::config::WaitlistSettings;
use crate::routes::health::health_check;
use crate::routes::home::home;
use crate::routes::waitlist::join_waitlist;
use crate::webhook::WebhookClient;

pub fn run(
    listener: TcpListener,
    webhook_client: WebhookClient,
    waitlist_settings: WaitlistSettings,
) -> Result<Server, std::io::Error> {
    let webhook_client = web::Data::new(webhook_client);
    let waitlist_settings = web::Data::new(waitlist_settings);

    Ok(HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .route("/", web::get().to(home))
            .route("/health", web::get().to(health_check))
            .route("/api/waitlist", web::post().to(join_waitlist))
            .app_data(webhook_client.clone())
            .app_data(waitlist_settings.clone())
    })
    .listen(listener)?
    .run())
}
