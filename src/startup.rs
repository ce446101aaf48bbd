use std::net::TcpListener;

use actix_web::dev::Server;
use anyhow::Context;

use crate::config::Configuration;
use crate::run::run;
use crate::webhook::WebhookClient;

pub struct AppServer {
    port: u16,
    address: String,
    server: Server,
}

impl AppServer {
    pub async fn build(configuration: Configuration) -> Result<Self, anyhow::Error> {
        let listener = TcpListener::bind(format!(
            "{}:{}",
            configuration.app.host, configuration.app.port
        ))
        .with_context(|| {
            format!(
                "Failed to bind {}:{}",
                configuration.app.host, configuration.app.port
            )
        })?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Starting service on address: {}", local_addr);

        let webhook_client = WebhookClient::new(configuration.waitlist.timeout())
            .context("Failed to build the webhook HTTP client")?;

        let server = run(listener, webhook_client, configuration.waitlist)?;

        Ok(Self {
            port: local_addr.port(),
            address: configuration.app.host,
            server,
        })
    }

    pub fn to_server_address(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}
