use actix_web::{HttpResponse, Responder};
use uuid::Uuid;

pub async fn health_check() -> impl Responder {
    let probe_id = Uuid::new_v4();
    let _span_guard = tracing::debug_span!("Checking service health", %probe_id).entered();

    tracing::debug!("Service is healthy");
    HttpResponse::Ok().finish()
}
