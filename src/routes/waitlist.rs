use std::fmt::Formatter;

use actix_web::body::BoxBody;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use anyhow::Context;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::{ALLOW, CONTENT_TYPE, LOCATION};

use crate::config::WaitlistSettings;
use crate::domain::{Submission, SubscriberEmail};
use crate::utils::error_helpers::error_chain_fmt;
use crate::webhook::{UpstreamResponse, WebhookClient};

/// Upper bound, in characters, on the upstream body echoed back as `detail`.
pub const DETAIL_LIMIT: usize = 2000;

pub const APPS_SCRIPT_HINT: &str = "Apps Script is allowing GET/HEAD only. \
    Ensure your Apps Script has a doPost(e) handler and that you re-deploy a new \
    Web App version (Execute as: Me, access: Anyone).";

static HTML_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<html").expect("html pattern is valid"));

#[derive(thiserror::Error)]
pub enum WaitlistError {
    #[error("WAITLIST_WEBHOOK_URL is not set")]
    ConfigurationError,

    #[error("Invalid JSON")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Invalid email")]
    InvalidEmail,

    #[error("{}", .0.error)]
    UpstreamError(UpstreamFailure),

    #[error("Failed to reach the waitlist webhook")]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for WaitlistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

#[derive(serde::Serialize)]
struct ErrorBody {
    error: String,
}

impl ResponseError for WaitlistError {
    fn status_code(&self) -> StatusCode {
        match self {
            WaitlistError::ConfigurationError | WaitlistError::UnexpectedError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            WaitlistError::InvalidJson(_) | WaitlistError::InvalidEmail => StatusCode::BAD_REQUEST,
            WaitlistError::UpstreamError(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        let mut response = HttpResponse::build(self.status_code());
        match self {
            WaitlistError::UpstreamError(failure) => response.json(failure),
            _ => response.json(ErrorBody {
                error: self.to_string(),
            }),
        }
    }
}

/// Diagnostics returned to the caller when the webhook did not record the signup.
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamFailure {
    pub error: &'static str,
    pub status: u16,
    pub content_type: String,
    pub allow: String,
    pub location: String,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'static str>,
}

fn looks_like_html(content_type: &str, body: &str) -> bool {
    content_type.contains("text/html") || HTML_TAG.is_match(body)
}

/// Decides whether the webhook accepted the submission.
///
/// Apps Script answers with an HTML error page, sometimes under a 200, when the
/// deployment has no `doPost` handler, so a 2xx alone is not enough.
pub fn classify(response: &UpstreamResponse) -> Result<(), UpstreamFailure> {
    let content_type = response.header(CONTENT_TYPE);
    let is_html = looks_like_html(content_type, &response.body);

    let error = if !response.status.is_success() {
        "Upstream error"
    } else if is_html {
        "Upstream returned HTML (likely Apps Script error page)"
    } else {
        return Ok(());
    };

    let hint = (is_html && response.status.as_u16() == 405).then(|| APPS_SCRIPT_HINT);

    Err(UpstreamFailure {
        error,
        status: response.status.as_u16(),
        content_type: content_type.to_string(),
        allow: response.header(ALLOW).to_string(),
        location: response.header(LOCATION).to_string(),
        detail: response.body.chars().take(DETAIL_LIMIT).collect(),
        hint,
    })
}

fn parse_email(body: &[u8]) -> Result<SubscriberEmail, WaitlistError> {
    let body: serde_json::Value =
        serde_json::from_slice(body).map_err(WaitlistError::InvalidJson)?;
    let email = body
        .get("email")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default();

    SubscriberEmail::parse(email.to_string()).map_err(|_| WaitlistError::InvalidEmail)
}

#[tracing::instrument(
    name = "Adding a new waitlist signup",
    skip(body, settings, webhook_client),
    fields(subscriber_email = tracing::field::Empty)
)]
pub async fn join_waitlist(
    body: web::Bytes,
    settings: web::Data<WaitlistSettings>,
    webhook_client: web::Data<WebhookClient>,
) -> Result<HttpResponse, WaitlistError> {
    let webhook_url = settings
        .webhook_url()
        .ok_or(WaitlistError::ConfigurationError)?;

    let email = parse_email(&body)?;
    tracing::Span::current().record("subscriber_email", &tracing::field::display(&email));

    let payload = Submission::new(email, settings.source.as_str())
        .to_json()
        .context("Failed to serialize the submission")?;

    let upstream = webhook_client
        .forward(webhook_url, payload)
        .await
        .context("Failed to forward the submission to the webhook")?;

    classify(&upstream).map_err(|failure| {
        tracing::warn!(
            status = failure.status,
            content_type = %failure.content_type,
            "The webhook rejected the submission: {}",
            failure.error,
        );
        WaitlistError::UpstreamError(failure)
    })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "ok": true })))
}
