//! src/webhook/client.rs

use std::time::Duration;

use reqwest::header::{HeaderMap, CONTENT_TYPE, LOCATION};
use reqwest::{redirect, Client, StatusCode};
use url::Url;

use crate::utils::error_helpers::error_chain_fmt;

/// Redirects followed after the initial POST, so at most four calls per forward.
pub const MAX_REDIRECT_HOPS: usize = 3;

#[derive(thiserror::Error)]
pub enum ForwardError {
    #[error("Failed to reach the webhook")]
    Transport(#[from] reqwest::Error),

    #[error("The configured webhook URL is not a valid absolute URL")]
    InvalidUrl(#[source] url::ParseError),

    #[error("The webhook redirected to an invalid location: {location}")]
    InvalidLocation {
        location: String,
        #[source]
        source: url::ParseError,
    },
}

impl std::fmt::Debug for ForwardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// A fully read reply from the webhook.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl UpstreamResponse {
    async fn read(response: reqwest::Response) -> Self {
        let status = response.status();
        let headers = response.headers().clone();
        // An unreadable body is reported as empty rather than failing the forward.
        let body = response.text().await.unwrap_or_default();
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn too_many_redirects() -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            headers: HeaderMap::new(),
            body: "Too many redirects".into(),
        }
    }

    /// Value of header `name`, or `""` when absent or not valid UTF-8.
    pub fn header(&self, name: impl reqwest::header::AsHeaderName) -> &str {
        self.headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
    }

    pub fn location(&self) -> Option<&str> {
        Some(self.header(LOCATION)).filter(|location| !location.is_empty())
    }

    pub fn is_redirect(&self) -> bool {
        matches!(
            self.status,
            StatusCode::MOVED_PERMANENTLY
                | StatusCode::FOUND
                | StatusCode::SEE_OTHER
                | StatusCode::TEMPORARY_REDIRECT
                | StatusCode::PERMANENT_REDIRECT
        )
    }

    /// 307 and 308 require the method and body to be replayed.
    fn preserves_method(&self) -> bool {
        matches!(
            self.status,
            StatusCode::TEMPORARY_REDIRECT | StatusCode::PERMANENT_REDIRECT
        )
    }
}

/// Posts JSON payloads to the waitlist webhook.
///
/// Apps Script Web Apps answer a POST with a 302 pointing at the rendered
/// output. The script has already run by then, so the result is fetched with
/// a GET. 307/308 keep the method and the POST is replayed instead.
pub struct WebhookClient {
    // Never follows redirects, each hop is handled by `forward`.
    http_client: Client,
    // Used for the final GET; follows redirects like a browser would.
    fetch_client: Client,
}

impl WebhookClient {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            http_client: Client::builder()
                .timeout(timeout)
                .redirect(redirect::Policy::none())
                .build()?,
            fetch_client: Client::builder().timeout(timeout).build()?,
        })
    }

    #[tracing::instrument(name = "Forwarding a submission to the webhook", skip(self, url, payload))]
    pub async fn forward(
        &self,
        url: &str,
        payload: String,
    ) -> Result<UpstreamResponse, ForwardError> {
        let mut current_url = Url::parse(url).map_err(ForwardError::InvalidUrl)?;
        let mut last_response = None;

        for hop in 0..=MAX_REDIRECT_HOPS {
            let response = self
                .http_client
                .post(current_url.clone())
                .header(CONTENT_TYPE, "application/json")
                .body(payload.clone())
                .send()
                .await?;
            let response = UpstreamResponse::read(response).await;

            tracing::debug!(hop, status = response.status.as_u16(), "Webhook replied");

            if !response.is_redirect() {
                return Ok(response);
            }

            let location = match response.location() {
                Some(location) => location.to_string(),
                None => return Ok(response),
            };

            if response.preserves_method() {
                last_response = Some(response);
                if hop < MAX_REDIRECT_HOPS {
                    current_url = resolve(&current_url, location)?;
                }
                continue;
            }

            let result_url = resolve(&current_url, location)?;
            tracing::debug!(hop, "Fetching the webhook result with GET");
            let response = self.fetch_client.get(result_url).send().await?;
            return Ok(UpstreamResponse::read(response).await);
        }

        tracing::warn!("Gave up after {} webhook redirects", MAX_REDIRECT_HOPS);
        Ok(last_response.unwrap_or_else(UpstreamResponse::too_many_redirects))
    }
}

fn resolve(base: &Url, location: String) -> Result<Url, ForwardError> {
    base.join(&location)
        .map_err(|source| ForwardError::InvalidLocation { location, source })
}
