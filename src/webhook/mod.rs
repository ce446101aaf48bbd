mod client;

pub use client::{ForwardError, UpstreamResponse, WebhookClient, MAX_REDIRECT_HOPS};
