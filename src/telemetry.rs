use anyhow::Context;
use tracing::Subscriber;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};

/// Builds the bunyan-formatted subscriber used by the service and the tests.
///
/// `filter` is the fallback directive when `RUST_LOG` is not set. `sink`
/// receives the JSON lines; tests pass `std::io::sink` to silence them.
pub fn get_subscriber<Sink>(
    name: String,
    filter: String,
    sink: Sink,
) -> impl Subscriber + Send + Sync
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(BunyanFormattingLayer::new(name, sink))
}

/// Installs `subscriber` globally and routes `log` records (actix, reqwest)
/// through it. Must be called at most once per process.
pub fn init_subscriber(subscriber: impl Subscriber + Send + Sync) -> Result<(), anyhow::Error> {
    LogTracer::init().context("Failed to redirect `log` records to tracing")?;
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install the global tracing subscriber")?;
    Ok(())
}
