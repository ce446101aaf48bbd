use waitlist::config::get_configuration;
use waitlist::startup::AppServer;
use waitlist::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    init_subscriber(get_subscriber(
        "waitlist".into(),
        "info".into(),
        std::io::stdout,
    ))?;

    let configuration = get_configuration()?;
    if configuration.waitlist.webhook_url().is_none() {
        tracing::warn!("No webhook URL configured, submissions will be rejected with a 500");
    }

    let server = AppServer::build(configuration).await?;
    server.run_until_stopped().await?;

    Ok(())
}
