use once_cell::sync::Lazy;
use secrecy::Secret;
use wiremock::MockServer;

use waitlist::config::{get_configuration, Configuration};
use waitlist::startup::AppServer;
use waitlist::telemetry::{get_subscriber, init_subscriber};

static TRACING: Lazy<()> = Lazy::new(|| {
    let result = if std::env::var("TEST_LOG").is_ok() {
        init_subscriber(get_subscriber("test".into(), "debug".into(), std::io::stdout))
    } else {
        init_subscriber(get_subscriber("test".into(), "debug".into(), std::io::sink))
    };
    result.expect("Failed to initialise test telemetry");
});

/// Path the fake Apps Script deployment listens on.
pub const WEBHOOK_PATH: &str = "/macros/s/deployment/exec";

pub struct TestApp {
    pub addr: String,
    pub port: u16,
    pub webhook_server: MockServer,
    pub api_client: reqwest::Client,
}

impl TestApp {
    pub async fn post_waitlist(&self, body: impl Into<reqwest::Body>) -> reqwest::Response {
        self.api_client
            .post(&format!("{}/api/waitlist", &self.addr))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_email(&self, email: &str) -> reqwest::Response {
        self.post_waitlist(serde_json::json!({ "email": email }).to_string())
            .await
    }

    pub fn webhook_url(&self) -> String {
        format!("{}{}", self.webhook_server.uri(), WEBHOOK_PATH)
    }
}

pub async fn spawn_app() -> TestApp {
    spawn(|configuration, webhook_server| {
        configuration.waitlist.webhook_url = Some(Secret::new(format!(
            "{}{}",
            webhook_server.uri(),
            WEBHOOK_PATH
        )));
    })
    .await
}

pub async fn spawn_app_without_webhook() -> TestApp {
    spawn(|configuration, _| configuration.waitlist.webhook_url = None).await
}

async fn spawn<F>(configure: F) -> TestApp
where
    F: FnOnce(&mut Configuration, &MockServer),
{
    Lazy::force(&TRACING);

    let webhook_server = MockServer::start().await;

    let configuration = {
        let mut c = get_configuration().expect("should load configuration");
        c.app.port = 0;
        c.waitlist.timeout_ms = 500;
        configure(&mut c, &webhook_server);
        c
    };

    let server = AppServer::build(configuration)
        .await
        .expect("should have created server");

    let port = server.port();
    let addr = format!("http://{}", server.to_server_address());
    let _ = tokio::spawn(server.run_until_stopped());

    let api_client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        addr,
        port,
        webhook_server,
        api_client,
    }
}
