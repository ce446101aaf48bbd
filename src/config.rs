use secrecy::{ExposeSecret, Secret};
use serde_aux::prelude::deserialize_number_from_string;

/// Conventional variable holding the webhook URL, honoured on top of the
/// `APP_WAITLIST__WEBHOOK_URL` override.
pub const WEBHOOK_URL_ENV: &str = "WAITLIST_WEBHOOK_URL";

pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other,
            )),
        }
    }
}

#[derive(serde::Deserialize, Clone)]
pub struct AppConfig {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

#[derive(serde::Deserialize, Clone)]
pub struct WaitlistSettings {
    #[serde(default)]
    pub webhook_url: Option<Secret<String>>,
    pub source: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_ms: u64,
}

impl WaitlistSettings {
    /// The upstream webhook, if one is configured. Blank values count as unset.
    pub fn webhook_url(&self) -> Option<&str> {
        self.webhook_url
            .as_ref()
            .map(|url| url.expose_secret().trim())
            .filter(|url| !url.is_empty())
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_ms)
    }
}

#[derive(serde::Deserialize, Clone)]
pub struct Configuration {
    pub app: AppConfig,
    pub waitlist: WaitlistSettings,
}

pub fn get_configuration() -> Result<Configuration, config::ConfigError> {
    // initialize our configuration reader
    let mut settings = config::Config::default();

    let base_path = std::env::current_dir().expect("Failed to determine the current directory");
    let configuration_directory = base_path.join("configuration");

    // Read in default configuration
    settings.merge(config::File::from(configuration_directory.join("base")).required(true))?;

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .expect("Failed to parse APP_ENVIRONMENT");

    // Read in layer environment specific file.
    settings.merge(
        config::File::from(configuration_directory.join(environment.as_str())).required(true),
    )?;

    // e.g. `APP_APP__PORT=5001` sets `app.port`.
    settings.merge(config::Environment::with_prefix("app").separator("__"))?;

    if let Ok(webhook_url) = std::env::var(WEBHOOK_URL_ENV) {
        settings.set("waitlist.webhook_url", webhook_url)?;
    }

    // try converting settings into `Configuration` object.
    settings.try_into()
}
