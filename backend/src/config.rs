use std::env;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("alert channel is partially configured; {0} is missing")]
    PartialAlertConfig(&'static str),
}

/// Immutable process-wide configuration, read from the environment once at
/// startup and passed explicitly into the app.
#[derive(Clone)]
pub struct AppConfig {
    pub bind_address: String,
    pub model_dir: PathBuf,
    pub alert: Option<AlertConfig>,
}

#[derive(Clone)]
pub struct AlertConfig {
    pub endpoint: String,
    pub token: String,
    pub from: String,
    pub to: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT").unwrap_or_else(|_| "8081".to_string());
        let model_dir = env::var("MODEL_DIR").unwrap_or_else(|_| "models".to_string());

        Ok(Self {
            bind_address: format!("{}:{}", host, port),
            model_dir: PathBuf::from(model_dir),
            alert: AlertConfig::from_env()?,
        })
    }
}

impl AlertConfig {
    /// All four ALERT_* variables present enables the channel; none present
    /// disables it; anything in between is a configuration mistake worth
    /// failing on.
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let endpoint = env::var("ALERT_ENDPOINT").ok();
        let token = env::var("ALERT_TOKEN").ok();
        let from = env::var("ALERT_FROM").ok();
        let to = env::var("ALERT_TO").ok();

        match (endpoint, token, from, to) {
            (None, None, None, None) => Ok(None),
            (Some(endpoint), Some(token), Some(from), Some(to)) => Ok(Some(Self {
                endpoint,
                token,
                from,
                to,
            })),
            (endpoint, token, from, _) => {
                let missing = if endpoint.is_none() {
                    "ALERT_ENDPOINT"
                } else if token.is_none() {
                    "ALERT_TOKEN"
                } else if from.is_none() {
                    "ALERT_FROM"
                } else {
                    "ALERT_TO"
                };
                Err(ConfigError::PartialAlertConfig(missing))
            }
        }
    }
}
