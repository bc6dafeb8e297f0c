use crate::errors::{AppError, Result};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub latency: LatencyConfig,
    pub webhooks: WebhookConfig,
    #[serde(default)]
    pub fixtures: FixtureConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding the built front end, served for any unmatched path
    #[serde(default)]
    pub static_dir: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LatencyConfig {
    pub enabled: bool,
    /// Multiplier applied to every simulated delay
    pub scale: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
    pub success_probability: f64,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FixtureConfig {
    /// Overrides the bundled fixtures with `<directory>/<entity>.json` where present
    #[serde(default)]
    pub directory: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    pub log_level: String,
    pub log_format: String,
    pub metrics_enabled: bool,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let environment = env::var("APPFORGE_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(
                config::File::with_name(&format!("config/{}", environment)).required(false),
            )
            // e.g., APPFORGE__SERVER__PORT=8080
            .add_source(
                config::Environment::with_prefix("APPFORGE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::Configuration(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::Configuration(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(AppError::Configuration("Invalid port number".to_string()));
        }

        if !self.latency.scale.is_finite() || self.latency.scale < 0.0 {
            return Err(AppError::Configuration(
                "Latency scale must be a non-negative number".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.webhooks.success_probability) {
            return Err(AppError::Configuration(
                "Webhook success probability must be between 0 and 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        let mut config = Config::load().expect("Failed to load config");
        assert!(config.validate().is_ok());

        config.server.port = 0;
        assert!(config.validate().is_err());
        config.server.port = 4000;

        config.latency.scale = -1.0;
        assert!(config.validate().is_err());
        config.latency.scale = 1.0;

        config.webhooks.success_probability = 1.5;
        assert!(config.validate().is_err());
    }
}
