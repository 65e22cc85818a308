use serde::{Deserialize, Deserializer};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub server: ServerSettings,
    pub auth_service: ServiceEndpoint,
    pub product_service: ServiceEndpoint,
    pub calculator_service: ServiceEndpoint,
    pub account_service: ServiceEndpoint,
    pub profile_service: ServiceEndpoint,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Base URL of one backend service, e.g. `http://localhost:8081`.
#[derive(Deserialize, Clone, Debug)]
pub struct ServiceEndpoint {
    pub url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub timeout_secs: u64,
}

impl ServiceEndpoint {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout_secs: default_request_timeout_secs(),
        }
    }

    /// Joins `path` onto the base URL without doubling the slash.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_request_timeout_secs() -> u64 {
    30
}

#[derive(Deserialize, Clone, Debug)]
pub struct SessionSettings {
    /// File backing the persistent session keys. In-memory when unset.
    #[serde(default)]
    pub storage_path: Option<PathBuf>,
    /// Period of the proactive token refresh. Must be at least one second.
    #[serde(
        default = "default_refresh_interval_secs",
        deserialize_with = "non_zero_secs"
    )]
    pub refresh_interval_secs: u64,
    /// How long an anonymous calculator result may wait for a login.
    #[serde(default = "default_pending_calculation_ttl_secs")]
    pub pending_calculation_ttl_secs: u64,
}

impl SessionSettings {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn pending_calculation_ttl(&self) -> Duration {
        Duration::from_secs(self.pending_calculation_ttl_secs)
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            storage_path: None,
            refresh_interval_secs: default_refresh_interval_secs(),
            pending_calculation_ttl_secs: default_pending_calculation_ttl_secs(),
        }
    }
}

fn default_refresh_interval_secs() -> u64 {
    9 * 60
}

fn default_pending_calculation_ttl_secs() -> u64 {
    30 * 60
}

fn non_zero_secs<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match u64::deserialize(deserializer)? {
        0 => Err(serde::de::Error::custom("interval must be at least 1 second")),
        secs => Ok(secs),
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct TelemetrySettings {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// OTLP collector, e.g. `http://tempo:4317`. Export is disabled when unset.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            otlp_endpoint: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| config::ConfigError::Message(format!("cannot read current dir: {}", e)))?;

    // Run either from the workspace root or from inside fd-portal
    let configuration_directory = if base_path.ends_with("fd-portal") {
        base_path.join("config")
    } else {
        base_path.join("fd-portal").join("config")
    };

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")).required(true))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
