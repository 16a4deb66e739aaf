// Configuration: webhook URLs and client settings, resolved from built-in
// defaults, an optional JSON file in the home directory and environment
// variables (later layers win).

use crate::models::ConfirmStyle;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_ANALYSIS_URL: &str = "https://byte-bees.app.n8n.cloud/webhook-test/GLUCOSE-LEVEL";
pub const DEFAULT_SLOTS_URL: &str = "https://adi440.app.n8n.cloud/webhook-test/GET-SLOTS";
pub const DEFAULT_CONFIRM_URL: &str =
    "https://adi440.app.n8n.cloud/webhook-test/CONFIRM-APPOINTMENT";
pub const DEFAULT_PATIENT_NAME: &str = "John Doe";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const CONFIG_FILE_NAME: &str = ".glucose-relay.json";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a positive number of seconds, got `{value}`")]
    Timeout { var: &'static str, value: String },
    #[error("{var} must be `date` or `slot`, got `{value}`")]
    ConfirmStyle { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub analysis: String,
    pub slots: String,
    pub confirm: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Endpoints {
            analysis: DEFAULT_ANALYSIS_URL.into(),
            slots: DEFAULT_SLOTS_URL.into(),
            confirm: DEFAULT_CONFIRM_URL.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub endpoints: Endpoints,
    pub timeout: Duration,
    pub confirm_style: ConfirmStyle,
    pub default_patient: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            endpoints: Endpoints::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            confirm_style: ConfirmStyle::default(),
            default_patient: DEFAULT_PATIENT_NAME.into(),
        }
    }
}

/// Optional overrides read from `~/.glucose-relay.json`. Every field may
/// be left out.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub analysis_url: Option<String>,
    pub slots_url: Option<String>,
    pub confirm_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub confirm_style: Option<String>,
    pub default_patient: Option<String>,
}

impl FileConfig {
    pub fn read(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let parsed = serde_json::from_str(&data)
            .with_context(|| format!("Invalid JSON in config file {}", path.display()))?;
        Ok(Some(parsed))
    }
}

/// Location of the per-user config file.
pub fn config_path() -> PathBuf {
    let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    dir.join(CONFIG_FILE_NAME)
}

impl Config {
    /// Resolve the config the binary runs with: defaults, then the home
    /// directory file, then the process environment.
    pub fn load() -> Result<Self> {
        let file = FileConfig::read(&config_path())?;
        let config = Config::resolve(file, |key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn resolve<F>(file: Option<FileConfig>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(file) = file {
            if let Some(url) = non_empty(file.analysis_url) {
                config.endpoints.analysis = url;
            }
            if let Some(url) = non_empty(file.slots_url) {
                config.endpoints.slots = url;
            }
            if let Some(url) = non_empty(file.confirm_url) {
                config.endpoints.confirm = url;
            }
            if let Some(secs) = file.timeout_secs {
                config.timeout = parse_timeout("timeout_secs", &secs.to_string())?;
            }
            if let Some(style) = non_empty(file.confirm_style) {
                config.confirm_style = parse_style("confirm_style", &style)?;
            }
            if let Some(name) = non_empty(file.default_patient) {
                config.default_patient = name;
            }
        }

        let var = |key: &str| non_empty(env(key));
        if let Some(url) = var("GLUCOSE_ANALYSIS_URL") {
            config.endpoints.analysis = url;
        }
        if let Some(url) = var("GET_SLOTS_URL") {
            config.endpoints.slots = url;
        }
        if let Some(url) = var("CONFIRM_APPOINTMENT_URL") {
            config.endpoints.confirm = url;
        }
        if let Some(value) = var("RELAY_TIMEOUT_SECS") {
            config.timeout = parse_timeout("RELAY_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = var("CONFIRM_PAYLOAD_STYLE") {
            config.confirm_style = parse_style("CONFIRM_PAYLOAD_STYLE", &value)?;
        }
        if let Some(name) = var("DEFAULT_PATIENT_NAME") {
            config.default_patient = name;
        }

        Ok(config)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_timeout(var: &'static str, value: &str) -> Result<Duration, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::Timeout {
            var,
            value: value.to_string(),
        }),
    }
}

fn parse_style(var: &'static str, value: &str) -> Result<ConfirmStyle, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "date" => Ok(ConfirmStyle::Date),
        "slot" => Ok(ConfirmStyle::Slot),
        _ => Err(ConfigError::ConfirmStyle {
            var,
            value: value.to_string(),
        }),
    }
}
