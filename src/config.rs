use crate::error::{GenerationError, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/generate";
pub const DEFAULT_ALERT_DISMISS_MS: u64 = 5000;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub endpoint: String,
    pub settings_path: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub alert_dismiss_after: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            settings_path: None,
            output_dir: None,
            alert_dismiss_after: Duration::from_millis(DEFAULT_ALERT_DISMISS_MS),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let endpoint = env::var("FLUX_API_ENDPOINT")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let settings_path = env::var("FLUX_SETTINGS_PATH").ok().map(PathBuf::from);
        let output_dir = env::var("FLUX_OUTPUT_DIR").ok().map(PathBuf::from);
        let alert_dismiss_after = env::var("FLUX_ALERT_DISMISS_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_millis(DEFAULT_ALERT_DISMISS_MS));

        ClientConfig {
            endpoint,
            settings_path,
            output_dir,
            alert_dismiss_after,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_settings_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings_path = Some(path.into());
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn with_alert_dismiss_after(mut self, after: Duration) -> Self {
        self.alert_dismiss_after = after;
        self
    }

    /// `<config dir>/fluxgen/settings.json` unless overridden.
    pub fn resolved_settings_path(&self) -> PathBuf {
        self.settings_path.clone().unwrap_or_else(|| {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("fluxgen")
                .join("settings.json")
        })
    }

    pub fn resolved_output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn endpoint_url(&self) -> Result<reqwest::Url> {
        reqwest::Url::parse(&self.endpoint).map_err(|e| {
            GenerationError::Config(format!("Invalid endpoint '{}': {}", self.endpoint, e))
        })
    }

    /// Scheme, host and port of the endpoint, used to name the backend in
    /// connection error messages.
    pub fn backend_origin(&self) -> String {
        match self.endpoint_url() {
            Ok(url) => url.origin().ascii_serialization(),
            Err(_) => self.endpoint.clone(),
        }
    }
}
