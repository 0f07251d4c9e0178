use serde::{Deserialize, Serialize};

/// Body of the backend's `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub api: Option<String>,
    #[serde(default)]
    pub token_configured: Option<bool>,
    #[serde(default)]
    pub note: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}
