use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::domain::agent_config::AgentConfig;
use crate::domain::error::{AppError, Result};

/// Process-wide configuration, assembled once at startup from
/// `analyst.toml` and `ANALYST_`-prefixed environment variables
/// (e.g. `ANALYST_AGENT__API_KEY`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub agent: AgentConfig,

    /// Address the HTTP interface binds to
    pub bind_addr: String,

    /// Directory for staged artifacts; OS temp dir when unset
    pub staging_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            agent: AgentConfig::default(),
            bind_addr: "127.0.0.1:8750".to_string(),
            staging_dir: None,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Figment::new()
            .merge(Toml::file("analyst.toml"))
            .merge(Env::prefixed("ANALYST_").split("__"))
            .extract()
            .map_err(|e| AppError::ValidationError(format!("Invalid configuration: {}", e)))
    }
}
