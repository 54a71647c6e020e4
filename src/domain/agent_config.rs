use serde::{Deserialize, Serialize};

/// Connection settings for the hosted query agent. Built once at session
/// start and read-only afterwards; the API key is never logged.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct AgentConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    /// Upper bound on a single agent request, in seconds.
    pub timeout_secs: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o".to_string(),
            api_key: None,
            max_tokens: Some(1024),
            temperature: Some(0.2),
            timeout_secs: 60,
        }
    }
}
