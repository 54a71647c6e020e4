use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use super::AgentClient;
use crate::domain::agent_config::AgentConfig;
use crate::domain::error::{AppError, Result};
use crate::domain::semantic_model::SemanticModel;

const ANALYST_SYSTEM_PROMPT: &str = "You are an expert data analyst. Generate SQL queries to \
     solve the user's query. Return only the SQL query, enclosed in ```sql ``` and give the \
     final answer.";

/// Agent client for OpenAI-compatible chat-completions endpoints
pub struct OpenAiAgentClient {
    client: reqwest::Client,
}

impl OpenAiAgentClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    fn api_key(config: &AgentConfig) -> Result<String> {
        config
            .api_key
            .clone()
            .ok_or_else(|| AppError::AgentError("Missing API key for query agent".to_string()))
    }
}

impl Default for OpenAiAgentClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AgentClient for OpenAiAgentClient {
    async fn ask(
        &self,
        config: &AgentConfig,
        semantic_model: &SemanticModel,
        question: &str,
    ) -> Result<String> {
        let api_key = Self::api_key(config)?;
        let url = endpoint_url(&config.base_url);
        let body = build_body(config, semantic_model, question)?;

        info!(model = %config.model, "Sending question to query agent");

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .timeout(Duration::from_secs(config.timeout_secs))
            .json(&body)
            .send()
            .await
            .map_err(classify_request_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::AgentError(format!(
                "API error ({}): {}",
                status, text
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AppError::AgentError(format!("Failed to parse JSON: {}", e)))?;

        json["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| AppError::AgentError("Invalid response format".to_string()))
    }
}

/// Three-way triage required by the error contract: unreachable,
/// timed out, or a plain agent failure.
fn classify_request_error(e: reqwest::Error) -> AppError {
    if e.is_timeout() {
        AppError::AgentTimeout(format!("Request timed out: {}", e))
    } else if e.is_connect() {
        AppError::AgentUnreachable(format!("Failed to connect: {}", e))
    } else {
        AppError::AgentError(format!("Request failed: {}", e))
    }
}

fn endpoint_url(base_url: &str) -> String {
    if base_url.ends_with('/') {
        format!("{}chat/completions", base_url)
    } else {
        format!("{}/chat/completions", base_url)
    }
}

fn build_body(
    config: &AgentConfig,
    semantic_model: &SemanticModel,
    question: &str,
) -> Result<serde_json::Value> {
    let system = format!(
        "{}\n\nThe tables available to query are described by this semantic model:\n{}",
        ANALYST_SYSTEM_PROMPT,
        semantic_model.to_json()?
    );

    Ok(json!({
        "model": config.model,
        "messages": [
            {
                "role": "system",
                "content": system
            },
            {
                "role": "user",
                "content": question
            }
        ],
        "max_tokens": config.max_tokens,
        "temperature": config.temperature,
    }))
}
