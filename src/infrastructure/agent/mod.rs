pub mod openai;

pub use openai::OpenAiAgentClient;

use async_trait::async_trait;

use crate::domain::agent_config::AgentConfig;
use crate::domain::error::Result;
use crate::domain::semantic_model::SemanticModel;

/// Client for the hosted query-answering agent. The response is opaque
/// markdown; nothing beyond displayable text is enforced on it.
#[async_trait]
pub trait AgentClient: Send + Sync {
    async fn ask(
        &self,
        config: &AgentConfig,
        semantic_model: &SemanticModel,
        question: &str,
    ) -> Result<String>;
}
