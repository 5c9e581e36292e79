//! The seam between the game and whatever answers its prompts.

use crate::llm_client::{CompletionRequest, LlmClient, LlmError};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Something that turns a prompt into text.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Runs a completion request.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError>;

    /// Short name for logs and the status line.
    fn name(&self) -> &str;
}

#[async_trait]
impl CompletionService for LlmClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        LlmClient::complete(self, request).await
    }

    fn name(&self) -> &str {
        self.config().model()
    }
}

/// Service used when no API key is configured. Every request fails.
#[derive(Debug, Clone, Default)]
pub struct OfflineService;

#[async_trait]
impl CompletionService for OfflineService {
    #[instrument(skip_all)]
    async fn complete(&self, _request: &CompletionRequest) -> Result<String, LlmError> {
        debug!("Offline service refusing request");
        Err(LlmError::new("No LLM provider configured".to_string()))
    }

    fn name(&self) -> &str {
        "offline"
    }
}
