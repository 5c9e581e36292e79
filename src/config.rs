//! Arena configuration: opponent persona, LLM provider and pacing.

use crate::llm_client::{LlmConfig, LlmProvider};
use crate::session::GameMode;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Configuration for a game session.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Name the AI opponent introduces itself with.
    persona: String,

    /// LLM provider (openai, anthropic or gemini).
    llm_provider: LlmProvider,

    /// LLM model name (e.g., "gemini-3-flash-preview", "gpt-4o-mini").
    llm_model: String,

    /// Maximum tokens for LLM responses.
    llm_max_tokens: u32,

    /// Pause before each AI move request, in milliseconds.
    ai_delay_ms: u64,

    /// Upper bound on each service call, in seconds.
    request_timeout_secs: u64,

    /// Mode the session starts in.
    mode: GameMode,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            persona: "Gemini Prime".to_string(),
            llm_provider: LlmProvider::Gemini,
            llm_model: "gemini-3-flash-preview".to_string(),
            llm_max_tokens: 1024,
            ai_delay_ms: 600,
            request_timeout_secs: 20,
            mode: GameMode::AiChallenge,
        }
    }
}

impl ArenaConfig {
    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(
            persona = %config.persona,
            provider = %config.llm_provider,
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Loads the file if it exists, defaults otherwise.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Returns a copy with a different starting mode.
    pub fn with_mode(mut self, mode: GameMode) -> Self {
        self.mode = mode;
        self
    }

    /// Pause before each AI move request.
    pub fn ai_delay(&self) -> Duration {
        Duration::from_millis(self.ai_delay_ms)
    }

    /// Upper bound on each service call.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Creates LLM configuration from this config.
    ///
    /// Reads the provider's API key from the environment
    /// (`OPENAI_API_KEY`, `ANTHROPIC_API_KEY` or `GEMINI_API_KEY`).
    #[instrument(skip(self), fields(provider = ?self.llm_provider, model = %self.llm_model))]
    pub fn create_llm_config(&self) -> Result<LlmConfig, ConfigError> {
        self.create_llm_config_with(|var| std::env::var(var).ok())
    }

    /// Same as [`Self::create_llm_config`] with a custom key lookup.
    pub fn create_llm_config_with(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<LlmConfig, ConfigError> {
        debug!("Creating LLM config");
        let var = self.llm_provider.api_key_var();
        let api_key = lookup(var)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::new(format!("{} environment variable not set", var)))?;

        Ok(LlmConfig::new(
            self.llm_provider,
            api_key,
            self.llm_model.clone(),
            self.llm_max_tokens,
        ))
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
