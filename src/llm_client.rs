//! LLM API client abstraction for OpenAI, Anthropic and Gemini.

use async_openai::{
    Client as OpenAIClient,
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
};
use derive_more::{Display, Error};
use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

const ANTHROPIC_URL: &str = "https://api.anthropic.com/v1/messages";
const GEMINI_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// LLM provider selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// OpenAI (GPT models).
    #[display("openai")]
    OpenAI,
    /// Anthropic (Claude models).
    #[display("anthropic")]
    Anthropic,
    /// Google Gemini.
    #[display("gemini")]
    Gemini,
}

impl LlmProvider {
    /// Environment variable holding the API key for this provider.
    pub fn api_key_var(self) -> &'static str {
        match self {
            LlmProvider::OpenAI => "OPENAI_API_KEY",
            LlmProvider::Anthropic => "ANTHROPIC_API_KEY",
            LlmProvider::Gemini => "GEMINI_API_KEY",
        }
    }
}

/// Configuration for LLM client.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    provider: LlmProvider,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl LlmConfig {
    /// Creates a new LLM configuration.
    #[instrument(skip(api_key), fields(provider = ?provider, model = %model))]
    pub fn new(provider: LlmProvider, api_key: String, model: String, max_tokens: u32) -> Self {
        debug!("Creating LLM config");
        Self {
            provider,
            api_key,
            model,
            max_tokens,
        }
    }

    /// Gets the provider.
    pub fn provider(&self) -> LlmProvider {
        self.provider
    }

    /// Gets the API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Gets the model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Gets the max tokens.
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }
}

/// A single completion request.
///
/// `response_schema` asks for a JSON reply. Gemini receives it natively;
/// the other providers get it spelled out in the system prompt.
#[derive(Debug, Clone, new)]
pub struct CompletionRequest {
    /// System instruction.
    pub system: String,
    /// User message.
    pub user: String,
    /// Optional JSON response schema (OpenAPI subset, Gemini style).
    pub response_schema: Option<serde_json::Value>,
}

impl CompletionRequest {
    /// System prompt with the schema appended, for providers without native support.
    fn system_with_schema(&self) -> String {
        match &self.response_schema {
            Some(schema) => format!(
                "{}\n\nRespond with a single JSON object and nothing else. \
                 It must match this schema:\n{}",
                self.system, schema
            ),
            None => self.system.clone(),
        }
    }
}

/// LLM client that abstracts over multiple providers.
#[derive(Debug, Clone)]
pub struct LlmClient {
    config: LlmConfig,
    http: reqwest::Client,
}

impl LlmClient {
    /// Creates a new LLM client.
    #[instrument(skip(config), fields(provider = ?config.provider()))]
    pub fn new(config: LlmConfig) -> Self {
        info!("Creating LLM client");
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Generates a completion from a system prompt and user message.
    #[instrument(
        skip(self, system_prompt, user_message),
        fields(provider = ?self.config.provider, model = %self.config.model)
    )]
    pub async fn generate(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, LlmError> {
        let request = CompletionRequest::new(
            system_prompt.to_string(),
            user_message.to_string(),
            None,
        );
        self.complete(&request).await
    }

    /// Runs a completion request against the configured provider.
    #[instrument(
        skip(self, request),
        fields(
            provider = ?self.config.provider,
            structured = request.response_schema.is_some()
        )
    )]
    pub async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        debug!("Generating completion");
        match self.config.provider {
            LlmProvider::OpenAI => {
                self.generate_openai(&request.system_with_schema(), &request.user)
                    .await
            }
            LlmProvider::Anthropic => {
                self.generate_anthropic(&request.system_with_schema(), &request.user)
                    .await
            }
            LlmProvider::Gemini => self.generate_gemini(request).await,
        }
    }

    /// Generates a completion using Anthropic Claude.
    #[instrument(skip(self, system_prompt, user_message))]
    async fn generate_anthropic(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, LlmError> {
        debug!("Building Anthropic API request");
        let request_body = serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "system": system_prompt,
            "messages": [
                {
                    "role": "user",
                    "content": user_message
                }
            ]
        });

        debug!("Sending request to Anthropic");
        let response = self
            .http
            .post(ANTHROPIC_URL)
            .header("x-api-key", self.config.api_key.as_str())
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Anthropic API request failed");
                LlmError::new(format!("Anthropic API request failed: {}", e))
            })?;

        let response_json = read_json_response("Anthropic", response).await?;

        let content = response_json["content"][0]["text"]
            .as_str()
            .ok_or_else(|| {
                error!(response = %response_json, "No text content in Anthropic response");
                LlmError::new("No text content in Anthropic response".to_string())
            })?
            .to_string();

        info!(content_length = content.len(), "Generated completion");
        Ok(content)
    }

    /// Generates a completion using Google Gemini.
    #[instrument(skip(self, request))]
    async fn generate_gemini(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        debug!("Building Gemini API request");
        let mut generation_config = serde_json::json!({
            "maxOutputTokens": self.config.max_tokens,
        });
        if let Some(schema) = &request.response_schema {
            generation_config["responseMimeType"] = "application/json".into();
            generation_config["responseSchema"] = schema.clone();
        }

        let request_body = serde_json::json!({
            "systemInstruction": { "parts": [{ "text": request.system }] },
            "contents": [
                {
                    "role": "user",
                    "parts": [{ "text": request.user }]
                }
            ],
            "generationConfig": generation_config,
        });

        let url = format!("{}/{}:generateContent", GEMINI_URL, self.config.model);

        debug!(url = %url, "Sending request to Gemini");
        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", self.config.api_key.as_str())
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Gemini API request failed");
                LlmError::new(format!("Gemini API request failed: {}", e))
            })?;

        let response_json = read_json_response("Gemini", response).await?;

        let parts = response_json["candidates"][0]["content"]["parts"]
            .as_array()
            .ok_or_else(|| {
                error!(response = %response_json, "No content parts in Gemini response");
                LlmError::new("No content parts in Gemini response".to_string())
            })?;

        let content: String = parts
            .iter()
            .filter_map(|part| part["text"].as_str())
            .collect();

        if content.is_empty() {
            error!(response = %response_json, "No text content in Gemini response");
            return Err(LlmError::new(
                "No text content in Gemini response".to_string(),
            ));
        }

        info!(content_length = content.len(), "Generated completion");
        Ok(content)
    }

    /// Generates a completion using OpenAI.
    #[instrument(skip(self, system_prompt, user_message))]
    async fn generate_openai(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, LlmError> {
        debug!("Creating OpenAI client");

        let client = OpenAIClient::with_config(
            OpenAIConfig::new().with_api_key(self.config.api_key.clone()),
        );

        debug!("Building chat completion request");
        let messages = vec![
            ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system_prompt)
                    .build()
                    .map_err(|e| {
                        error!(error = ?e, "Failed to build system message");
                        LlmError::new(format!("Failed to build system message: {}", e))
                    })?,
            ),
            ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessageArgs::default()
                    .content(user_message)
                    .build()
                    .map_err(|e| {
                        error!(error = ?e, "Failed to build user message");
                        LlmError::new(format!("Failed to build user message: {}", e))
                    })?,
            ),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.config.model)
            .messages(messages)
            .max_tokens(self.config.max_tokens)
            .build()
            .map_err(|e| {
                error!(error = ?e, "Failed to build request");
                LlmError::new(format!("Failed to build request: {}", e))
            })?;

        debug!("Sending request to OpenAI");
        let response = client.chat().create(request).await.map_err(|e| {
            error!(error = ?e, "OpenAI API error");
            LlmError::new(format!("OpenAI API error: {}", e))
        })?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| {
                error!("No content in OpenAI response");
                LlmError::new("No content in OpenAI response".to_string())
            })?;

        info!(content_length = content.len(), "Generated completion");
        Ok(content)
    }
}

/// Reads a provider response body, failing on non-2xx status or invalid JSON.
#[instrument(skip(response), fields(status = %response.status()))]
async fn read_json_response(
    provider: &str,
    response: reqwest::Response,
) -> Result<serde_json::Value, LlmError> {
    let status = response.status();
    let response_text = response.text().await.map_err(|e| {
        error!(error = ?e, "Failed to read response");
        LlmError::new(format!("Failed to read {} response: {}", provider, e))
    })?;

    if !status.is_success() {
        error!(status = %status, response = %response_text, "API error");
        return Err(LlmError::new(format!(
            "{} API error {}: {}",
            provider, status, response_text
        )));
    }

    debug!(response_length = response_text.len(), "Parsing response");
    serde_json::from_str(&response_text).map_err(|e| {
        error!(error = ?e, response = %response_text, "Failed to parse response");
        LlmError::new(format!("Failed to parse {} response: {}", provider, e))
    })
}

/// LLM client error.
#[derive(Debug, Clone, Display, Error)]
#[display("LLM error: {} at {}:{}", message, file, line)]
pub struct LlmError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl LlmError {
    /// Creates a new LLM error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        error!(error_message = %message, "LLM error created");
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_is_appended_to_system_prompt() {
        let request = CompletionRequest::new(
            "Be brief.".to_string(),
            "Hi".to_string(),
            Some(serde_json::json!({ "type": "OBJECT" })),
        );
        let system = request.system_with_schema();
        assert!(system.starts_with("Be brief."));
        assert!(system.contains("\"type\":\"OBJECT\""));
    }

    #[test]
    fn test_plain_request_keeps_system_prompt() {
        let request = CompletionRequest::new("Be brief.".to_string(), "Hi".to_string(), None);
        assert_eq!(request.system_with_schema(), "Be brief.");
    }

    #[test]
    fn test_provider_deserializes_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            provider: LlmProvider,
        }
        let parsed: Wrapper = toml::from_str("provider = \"gemini\"").unwrap();
        assert_eq!(parsed.provider, LlmProvider::Gemini);
        assert_eq!(LlmProvider::Anthropic.api_key_var(), "ANTHROPIC_API_KEY");
    }
}
