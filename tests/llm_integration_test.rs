//! Integration test for LLM client connectivity.

use std::sync::Arc;
use std::time::Duration;
use tictactoe_arena::llm_client::{LlmClient, LlmConfig, LlmProvider};
use tictactoe_arena::{Board, CompletionService, MoveClient, Player};
use tracing::instrument;

const SYSTEM_PROMPT: &str = "You are a helpful assistant.";
const USER_PROMPT: &str = "Say 'Hello, world!' and nothing else.";

fn client_from_env(provider: LlmProvider, model: &str) -> LlmClient {
    dotenvy::dotenv().ok();
    let api_key = std::env::var(provider.api_key_var())
        .unwrap_or_else(|_| panic!("{} not set", provider.api_key_var()));
    LlmClient::new(LlmConfig::new(provider, api_key, model.to_string(), 512))
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
#[instrument]
async fn test_anthropic_connectivity() {
    let client = client_from_env(LlmProvider::Anthropic, "claude-3-5-haiku-20241022");

    let response = client
        .generate(SYSTEM_PROMPT, USER_PROMPT)
        .await
        .expect("Failed to generate");

    assert!(!response.is_empty(), "Response should not be empty");
    eprintln!("Response: {}", response);
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
#[instrument]
async fn test_openai_connectivity() {
    let client = client_from_env(LlmProvider::OpenAI, "gpt-4o-mini");

    let response = client
        .generate(SYSTEM_PROMPT, USER_PROMPT)
        .await
        .expect("Failed to generate");

    assert!(!response.is_empty(), "Response should not be empty");
    eprintln!("Response: {}", response);
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
#[instrument]
async fn test_gemini_structured_move() {
    let client: Arc<dyn CompletionService> =
        Arc::new(client_from_env(LlmProvider::Gemini, "gemini-3-flash-preview"));
    let moves = MoveClient::new(client, "Gemini Prime", Duration::from_secs(30));

    let board: Board = "XX-OO----".parse().unwrap();
    let suggestion = moves
        .request_move(&board, Player::O, Player::X)
        .await
        .expect("Gemini should return a legal move");

    assert!(board.is_empty(suggestion.position));
    eprintln!("Suggestion: {:?}", suggestion);
}
