//! Tests for the move and commentary clients against scripted services.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tictactoe_arena::{
    Board, CommentaryClient, CompletionRequest, CompletionService, FALLBACK_MOVE_COMMENTARY,
    FALLBACK_REMARK, LlmError, MoveClient, OfflineService, Outcome, Player, Position, evaluate,
};

/// Replies with a fixed text and remembers every request it saw.
struct ScriptedService {
    reply: Result<String, String>,
    delay: Duration,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedService {
    fn ok(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            delay: Duration::ZERO,
            requests: Mutex::new(Vec::new()),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: Err("connection refused".to_string()),
            delay: Duration::ZERO,
            requests: Mutex::new(Vec::new()),
        })
    }

    fn slow(text: &str, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            delay,
            requests: Mutex::new(Vec::new()),
        })
    }

    fn seen(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionService for ScriptedService {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.reply.clone().map_err(LlmError::new)
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

const TIMEOUT: Duration = Duration::from_secs(5);

fn board(text: &str) -> Board {
    text.parse().unwrap()
}

#[tokio::test]
async fn test_failing_service_falls_back_to_lowest_empty() {
    let client = MoveClient::new(ScriptedService::failing(), "Prime", TIMEOUT);
    let board = board("XO-X-----");

    let suggestion = client.choose_move(&board, Player::O, Player::X).await;

    assert_eq!(suggestion.position, Position::TopRight);
    assert_eq!(suggestion.commentary, FALLBACK_MOVE_COMMENTARY);
}

#[tokio::test]
async fn test_valid_reply_is_used() {
    let service = ScriptedService::ok(r#"{"move": 4, "commentary": "Center is mine."}"#);
    let client = MoveClient::new(Arc::clone(&service), "Prime", TIMEOUT);
    let board = board("X--------");

    let suggestion = client.choose_move(&board, Player::O, Player::X).await;

    assert_eq!(suggestion.position, Position::Center);
    assert_eq!(suggestion.commentary, "Center is mine.");

    let seen = service.seen();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].system.contains("X|1|2|3|4|5|6|7|8"));
    assert!(seen[0].response_schema.is_some());
}

#[tokio::test]
async fn test_reply_wrapped_in_prose_is_accepted() {
    let service = ScriptedService::ok(
        "Sure! ```json\n{\"move\": 8, \"commentary\": \"Corner.\"}\n``` Good luck.",
    );
    let client = MoveClient::new(service, "Prime", TIMEOUT);

    let suggestion = client
        .request_move(&board("X---O----"), Player::X, Player::O)
        .await
        .expect("reply should parse");

    assert_eq!(suggestion.position, Position::BottomRight);
}

#[tokio::test]
async fn test_occupied_move_is_rejected_and_replaced() {
    let service = ScriptedService::ok(r#"{"move": 0, "commentary": "Mine now."}"#);
    let client = MoveClient::new(service, "Prime", TIMEOUT);
    let board = board("X--------");

    let result = client.request_move(&board, Player::O, Player::X).await;
    assert!(result.is_err());

    let suggestion = client.choose_move(&board, Player::O, Player::X).await;
    assert_eq!(suggestion.position, Position::TopCenter);
    assert_eq!(suggestion.commentary, FALLBACK_MOVE_COMMENTARY);
}

#[tokio::test]
async fn test_out_of_range_moves_are_rejected() {
    let board = board("X--------");
    for reply in [
        r#"{"move": 9, "commentary": "?"}"#,
        r#"{"move": -1, "commentary": "?"}"#,
    ] {
        let client = MoveClient::new(ScriptedService::ok(reply), "Prime", TIMEOUT);
        let result = client.request_move(&board, Player::O, Player::X).await;
    assert!(result.is_err());

        let suggestion = client.choose_move(&board, Player::O, Player::X).await;
        assert_eq!(suggestion.position, Position::TopCenter);
    }
}

#[tokio::test]
async fn test_malformed_reply_falls_back() {
    let service = ScriptedService::ok("I refuse to play.");
    let client = MoveClient::new(service, "Prime", TIMEOUT);
    let board = board("XO-------");

    let suggestion = client.choose_move(&board, Player::X, Player::O).await;

    assert_eq!(suggestion.position, Position::TopRight);
    assert_eq!(suggestion.commentary, FALLBACK_MOVE_COMMENTARY);
}

#[tokio::test]
async fn test_slow_service_times_out_to_fallback() {
    let service = ScriptedService::slow(
        r#"{"move": 4, "commentary": "Too late."}"#,
        Duration::from_secs(2),
    );
    let client = MoveClient::new(service, "Prime", Duration::from_millis(20));

    let suggestion = client
        .choose_move(&board("X--------"), Player::O, Player::X)
        .await;

    assert_eq!(suggestion.position, Position::TopCenter);
    assert_eq!(suggestion.commentary, FALLBACK_MOVE_COMMENTARY);
}

#[tokio::test]
async fn test_offline_service_always_falls_back() {
    let service: Arc<dyn CompletionService> = Arc::new(OfflineService);
    let moves = MoveClient::new(Arc::clone(&service), "Prime", TIMEOUT);
    let remarks = CommentaryClient::new(service, TIMEOUT);

    let board = board("XX-OO----");
    let suggestion = moves.choose_move(&board, Player::X, Player::O).await;
    assert_eq!(suggestion.position, Position::TopRight);

    let finished = self::board("XXXOO----");
    let remark = remarks
        .closing_remark(&finished, &evaluate(&finished), Player::X)
        .await;
    assert_eq!(remark, FALLBACK_REMARK);
}

#[tokio::test]
async fn test_closing_remark_is_trimmed() {
    let service = ScriptedService::ok("  Well played, human.\n");
    let client = CommentaryClient::new(Arc::clone(&service), TIMEOUT);
    let board = board("XOXOXOOXO");

    let remark = client
        .closing_remark(&board, &Outcome::Draw, Player::X)
        .await;

    assert_eq!(remark, "Well played, human.");
    let seen = service.seen();
    assert!(seen[0].user.contains("Winner: Draw"));
    assert!(seen[0].user.contains("XOXOXOOXO"));
    assert!(seen[0].response_schema.is_none());
}

#[tokio::test]
async fn test_failed_or_empty_remark_falls_back() {
    let board = board("XXXOO----");
    let outcome = evaluate(&board);

    for service in [ScriptedService::failing(), ScriptedService::ok("   ")] {
        let client = CommentaryClient::new(service, TIMEOUT);
        let remark = client.closing_remark(&board, &outcome, Player::X).await;
        assert_eq!(remark, FALLBACK_REMARK);
    }
}
