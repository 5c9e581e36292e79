//! Error type for the external move/commentary service.

use crate::llm_client::LlmError;
use derive_more::{Display, Error};
use tracing::{instrument, warn};

/// The external service could not produce a usable answer.
///
/// Covers transport failures, timeouts, malformed replies and illegal
/// moves alike. The clients in this module absorb it into fallbacks.
#[derive(Debug, Clone, Display, Error)]
#[display("Service unavailable: {} at {}:{}", message, file, line)]
pub struct ServiceError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ServiceError {
    /// Creates a new service error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        let message = message.into();
        warn!(error_message = %message, "Service error created");
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<LlmError> for ServiceError {
    #[track_caller]
    fn from(err: LlmError) -> Self {
        Self::new(err.message)
    }
}

impl From<serde_json::Error> for ServiceError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("Malformed reply: {}", err))
    }
}

impl From<tokio::time::error::Elapsed> for ServiceError {
    #[track_caller]
    fn from(err: tokio::time::error::Elapsed) -> Self {
        Self::new(format!("Request timed out: {}", err))
    }
}
