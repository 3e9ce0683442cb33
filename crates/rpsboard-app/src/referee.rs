//! Referee trait for abstracting match calls.

use std::future::Future;

use rpsboard_proto::{Board, PlayResponse, Symbol};

/// Abstracts the request/response calls to the match referee.
///
/// Calls are not retried. Any error is fatal to the current session attempt;
/// recovery belongs to the [`crate::Supervisor`].
pub trait Referee: Send + Sync {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Register a board and return the absolute match endpoint.
    fn register(&self, board: &Board) -> impl Future<Output = Result<String, Self::Error>> + Send;

    /// Submit a symbol to the match endpoint.
    fn play(
        &self,
        endpoint: &str,
        symbol: Symbol,
    ) -> impl Future<Output = Result<PlayResponse, Self::Error>> + Send;
}
