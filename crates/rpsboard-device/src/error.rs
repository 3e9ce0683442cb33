//! Process-level errors.

use rpsboard_client::RefereeError;
use thiserror::Error;

/// Errors that stop the process before the supervisor takes over.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// Referee client could not be set up.
    #[error("referee setup failed: {0}")]
    Referee(#[from] RefereeError),
}
