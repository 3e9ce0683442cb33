//! Simulation errors.

use thiserror::Error;

use crate::DriverOp;

/// Errors produced by the simulated driver and referee.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// A scripted transport fault fired.
    #[error("injected {0} fault")]
    Injected(DriverOp),

    /// Operation requires an open connection.
    #[error("not connected")]
    NotConnected,

    /// A scripted referee fault fired.
    #[error("injected referee fault: {0}")]
    Referee(String),

    /// Play submitted with no scripted response left.
    #[error("no scripted play response")]
    Unscripted,

    /// A `wait_until` condition did not hold before its deadline.
    #[error("timed out waiting for {0}")]
    Timeout(String),
}
