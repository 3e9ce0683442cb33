//! Session fault types.
//!
//! A [`SessionFault`] ends the current attempt. It is never handled below the
//! [`crate::Supervisor`], which tears down and starts a fresh attempt.

use std::fmt;

use thiserror::Error;

/// Device transport operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportOp {
    /// Opening the connection.
    Connect,
    /// Subscribing to a channel.
    Subscribe,
    /// Unsubscribing from a channel.
    Unsubscribe,
    /// Publishing to a channel.
    Publish,
    /// Waiting for device input.
    Receive,
    /// Closing the connection.
    Disconnect,
}

impl fmt::Display for TransportOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Connect => "connect",
            Self::Subscribe => "subscribe",
            Self::Unsubscribe => "unsubscribe",
            Self::Publish => "publish",
            Self::Receive => "receive",
            Self::Disconnect => "disconnect",
        })
    }
}

/// Referee call that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefereeCall {
    /// Board registration.
    Register,
    /// Play submission.
    Play,
}

impl fmt::Display for RefereeCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Register => "register",
            Self::Play => "play",
        })
    }
}

/// Fault that ends a session attempt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionFault {
    /// Device transport failed.
    #[error("transport {operation} failed: {reason}")]
    Transport {
        /// Operation that failed
        operation: TransportOp,
        /// Transport error description
        reason: String,
    },

    /// Referee call failed.
    #[error("referee {call} failed: {reason}")]
    Referee {
        /// Call that failed
        call: RefereeCall,
        /// Referee error description
        reason: String,
    },

    /// Device input stream ended while the session was running.
    #[error("device input stream closed")]
    SourceClosed,
}

impl SessionFault {
    /// Transport fault from a driver error.
    pub fn transport(operation: TransportOp, error: &impl std::error::Error) -> Self {
        Self::Transport { operation, reason: error.to_string() }
    }

    /// Referee fault from a referee error.
    pub fn referee(call: RefereeCall, error: &impl std::error::Error) -> Self {
        Self::Referee { call, reason: error.to_string() }
    }
}
