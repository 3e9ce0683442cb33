//! Error types for protocol parsing.
//!
//! Both errors describe malformed input from a remote party. Neither is fatal
//! to a session: callers log and discard the offending message.

use std::num::ParseIntError;

use thiserror::Error;

/// Text that is not one of the three canonical symbol names.
///
/// Matching is case-sensitive and exact: `"rock"` and `" Rock"` are both
/// unknown.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown symbol: {0:?}")]
pub struct UnknownSymbol(pub String);

/// Incoming device message that cannot be turned into a
/// [`DeviceInput`](crate::DeviceInput).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Topic does not belong to this board's incoming channels.
    #[error("unknown topic: {0}")]
    UnknownTopic(String),

    /// Payload is not valid UTF-8.
    #[error("payload on {topic} is not UTF-8")]
    NotUtf8 {
        /// Topic the payload arrived on
        topic: String,
    },

    /// Selector payload is not a decimal integer.
    #[error("invalid selector value {payload:?}: {source}")]
    InvalidSelector {
        /// Raw payload text
        payload: String,
        /// Integer parse failure
        source: ParseIntError,
    },

    /// Button payload is not one of the configured edge tokens.
    #[error("unknown button token: {0:?}")]
    UnknownButtonToken(String),

    /// Board status payload is neither online nor offline.
    #[error("unknown board status: {0:?}")]
    UnknownBoardStatus(String),
}
