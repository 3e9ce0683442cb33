//! Protocol vocabulary shared by every rpsboard crate.
//!
//! This crate has no I/O. It defines what travels over the two remote
//! dependencies of a board session:
//!
//! - [`Symbol`]: the cyclic Rock/Paper/Scissors choice and its algebra
//! - [`Topics`]: the per-board channel naming scheme for the device broker,
//!   and the decoding of incoming device messages into [`DeviceInput`]
//! - [`referee`]: JSON bodies exchanged with the match referee
//!
//! # Invariants
//!
//! - Symbol successor/predecessor are total and wrap modulo 3.
//! - Every incoming [`Channel`] maps to exactly one topic and back.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod errors;
pub mod referee;
pub mod symbol;
pub mod topics;

pub use errors::{DecodeError, UnknownSymbol};
pub use referee::{Board, HistoryEntry, MatchOutcome, PlayRequest, PlayResponse, Round};
pub use symbol::Symbol;
pub use topics::{
    BoardStatus, ButtonEdge, ButtonTokens, Channel, DISPLAY_MODE_MESSAGE, DEFAULT_NAMESPACE,
    DeviceInput, Direction, Topics,
};
