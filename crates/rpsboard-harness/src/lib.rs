//! Simulation harness for board controller testing.
//!
//! In-memory implementations of the [`rpsboard_app::Driver`] and
//! [`rpsboard_app::Referee`] traits, so the production runtime and supervisor
//! run unchanged against scripted input and injected faults.
//!
//! # Invariant Testing
//!
//! The `invariants` module provides behavioral testing through invariant
//! checks. Invariants verify WHAT must be true across all execution paths, not
//! specific scenarios. Use [`InvariantRegistry::standard()`] for the session
//! invariants.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod changes;
mod error;
pub mod invariants;
pub mod sim_driver;
pub mod sim_referee;

pub use changes::WAIT_DEADLINE;
pub use error::SimError;
pub use invariants::{
    DisplayShape, EndpointWhenLive, Invariant, InvariantRegistry, InvariantResult,
    PlaceholderUntilRegistered, SessionSnapshot, SubscriptionsMatchProtocol, Violation,
};
pub use sim_driver::{DriverCall, DriverOp, SimDevice, SimDriver};
pub use sim_referee::SimReferee;
