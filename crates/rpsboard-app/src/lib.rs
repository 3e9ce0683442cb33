//! Application layer for the board controller.
//!
//! Pure session state machine plus the generic runtime and supervisor that
//! drive it, enabling deterministic simulation testing with the same code
//! that runs against a real broker and referee.
//!
//! # Components
//!
//! - [`Session`]: protocol state machine (start-up, input mapping, teardown)
//! - [`DisplayBuffer`]: four-line display rendering
//! - [`Driver`]: trait for the device transport
//! - [`Referee`]: trait for the match referee
//! - [`Runtime`]: single-attempt orchestration loop
//! - [`Supervisor`]: restarts attempts after faults

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod driver;
mod error;
mod event;
mod presenter;
mod referee;
mod runtime;
mod session;
mod shutdown;
mod state;
mod supervisor;

pub use action::{SessionAction, Termination};
pub use driver::Driver;
pub use error::{RefereeCall, SessionFault, TransportOp};
pub use event::SessionEvent;
pub use presenter::{DISPLAY_LINES, DisplayBuffer};
pub use referee::Referee;
pub use runtime::Runtime;
pub use session::{Session, SessionConfig};
pub use shutdown::{Shutdown, ShutdownTrigger, shutdown_channel};
pub use state::{Phase, SessionState};
pub use supervisor::{Supervisor, SupervisorConfig};
