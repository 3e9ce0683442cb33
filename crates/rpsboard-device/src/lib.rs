//! Board controller process.
//!
//! A thin shell over [`rpsboard_app::Supervisor`]: it parses flags, picks a
//! [`rpsboard_app::Driver`] (MQTT board or keyboard simulation) and wires the
//! operator's Ctrl-C to the shutdown signal. All orchestration lives in
//! `rpsboard-app`.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod cli;
mod error;
pub mod keyboard;

pub use cli::Args;
pub use error::DeviceError;
pub use keyboard::{Command, KeyboardDriver};
