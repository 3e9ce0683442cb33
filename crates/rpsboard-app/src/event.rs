//! Session input events.
//!
//! This module defines [`SessionEvent`], the complete set of inputs that drive
//! the [`crate::Session`] state machine.
//!
//! Events originate from three sources:
//! - The runtime itself (attempt start, shutdown requests).
//! - The device, decoded by the driver.
//! - Referee call results, fed back after the runtime executes an action.

use rpsboard_proto::{DeviceInput, PlayResponse};

/// Events processed by the Session state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A new attempt begins.
    Start,

    /// Registration succeeded.
    Registered {
        /// Absolute address for play submissions.
        match_endpoint: String,
    },

    /// Decoded device message.
    Device(DeviceInput),

    /// Play submission returned.
    PlayCompleted(PlayResponse),

    /// Operator asked the process to stop.
    ShutdownRequested,
}
