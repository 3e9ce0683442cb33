//! Session side-effects.
//!
//! This module defines the [`SessionAction`] enum, which represents
//! instructions produced by the [`crate::Session`] state machine for the
//! runtime to execute, in order.

use rpsboard_proto::{Board, Channel, Symbol};

use crate::DisplayBuffer;

/// Why a session ended without a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Operator requested shutdown; teardown ran.
    Shutdown,
    /// Board announced itself online a second time; no teardown.
    RemoteShutdown,
}

/// Actions produced by the Session state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Open the device transport.
    Connect,

    /// Subscribe to an incoming channel.
    Subscribe(Channel),

    /// Unsubscribe from an incoming channel.
    Unsubscribe(Channel),

    /// Publish a raw payload on an outgoing channel.
    Publish {
        /// Outgoing channel.
        channel: Channel,
        /// Payload text.
        payload: String,
    },

    /// Publish the display buffer.
    Render(DisplayBuffer),

    /// Register the board with the referee.
    Register(Board),

    /// Submit a symbol to the match endpoint.
    Play {
        /// Absolute match endpoint.
        endpoint: String,
        /// Symbol to play.
        symbol: Symbol,
    },

    /// Close the device transport.
    Disconnect,

    /// Stop the attempt.
    Terminate(Termination),
}
