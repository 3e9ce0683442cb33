//! Observable state snapshots for invariant checking.
//!
//! Invariants operate on snapshots rather than live state to ensure
//! consistent, atomic checks.

use rpsboard_app::{DisplayBuffer, Phase, Session, SessionConfig, SessionState};
use rpsboard_proto::Channel;

/// Snapshot of one session's observable state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Lifecycle phase.
    pub phase: Phase,
    /// Protocol options.
    pub config: SessionConfig,
    /// Symbol, scores and endpoint.
    pub state: SessionState,
    /// What the display shows for `state`.
    pub display: DisplayBuffer,
    /// Channels subscribed during start-up.
    pub subscriptions: Vec<Channel>,
}

impl SessionSnapshot {
    /// Capture a session.
    pub fn of(session: &Session) -> Self {
        Self {
            phase: session.phase(),
            config: session.config(),
            state: session.state().clone(),
            display: session.display(),
            subscriptions: session.subscriptions().to_vec(),
        }
    }
}
