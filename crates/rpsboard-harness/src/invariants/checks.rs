//! Standard invariant checks.
//!
//! These invariants capture behavioral properties that must always hold.
//! They verify WHAT must be true, not specific test scenarios.

use rpsboard_app::{DISPLAY_LINES, DisplayBuffer, Phase};
use rpsboard_proto::Channel;

use super::{Invariant, InvariantResult, SessionSnapshot};

/// Display is always exactly four lines.
///
/// The board rewrites its whole display on every message, so a short buffer
/// would leave stale lines behind.
pub struct DisplayShape;

impl Invariant for DisplayShape {
    fn name(&self) -> &'static str {
        "display_shape"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        let message = state.display.message();
        let lines = message.split('\n').count();
        if lines == DISPLAY_LINES {
            Ok(())
        } else {
            Err(self.violation(format!("display has {lines} lines: {message:?}")))
        }
    }
}

/// Nothing live is shown before registration.
///
/// Until the session is initialized the display is the placeholder, both
/// scores are zero and there is no match endpoint.
pub struct PlaceholderUntilRegistered;

impl Invariant for PlaceholderUntilRegistered {
    fn name(&self) -> &'static str {
        "placeholder_until_registered"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        let s = &state.state;
        if s.initialized {
            return Ok(());
        }
        if state.display != DisplayBuffer::placeholder() {
            return Err(self.violation(format!("uninitialized display shows {}", state.display)));
        }
        if s.own_score != 0 || s.opponent_score != 0 {
            return Err(self.violation(format!(
                "uninitialized scores {}:{}",
                s.own_score, s.opponent_score
            )));
        }
        if let Some(endpoint) = &s.match_endpoint {
            return Err(self.violation(format!("uninitialized session has endpoint {endpoint}")));
        }
        Ok(())
    }
}

/// Phases that accept input or play have a match endpoint.
pub struct EndpointWhenLive;

impl Invariant for EndpointWhenLive {
    fn name(&self) -> &'static str {
        "endpoint_when_live"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        let live = matches!(state.phase, Phase::AwaitingOnline | Phase::Ready | Phase::Playing);
        if live && (!state.state.initialized || state.state.match_endpoint.is_none()) {
            return Err(self.violation(format!(
                "{:?} without registration (initialized={}, endpoint={:?})",
                state.phase, state.state.initialized, state.state.match_endpoint
            )));
        }
        Ok(())
    }
}

/// A running session subscribes exactly the incoming channels its
/// configuration calls for.
///
/// A session that ended before starting has no subscriptions at all.
pub struct SubscriptionsMatchProtocol;

impl Invariant for SubscriptionsMatchProtocol {
    fn name(&self) -> &'static str {
        "subscriptions_match_protocol"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        let expected = Channel::incoming(state.config.handshake);
        let running = !matches!(state.phase, Phase::Uninitialized | Phase::Terminated);
        let allowed_empty = !running && state.subscriptions.is_empty();
        if state.subscriptions == expected || allowed_empty {
            Ok(())
        } else {
            Err(self.violation(format!(
                "{:?} subscribed {:?}, expected {expected:?}",
                state.phase, state.subscriptions
            )))
        }
    }
}
