//! Observable session state.
//!
//! [`SessionState`] is the data half of a session attempt: what the display
//! shows and what the next play submits. [`Phase`] is where the session is in
//! its lifecycle. Both are owned by [`crate::Session`] and only change while
//! it handles an event.

use rpsboard_proto::{MatchOutcome, Symbol};

/// Lifecycle phase of a session attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Created, nothing connected yet.
    Uninitialized,
    /// Connected and subscribed, registration in flight.
    Registering,
    /// Registered, waiting for the board to announce itself (handshake
    /// variant only).
    AwaitingOnline,
    /// Accepting selector and button input.
    Ready,
    /// Play submission in flight.
    Playing,
    /// Teardown in progress after a shutdown request.
    ShuttingDown,
    /// Session ended. No further events are handled.
    Terminated,
}

/// Per-attempt session data.
///
/// A fresh attempt always starts from [`SessionState::default`]: Rock, zero
/// scores, zero encoder baseline, no match endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Registration completed and the live display can be rendered.
    pub initialized: bool,
    /// Last observed raw selector position.
    pub encoder_raw: i64,
    /// Symbol this board will play.
    pub own_symbol: Symbol,
    /// Symbol the opponent played last round.
    pub opponent_symbol: Symbol,
    /// Score of this board.
    pub own_score: u32,
    /// Score of the opponent.
    pub opponent_score: u32,
    /// Address play submissions go to. `None` until registered.
    pub match_endpoint: Option<String>,
}

impl SessionState {
    /// Apply a new raw selector position.
    ///
    /// Only the sign of the delta matters: a higher value advances one
    /// symbol, a lower value goes back one, an equal value does nothing.
    /// Returns `true` if the symbol changed.
    pub fn observe_selector(&mut self, raw: i64) -> bool {
        let previous = std::mem::replace(&mut self.encoder_raw, raw);
        match raw.cmp(&previous) {
            std::cmp::Ordering::Greater => {
                self.own_symbol = self.own_symbol.successor();
                true
            },
            std::cmp::Ordering::Less => {
                self.own_symbol = self.own_symbol.predecessor();
                true
            },
            std::cmp::Ordering::Equal => false,
        }
    }

    /// Take scores and opponent symbol from a play result.
    pub fn apply_outcome(&mut self, outcome: &MatchOutcome) {
        self.own_score = outcome.own_score;
        self.opponent_score = outcome.opponent_score;
        self.opponent_symbol = outcome.opponent_symbol;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_delta_sign_drives_symbol() {
        let mut state = SessionState::default();

        assert!(!state.observe_selector(0));
        assert_eq!(state.own_symbol, Symbol::Rock);

        assert!(state.observe_selector(40));
        assert_eq!(state.own_symbol, Symbol::Paper);

        assert!(state.observe_selector(-3));
        assert_eq!(state.own_symbol, Symbol::Rock);
        assert_eq!(state.encoder_raw, -3);
    }

    #[test]
    fn outcome_replaces_scores() {
        let mut state = SessionState { own_score: 4, opponent_score: 4, ..Default::default() };
        state.apply_outcome(&MatchOutcome {
            own_score: 5,
            opponent_score: 4,
            opponent_symbol: Symbol::Paper,
            history: Vec::new(),
        });

        assert_eq!((state.own_score, state.opponent_score), (5, 4));
        assert_eq!(state.opponent_symbol, Symbol::Paper);
    }
}
