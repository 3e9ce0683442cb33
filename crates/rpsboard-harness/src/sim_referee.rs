//! Scripted referee implementing the Referee trait.
//!
//! [`SimReferee`] answers registrations with a fixed endpoint and plays with
//! a queue of scripted responses. Faults are injected per call kind. Clones
//! share the same script and call log, so a test can hand one clone to the
//! supervisor and keep another for assertions.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use rpsboard_app::Referee;
use rpsboard_proto::{Board, PlayResponse, Symbol};

use crate::{SimError, changes::Changes};

#[derive(Debug, Default)]
struct RefereeState {
    endpoint: String,
    register_faults: usize,
    responses: VecDeque<Result<PlayResponse, SimError>>,
    registrations: Vec<Board>,
    plays: Vec<(String, Symbol)>,
}

/// In-memory referee with scripted answers.
#[derive(Debug, Clone)]
pub struct SimReferee {
    state: Arc<Mutex<RefereeState>>,
    changes: Changes,
}

impl SimReferee {
    /// Referee that hands out `endpoint` on every registration.
    pub fn new(endpoint: impl Into<String>) -> Self {
        let state = RefereeState { endpoint: endpoint.into(), ..RefereeState::default() };
        Self { state: Arc::new(Mutex::new(state)), changes: Changes::default() }
    }

    fn lock(&self) -> MutexGuard<'_, RefereeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue a successful play outcome.
    pub fn respond(&self, own_score: u32, opponent_score: u32, opponent_symbol: &str) {
        self.lock().responses.push_back(Ok(PlayResponse {
            own_score,
            opponent_score,
            opponent_symbol: opponent_symbol.to_string(),
            history: Vec::new(),
        }));
    }

    /// Queue a failing play.
    pub fn fail_play(&self, reason: &str) {
        self.lock().responses.push_back(Err(SimError::Referee(reason.to_string())));
    }

    /// Make the next `count` registrations fail.
    pub fn fail_registrations(&self, count: usize) {
        self.lock().register_faults += count;
    }

    /// Boards registered so far, including failed attempts.
    pub fn registrations(&self) -> Vec<Board> {
        self.lock().registrations.clone()
    }

    /// Plays submitted so far as `(endpoint, symbol)`, including failed ones.
    pub fn plays(&self) -> Vec<(String, Symbol)> {
        self.lock().plays.clone()
    }

    /// Wait until at least `count` registrations were attempted.
    pub async fn wait_for_registrations(&self, count: usize) -> Result<(), SimError> {
        let what = format!("{count} registrations");
        self.changes.wait_until(&what, || self.lock().registrations.len() >= count).await
    }

    /// Wait until at least `count` plays were submitted.
    pub async fn wait_for_plays(&self, count: usize) -> Result<(), SimError> {
        let what = format!("{count} plays");
        self.changes.wait_until(&what, || self.lock().plays.len() >= count).await
    }
}

impl Referee for SimReferee {
    type Error = SimError;

    async fn register(&self, board: &Board) -> Result<String, Self::Error> {
        let result = {
            let mut state = self.lock();
            state.registrations.push(board.clone());
            if state.register_faults > 0 {
                state.register_faults -= 1;
                Err(SimError::Referee("registration refused".to_string()))
            } else {
                Ok(state.endpoint.clone())
            }
        };
        self.changes.bump();
        result
    }

    async fn play(&self, endpoint: &str, symbol: Symbol) -> Result<PlayResponse, Self::Error> {
        let result = {
            let mut state = self.lock();
            state.plays.push((endpoint.to_string(), symbol));
            state.responses.pop_front().unwrap_or(Err(SimError::Unscripted))
        };
        self.changes.bump();
        result
    }
}
