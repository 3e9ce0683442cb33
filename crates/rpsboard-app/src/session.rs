//! Session state machine.
//!
//! This module defines the [`Session`] state machine, which owns one session
//! attempt completely decoupled from the device transport and the referee.
//!
//! This is a pure state machine: it consumes [`crate::SessionEvent`] inputs
//! and produces [`crate::SessionAction`] instructions for the runtime to
//! execute. Results of those actions come back in as further events.
//!
//! # Responsibilities
//!
//! - Orders the attempt start-up: connect, subscribe, select the display,
//!   register.
//! - Maps selector deltas onto the symbol and button edges onto plays.
//! - Applies referee outcomes atomically.
//! - Produces the teardown sequence on shutdown.
//!
//! # Invariants
//!
//! - Device input only has an effect in [`Phase::Ready`]; anything earlier is
//!   ignored.
//! - At most one play is in flight ([`Phase::Playing`]).
//! - A play result either updates scores and opponent symbol together or
//!   changes nothing.

use rpsboard_proto::{
    Board, BoardStatus, ButtonEdge, Channel, DISPLAY_MODE_MESSAGE, DeviceInput, MatchOutcome,
    PlayResponse,
};

use crate::{DisplayBuffer, Phase, SessionAction, SessionEvent, SessionState, Termination};

/// Protocol options for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionConfig {
    /// Wait for the board to announce itself online before accepting input.
    ///
    /// In this variant a second `online` while ready ends the session without
    /// teardown.
    pub handshake: bool,
}

/// Session state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies - fully testable without a broker or referee.
#[derive(Debug, Clone)]
pub struct Session {
    /// Board identity sent at registration.
    board: Board,
    /// Protocol options.
    config: SessionConfig,
    /// Lifecycle phase.
    phase: Phase,
    /// Symbol, scores and endpoint.
    state: SessionState,
    /// Channels subscribed during start-up, in order.
    subscriptions: Vec<Channel>,
    /// A press edge was seen and the matching release will play.
    button_armed: bool,
}

impl Session {
    /// Create an uninitialized session for `board`.
    pub fn new(board: Board, config: SessionConfig) -> Self {
        Self {
            board,
            config,
            phase: Phase::Uninitialized,
            state: SessionState::default(),
            subscriptions: Vec::new(),
            button_armed: false,
        }
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: SessionEvent) -> Vec<SessionAction> {
        match event {
            SessionEvent::Start => self.start(),
            SessionEvent::Registered { match_endpoint } => self.registered(match_endpoint),
            SessionEvent::Device(input) => self.device_input(input),
            SessionEvent::PlayCompleted(response) => self.play_completed(response),
            SessionEvent::ShutdownRequested => self.shutdown(),
        }
    }

    /// Mark the session as ended.
    ///
    /// Called by the runtime once it has executed
    /// [`SessionAction::Terminate`].
    pub fn terminate(&mut self) {
        self.phase = Phase::Terminated;
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current session data.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Board identity.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Protocol options.
    pub fn config(&self) -> SessionConfig {
        self.config
    }

    /// Channels subscribed so far. Teardown unsubscribes exactly these.
    pub fn subscriptions(&self) -> &[Channel] {
        &self.subscriptions
    }

    /// Display buffer for the current state.
    pub fn display(&self) -> DisplayBuffer {
        DisplayBuffer::render(&self.state)
    }

    fn start(&mut self) -> Vec<SessionAction> {
        if self.phase != Phase::Uninitialized {
            tracing::warn!(phase = ?self.phase, "ignoring start of an already started session");
            return vec![];
        }
        self.phase = Phase::Registering;
        self.subscriptions = Channel::incoming(self.config.handshake);

        let mut actions = vec![SessionAction::Connect];
        actions.extend(self.subscriptions.iter().copied().map(SessionAction::Subscribe));
        actions.push(SessionAction::Publish {
            channel: Channel::DisplayMode,
            payload: DISPLAY_MODE_MESSAGE.to_string(),
        });
        actions.push(self.render());
        actions.push(SessionAction::Register(self.board.clone()));
        actions
    }

    fn registered(&mut self, match_endpoint: String) -> Vec<SessionAction> {
        if self.phase != Phase::Registering {
            tracing::warn!(phase = ?self.phase, "ignoring registration outside of registering");
            return vec![];
        }

        tracing::info!(board = %self.board.board_id, %match_endpoint, "registered with referee");
        self.state.initialized = true;
        self.state.match_endpoint = Some(match_endpoint);
        self.phase = if self.config.handshake { Phase::AwaitingOnline } else { Phase::Ready };

        vec![self.render()]
    }

    fn device_input(&mut self, input: DeviceInput) -> Vec<SessionAction> {
        match (self.phase, input) {
            (Phase::Ready, DeviceInput::Selector(raw)) => {
                if self.state.observe_selector(raw) {
                    tracing::debug!(raw, symbol = %self.state.own_symbol, "symbol selected");
                    vec![self.render()]
                } else {
                    vec![]
                }
            },
            (Phase::Ready, DeviceInput::Button(edge)) => self.button(edge),
            (Phase::AwaitingOnline, DeviceInput::BoardStatus(BoardStatus::Online)) => {
                tracing::info!("board online");
                self.phase = Phase::Ready;
                vec![self.render()]
            },
            (Phase::Ready, DeviceInput::BoardStatus(BoardStatus::Online))
                if self.config.handshake =>
            {
                // Second announcement doubles as the remote shutdown request
                tracing::info!("board announced online again, ending session");
                self.phase = Phase::Terminated;
                vec![SessionAction::Terminate(Termination::RemoteShutdown)]
            },
            (phase, input) => {
                tracing::debug!(?phase, ?input, "ignoring device input");
                vec![]
            },
        }
    }

    fn button(&mut self, edge: ButtonEdge) -> Vec<SessionAction> {
        match edge {
            ButtonEdge::Pressed => {
                self.button_armed = true;
                vec![]
            },
            ButtonEdge::Released => {
                if std::mem::take(&mut self.button_armed) {
                    self.play()
                } else {
                    tracing::debug!("release without press, ignoring");
                    vec![]
                }
            },
            ButtonEdge::Clicked => {
                self.button_armed = false;
                self.play()
            },
        }
    }

    fn play(&mut self) -> Vec<SessionAction> {
        let Some(endpoint) = self.state.match_endpoint.clone() else {
            tracing::warn!("play requested without a match endpoint");
            return vec![];
        };

        tracing::debug!(symbol = %self.state.own_symbol, "submitting play");
        self.phase = Phase::Playing;
        vec![SessionAction::Play { endpoint, symbol: self.state.own_symbol }]
    }

    fn play_completed(&mut self, response: PlayResponse) -> Vec<SessionAction> {
        if self.phase != Phase::Playing {
            tracing::warn!(phase = ?self.phase, "ignoring play result outside of playing");
            return vec![];
        }
        self.phase = Phase::Ready;

        match MatchOutcome::try_from(response) {
            Ok(outcome) => {
                self.state.apply_outcome(&outcome);
                tracing::info!(
                    own = self.state.own_score,
                    opponent = self.state.opponent_score,
                    opponent_symbol = %outcome.opponent_symbol,
                    rounds = outcome.history.len(),
                    "round played"
                );
                vec![self.render()]
            },
            Err(e) => {
                tracing::warn!(error = %e, "discarding play result");
                vec![]
            },
        }
    }

    fn shutdown(&mut self) -> Vec<SessionAction> {
        match self.phase {
            Phase::Uninitialized => {
                self.phase = Phase::Terminated;
                vec![SessionAction::Terminate(Termination::Shutdown)]
            },
            Phase::ShuttingDown | Phase::Terminated => vec![],
            Phase::Registering
            | Phase::AwaitingOnline
            | Phase::Ready
            | Phase::Playing => {
                tracing::info!("cleaning up");
                self.phase = Phase::ShuttingDown;

                let mut actions: Vec<_> =
                    self.subscriptions.iter().copied().map(SessionAction::Unsubscribe).collect();
                actions.push(SessionAction::Disconnect);
                actions.push(SessionAction::Terminate(Termination::Shutdown));
                actions
            },
        }
    }

    fn render(&self) -> SessionAction {
        SessionAction::Render(self.display())
    }
}
