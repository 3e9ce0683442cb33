//! Fuzz target for the Session state machine
//!
//! # Invariants
//!
//! - The display is always four lines
//! - At most one play is produced per event, and only from `Ready`
//! - Nothing is produced after termination

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rpsboard_app::{DISPLAY_LINES, Phase, Session, SessionAction, SessionConfig, SessionEvent};
use rpsboard_proto::{Board, BoardStatus, ButtonEdge, DeviceInput, PlayResponse};

#[derive(Debug, Arbitrary)]
enum FuzzEvent {
    Start,
    Registered(String),
    Selector(i64),
    Pressed,
    Released,
    Clicked,
    Online,
    Offline,
    Played { own: u32, opponent: u32, symbol: String },
    Shutdown,
}

impl From<FuzzEvent> for SessionEvent {
    fn from(event: FuzzEvent) -> Self {
        match event {
            FuzzEvent::Start => Self::Start,
            FuzzEvent::Registered(match_endpoint) => Self::Registered { match_endpoint },
            FuzzEvent::Selector(raw) => Self::Device(DeviceInput::Selector(raw)),
            FuzzEvent::Pressed => Self::Device(DeviceInput::Button(ButtonEdge::Pressed)),
            FuzzEvent::Released => Self::Device(DeviceInput::Button(ButtonEdge::Released)),
            FuzzEvent::Clicked => Self::Device(DeviceInput::Button(ButtonEdge::Clicked)),
            FuzzEvent::Online => Self::Device(DeviceInput::BoardStatus(BoardStatus::Online)),
            FuzzEvent::Offline => Self::Device(DeviceInput::BoardStatus(BoardStatus::Offline)),
            FuzzEvent::Played { own, opponent, symbol } => Self::PlayCompleted(PlayResponse {
                own_score: own,
                opponent_score: opponent,
                opponent_symbol: symbol,
                history: Vec::new(),
            }),
            FuzzEvent::Shutdown => Self::ShutdownRequested,
        }
    }
}

fuzz_target!(|input: (bool, Vec<FuzzEvent>)| {
    let (handshake, events) = input;
    let mut session = Session::new(Board::new("b03"), SessionConfig { handshake });

    for event in events {
        let before = session.phase();
        let actions = session.handle(event.into());

        if before == Phase::Terminated {
            assert!(actions.is_empty());
        }
        let plays = actions.iter().filter(|a| matches!(a, SessionAction::Play { .. })).count();
        assert!(plays <= 1);
        if plays == 1 {
            assert_eq!(before, Phase::Ready);
        }
        for action in &actions {
            if let SessionAction::Render(buffer) = action {
                assert_eq!(buffer.message().split('\n').count(), DISPLAY_LINES);
            }
            if matches!(action, SessionAction::Terminate(_)) {
                session.terminate();
            }
        }
    }
});
