//! Display rendering.
//!
//! The board display shows exactly four lines and is always rewritten as a
//! whole. [`DisplayBuffer::render`] produces the buffer for a
//! [`SessionState`]; the runtime publishes [`DisplayBuffer::message`] on the
//! display message channel.

use std::fmt;

use crate::SessionState;

/// Number of lines on the board display.
pub const DISPLAY_LINES: usize = 4;

/// Placeholder shown until registration completes.
const PLACEHOLDER: &str = "Initializing...";

/// Full contents of the board display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayBuffer {
    lines: [String; DISPLAY_LINES],
}

impl DisplayBuffer {
    /// Render the display for the given state.
    pub fn render(state: &SessionState) -> Self {
        if !state.initialized {
            return Self::placeholder();
        }

        Self {
            lines: [
                format!("Own:      {}", state.own_symbol),
                format!("Opponent: {}", state.opponent_symbol),
                format!("Own:      {}", state.own_score),
                format!("Opponent: {}", state.opponent_score),
            ],
        }
    }

    /// Buffer shown before the session is registered.
    pub fn placeholder() -> Self {
        Self { lines: [PLACEHOLDER.to_string(), String::new(), String::new(), String::new()] }
    }

    /// Display lines, top to bottom.
    pub fn lines(&self) -> &[String; DISPLAY_LINES] {
        &self.lines
    }

    /// Wire form: lines joined by `\n`.
    pub fn message(&self) -> String {
        self.lines.join("\n")
    }
}

impl fmt::Display for DisplayBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}
