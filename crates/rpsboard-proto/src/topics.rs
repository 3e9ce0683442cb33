//! Device channel naming scheme.
//!
//! Every board owns a topic subtree rooted at `<namespace>/<board_id>`. The
//! session only ever talks about logical [`Channel`]s; [`Topics`] maps them to
//! concrete broker topics and decodes incoming payloads into [`DeviceInput`].
//!
//! | Channel | Direction | Suffix |
//! |---|---|---|
//! | [`Channel::Selector`] | in | `encoder/1/status` |
//! | [`Channel::PlayButton`] | in | `button/1/status` |
//! | [`Channel::DisplayMode`] | out | `display/1/show` |
//! | [`Channel::DisplayMessage`] | out | `display/1/message` |
//! | [`Channel::BoardStatus`] | in | `<board_id>//status` |

use crate::errors::DecodeError;

/// Namespace used by the field deployment.
pub const DEFAULT_NAMESPACE: &str = "tw";

/// Display mode that selects the four-line message screen.
pub const DISPLAY_MODE_MESSAGE: &str = "4";

/// Board status token announcing the board is up.
const BOARD_ONLINE: &str = "online";

/// Board status token announcing the board went away.
const BOARD_OFFLINE: &str = "offline";

/// Message direction relative to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Device to controller.
    Incoming,
    /// Controller to device.
    Outgoing,
}

/// Logical device channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Rotary selector position (free-running integer).
    Selector,
    /// Play button edges.
    PlayButton,
    /// Display mode selection.
    DisplayMode,
    /// Four-line display content.
    DisplayMessage,
    /// Board online/offline announcements (handshake variant only).
    BoardStatus,
}

impl Channel {
    /// Whether the controller subscribes to or publishes on this channel.
    pub const fn direction(self) -> Direction {
        match self {
            Self::Selector | Self::PlayButton | Self::BoardStatus => Direction::Incoming,
            Self::DisplayMode | Self::DisplayMessage => Direction::Outgoing,
        }
    }

    /// Channels a session subscribes to, in subscription order.
    ///
    /// Board status is only part of the handshake variant of the protocol.
    pub fn incoming(handshake: bool) -> Vec<Self> {
        let mut channels = vec![Self::Selector, Self::PlayButton];
        if handshake {
            channels.push(Self::BoardStatus);
        }
        channels
    }
}

/// Play button edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEdge {
    /// Button went down.
    Pressed,
    /// Button came back up.
    Released,
    /// Complete press and release reported as one message.
    Clicked,
}

/// Board status announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardStatus {
    /// Board is up.
    Online,
    /// Board went away.
    Offline,
}

/// Decoded incoming device message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceInput {
    /// Raw selector position.
    Selector(i64),
    /// Play button edge.
    Button(ButtonEdge),
    /// Board status announcement.
    BoardStatus(BoardStatus),
}

/// Payload tokens the play button firmware emits.
///
/// Two firmware dialects exist in the field: one reports separate `ON`/`OFF`
/// edges, the other a single `CLICKED` on release. Both are accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonTokens {
    /// Token for the press edge.
    pub pressed: String,
    /// Token for the release edge.
    pub released: String,
    /// Token for a complete click.
    pub clicked: String,
}

impl Default for ButtonTokens {
    fn default() -> Self {
        Self { pressed: "ON".into(), released: "OFF".into(), clicked: "CLICKED".into() }
    }
}

impl ButtonTokens {
    fn edge(&self, token: &str) -> Option<ButtonEdge> {
        if token == self.pressed {
            Some(ButtonEdge::Pressed)
        } else if token == self.released {
            Some(ButtonEdge::Released)
        } else if token == self.clicked {
            Some(ButtonEdge::Clicked)
        } else {
            None
        }
    }
}

/// Topic naming for one board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topics {
    board_id: String,
    prefix: String,
    buttons: ButtonTokens,
}

impl Topics {
    /// Topics under `<namespace>/<board_id>`.
    pub fn new(namespace: &str, board_id: &str) -> Self {
        Self {
            board_id: board_id.to_string(),
            prefix: format!("{namespace}/{board_id}"),
            buttons: ButtonTokens::default(),
        }
    }

    /// Topics under the deployment namespace.
    pub fn for_board(board_id: &str) -> Self {
        Self::new(DEFAULT_NAMESPACE, board_id)
    }

    /// Replace the play button token set.
    #[must_use]
    pub fn with_button_tokens(mut self, buttons: ButtonTokens) -> Self {
        self.buttons = buttons;
        self
    }

    /// Topic prefix (`<namespace>/<board_id>`).
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Concrete topic for a channel.
    pub fn topic(&self, channel: Channel) -> String {
        let prefix = &self.prefix;
        match channel {
            Channel::Selector => format!("{prefix}/encoder/1/status"),
            Channel::PlayButton => format!("{prefix}/button/1/status"),
            Channel::DisplayMode => format!("{prefix}/display/1/show"),
            Channel::DisplayMessage => format!("{prefix}/display/1/message"),
            Channel::BoardStatus => format!("{prefix}/{}//status", self.board_id),
        }
    }

    /// Incoming channel a topic belongs to. `None` for foreign or outgoing
    /// topics.
    pub fn channel_of(&self, topic: &str) -> Option<Channel> {
        [Channel::Selector, Channel::PlayButton, Channel::BoardStatus]
            .into_iter()
            .find(|channel| self.topic(*channel) == topic)
    }

    /// Decode an incoming message.
    ///
    /// Surrounding whitespace in the payload is ignored; everything else must
    /// match exactly.
    pub fn decode(&self, topic: &str, payload: &[u8]) -> Result<DeviceInput, DecodeError> {
        let channel =
            self.channel_of(topic).ok_or_else(|| DecodeError::UnknownTopic(topic.to_string()))?;
        let text = std::str::from_utf8(payload)
            .map_err(|_| DecodeError::NotUtf8 { topic: topic.to_string() })?
            .trim();

        match channel {
            Channel::Selector => text.parse::<i64>().map(DeviceInput::Selector).map_err(|source| {
                DecodeError::InvalidSelector { payload: text.to_string(), source }
            }),
            Channel::PlayButton => self
                .buttons
                .edge(text)
                .map(DeviceInput::Button)
                .ok_or_else(|| DecodeError::UnknownButtonToken(text.to_string())),
            Channel::BoardStatus => match text {
                BOARD_ONLINE => Ok(DeviceInput::BoardStatus(BoardStatus::Online)),
                BOARD_OFFLINE => Ok(DeviceInput::BoardStatus(BoardStatus::Offline)),
                other => Err(DecodeError::UnknownBoardStatus(other.to_string())),
            },
            Channel::DisplayMode | Channel::DisplayMessage => {
                Err(DecodeError::UnknownTopic(topic.to_string()))
            },
        }
    }
}
