//! Referee request and response bodies.
//!
//! The referee speaks JSON. Registration sends a [`Board`]; each round sends
//! a [`PlayRequest`] and receives a [`PlayResponse`]. Symbols inside a
//! response stay as text until [`MatchOutcome::try_from`] validates them, so
//! an unrecognised symbol is a recoverable parse result instead of a body
//! decoding failure.
//!
//! Older referee builds name fields from their own point of view
//! (`MasterScore` is the opponent, `SlaveScore` is this board). Those names
//! are accepted as aliases.

use serde::{Deserialize, Serialize};

use crate::{Symbol, errors::UnknownSymbol};

/// Board identity sent at registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Stable board identifier, also the topic namespace key.
    #[serde(rename = "boardID", alias = "BoardID")]
    pub board_id: String,
}

impl Board {
    /// Board with the given identifier.
    pub fn new(board_id: impl Into<String>) -> Self {
        Self { board_id: board_id.into() }
    }
}

/// Body of a play submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayRequest {
    /// Symbol this board plays.
    pub symbol: Symbol,
}

/// One historical round as the referee reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Symbol this board played.
    #[serde(alias = "SlaveSymbol")]
    pub own_symbol: String,
    /// Symbol the opponent played.
    #[serde(alias = "MasterSymbol")]
    pub opponent_symbol: String,
}

/// Referee response to a play submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayResponse {
    /// Score of this board after the round.
    #[serde(alias = "SlaveScore")]
    pub own_score: u32,
    /// Score of the opponent after the round.
    #[serde(alias = "MasterScore")]
    pub opponent_score: u32,
    /// Symbol the opponent played this round.
    #[serde(alias = "MasterSymbol")]
    pub opponent_symbol: String,
    /// All rounds of the match, oldest first.
    #[serde(default, alias = "GameHistory")]
    pub history: Vec<HistoryEntry>,
}

/// A validated round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Round {
    /// Symbol this board played.
    pub own: Symbol,
    /// Symbol the opponent played.
    pub opponent: Symbol,
}

/// Validated result of one play call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    /// Score of this board.
    pub own_score: u32,
    /// Score of the opponent.
    pub opponent_score: u32,
    /// Symbol the opponent played this round.
    pub opponent_symbol: Symbol,
    /// All rounds of the match, oldest first.
    pub history: Vec<Round>,
}

impl TryFrom<PlayResponse> for MatchOutcome {
    type Error = UnknownSymbol;

    fn try_from(response: PlayResponse) -> Result<Self, Self::Error> {
        let history = response
            .history
            .iter()
            .map(|entry| -> Result<Round, UnknownSymbol> {
                Ok(Round {
                    own: entry.own_symbol.parse()?,
                    opponent: entry.opponent_symbol.parse()?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            own_score: response.own_score,
            opponent_score: response.opponent_score,
            opponent_symbol: response.opponent_symbol.parse()?,
            history,
        })
    }
}
