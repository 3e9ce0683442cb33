//! Rock/Paper/Scissors symbol algebra.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::UnknownSymbol;

/// One of the three playable symbols.
///
/// Ordered `Rock < Paper < Scissors` (indices 0..2). The selector walks this
/// order cyclically: the successor of `Scissors` is `Rock` and the
/// predecessor of `Rock` is `Scissors`.
///
/// Serializes as its canonical name, which is also what the referee expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[derive(Serialize, Deserialize)]
pub enum Symbol {
    /// Index 0.
    #[default]
    Rock,
    /// Index 1.
    Paper,
    /// Index 2.
    Scissors,
}

impl Symbol {
    /// All symbols in index order.
    pub const ALL: [Self; 3] = [Self::Rock, Self::Paper, Self::Scissors];

    /// Position in the cyclic order (0..=2).
    pub const fn index(self) -> usize {
        match self {
            Self::Rock => 0,
            Self::Paper => 1,
            Self::Scissors => 2,
        }
    }

    /// Symbol at `index` modulo 3.
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % 3]
    }

    /// Next symbol, wrapping `Scissors` to `Rock`.
    #[must_use]
    pub const fn successor(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// Previous symbol, wrapping `Rock` to `Scissors`.
    #[must_use]
    pub const fn predecessor(self) -> Self {
        Self::from_index(self.index() + 2)
    }

    /// Canonical name as sent on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rock => "Rock",
            Self::Paper => "Paper",
            Self::Scissors => "Scissors",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Symbol {
    type Err = UnknownSymbol;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|symbol| symbol.as_str() == s)
            .ok_or_else(|| UnknownSymbol(s.to_string()))
    }
}
