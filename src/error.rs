use std::fmt;

use thiserror::Error;

use crate::clock::GameClock;
use crate::roster::Side;

/// Failures that abort a single game's fold.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GameError {
    #[error("unknown player {name:?} (not on either roster)")]
    UnknownPlayer { name: String },

    #[error("invalid game {game_id}: {reason}")]
    InvalidGame { game_id: String, reason: String },

    #[error("invalid clock reading {raw:?}")]
    InvalidClock { raw: String },

    #[error("invalid roster: {reason}")]
    InvalidRoster { reason: String },

    #[error("feed error: {0}")]
    Feed(String),
}

impl GameError {
    /// Skipped games are excluded from retry; everything else counts as errored.
    pub fn is_skip(&self) -> bool {
        matches!(self, GameError::InvalidGame { .. })
    }
}

/// Non-fatal findings recorded while folding a game.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    UnrecognizedPlay {
        at: GameClock,
        text: String,
    },
    InconsistentOnCourtCount {
        at: GameClock,
        side: Side,
        count: usize,
    },
    MinutesCorrection {
        at: GameClock,
        player: String,
        minutes: i64,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnrecognizedPlay { at, text } => {
                write!(f, "{at}: no stat for play {text:?}")
            }
            Diagnostic::InconsistentOnCourtCount { at, side, count } => {
                write!(f, "{at}: {side:?} has {count} players on court")
            }
            Diagnostic::MinutesCorrection {
                at,
                player,
                minutes,
            } => write!(f, "{at}: corrected {player} by {minutes:+} min"),
        }
    }
}
