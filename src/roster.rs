use serde::{Deserialize, Serialize};

use crate::error::GameError;

pub const ON_COURT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Home, Side::Away];

    pub fn index(self) -> usize {
        match self {
            Side::Home => 0,
            Side::Away => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRoster {
    pub team: String,
    pub players: Vec<String>,
    pub starters: Vec<String>,
}

/// Both teams' players for one game, with name resolution for play text.
#[derive(Debug, Clone, PartialEq)]
pub struct Roster {
    home: TeamRoster,
    away: TeamRoster,
}

impl Roster {
    pub fn new(home: TeamRoster, away: TeamRoster) -> Result<Self, GameError> {
        for side in [&home, &away] {
            if side.starters.len() != ON_COURT {
                return Err(GameError::InvalidRoster {
                    reason: format!(
                        "{} lists {} starters, expected {ON_COURT}",
                        side.team,
                        side.starters.len()
                    ),
                });
            }
            if let Some(missing) = side.starters.iter().find(|s| !side.players.contains(s)) {
                return Err(GameError::InvalidRoster {
                    reason: format!("starter {missing} is not on the {} roster", side.team),
                });
            }
        }
        if home.team == away.team {
            return Err(GameError::InvalidRoster {
                reason: format!("home and away are both {}", home.team),
            });
        }
        Ok(Self { home, away })
    }

    pub fn team(&self, side: Side) -> &TeamRoster {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }

    pub fn team_id(&self, side: Side) -> &str {
        &self.team(side).team
    }

    /// Maps a name from play text onto a roster entry.
    ///
    /// Exact matches win; otherwise the first-two-token key is compared, which
    /// absorbs suffixes such as "Jr." that the feed drops. Anything ambiguous is
    /// reported as unknown rather than guessed.
    pub fn resolve(&self, name: &str) -> Result<(Side, &str), GameError> {
        let exact = self.candidates(|player| player == name);
        if let [only] = exact.as_slice() {
            return Ok(*only);
        }
        if exact.is_empty() {
            let key = name_key(name);
            let keyed = self.candidates(|player| name_key(player) == key);
            if let [only] = keyed.as_slice() {
                return Ok(*only);
            }
        }
        Err(GameError::UnknownPlayer {
            name: name.to_string(),
        })
    }

    fn candidates(&self, pred: impl Fn(&str) -> bool) -> Vec<(Side, &str)> {
        let mut out = Vec::new();
        for side in Side::BOTH {
            for player in &self.team(side).players {
                if pred(player.as_str()) {
                    out.push((side, player.as_str()));
                }
            }
        }
        out
    }
}

/// The first two whitespace tokens, which is how play text names a player.
pub fn name_key(name: &str) -> String {
    name.split_whitespace()
        .take(2)
        .collect::<Vec<_>>()
        .join(" ")
}
