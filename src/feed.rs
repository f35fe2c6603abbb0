use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::roster::{Roster, TeamRoster};

/// One play-by-play line, in feed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayEvent {
    pub quarter: u8,
    pub clock: String,
    pub text: String,
    #[serde(default)]
    pub team: Option<String>,
    pub home_score: u32,
    pub away_score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub players: Vec<String>,
    pub starters: Vec<String>,
}

/// On-disk game feed: roster plus ordered plays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameFeed {
    pub game_id: String,
    pub home: String,
    pub away: String,
    pub roster: HashMap<String, RosterEntry>,
    #[serde(default)]
    pub plays: Vec<PlayEvent>,
    /// Set by the scraper when the upstream id turned out not to be a game.
    #[serde(default)]
    pub invalid: bool,
}

impl GameFeed {
    pub fn parse(raw: &str) -> Result<Self, GameError> {
        serde_json::from_str::<GameFeed>(raw.trim())
            .map_err(|err| GameError::Feed(format!("invalid game feed json: {err}")))
    }

    pub fn roster(&self) -> Result<Roster, GameError> {
        let team = |id: &str| -> Result<TeamRoster, GameError> {
            let entry = self.roster.get(id).ok_or_else(|| GameError::InvalidRoster {
                reason: format!("no roster for team {id}"),
            })?;
            Ok(TeamRoster {
                team: id.to_string(),
                players: entry.players.clone(),
                starters: entry.starters.clone(),
            })
        };
        Roster::new(team(&self.home)?, team(&self.away)?)
    }
}

/// Where a game's plays and roster come from. Each call is an independent
/// fetch so a caller can retry one without redoing the other.
pub trait GameSource: Sync {
    fn plays(&self, game_id: &str) -> Result<Vec<PlayEvent>, GameError>;
    fn roster(&self, game_id: &str) -> Result<Roster, GameError>;

    /// Roster and plays together. Sources that hold both in one document
    /// should override this to fetch it once.
    fn game(&self, game_id: &str) -> Result<(Roster, Vec<PlayEvent>), GameError> {
        let roster = self.roster(game_id)?;
        Ok((roster, self.plays(game_id)?))
    }
}

/// Reads `<dir>/<game_id>.json` feeds.
#[derive(Debug, Clone)]
pub struct FileSource {
    dir: PathBuf,
}

impl FileSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn feed_path(&self, game_id: &str) -> PathBuf {
        self.dir.join(format!("{game_id}.json"))
    }

    pub fn load(&self, game_id: &str) -> Result<GameFeed, GameError> {
        let path = self.feed_path(game_id);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(GameError::InvalidGame {
                    game_id: game_id.to_string(),
                    reason: format!("no feed at {}", path.display()),
                });
            }
            Err(err) => {
                return Err(GameError::Feed(format!("read {}: {err}", path.display())));
            }
        };
        let feed = GameFeed::parse(&raw)?;
        if feed.invalid {
            return Err(GameError::InvalidGame {
                game_id: game_id.to_string(),
                reason: "feed marked invalid upstream".to_string(),
            });
        }
        Ok(feed)
    }

    /// Game ids of every `*.json` feed in the directory, sorted.
    pub fn list_game_ids(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.dir)
            .with_context(|| format!("read feed dir {}", self.dir.display()))?;
        let mut ids = Vec::new();
        for entry in entries {
            let path = entry.context("read feed dir entry")?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }
}

impl GameSource for FileSource {
    fn plays(&self, game_id: &str) -> Result<Vec<PlayEvent>, GameError> {
        let feed = self.load(game_id)?;
        require_plays(game_id, &feed)?;
        Ok(feed.plays)
    }

    fn roster(&self, game_id: &str) -> Result<Roster, GameError> {
        self.load(game_id)?.roster()
    }

    fn game(&self, game_id: &str) -> Result<(Roster, Vec<PlayEvent>), GameError> {
        let feed = self.load(game_id)?;
        let roster = feed.roster()?;
        require_plays(game_id, &feed)?;
        Ok((roster, feed.plays))
    }
}

fn require_plays(game_id: &str, feed: &GameFeed) -> Result<(), GameError> {
    if feed.plays.is_empty() {
        return Err(GameError::InvalidGame {
            game_id: game_id.to_string(),
            reason: "feed has no plays".to_string(),
        });
    }
    Ok(())
}
