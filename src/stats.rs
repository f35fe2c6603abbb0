use std::fmt;

use serde::{Deserialize, Serialize};

/// Box-score counting stats tracked per player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stat {
    #[serde(rename = "PTS")]
    Pts,
    #[serde(rename = "FGM")]
    Fgm,
    #[serde(rename = "FGA")]
    Fga,
    #[serde(rename = "3PM")]
    ThreePm,
    #[serde(rename = "3PA")]
    ThreePa,
    #[serde(rename = "FTM")]
    Ftm,
    #[serde(rename = "FTA")]
    Fta,
    #[serde(rename = "TREB")]
    Treb,
    #[serde(rename = "OREB")]
    Oreb,
    #[serde(rename = "DREB")]
    Dreb,
    #[serde(rename = "AST")]
    Ast,
    #[serde(rename = "STL")]
    Stl,
    #[serde(rename = "BLK")]
    Blk,
    #[serde(rename = "TO")]
    To,
    #[serde(rename = "PF")]
    Pf,
    #[serde(rename = "PFD")]
    Pfd,
    #[serde(rename = "BLKD")]
    Blkd,
}

impl Stat {
    pub const COUNT: usize = 17;

    pub const ALL: [Stat; Stat::COUNT] = [
        Stat::Pts,
        Stat::Fgm,
        Stat::Fga,
        Stat::ThreePm,
        Stat::ThreePa,
        Stat::Ftm,
        Stat::Fta,
        Stat::Treb,
        Stat::Oreb,
        Stat::Dreb,
        Stat::Ast,
        Stat::Stl,
        Stat::Blk,
        Stat::To,
        Stat::Pf,
        Stat::Pfd,
        Stat::Blkd,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Stat::Pts => "PTS",
            Stat::Fgm => "FGM",
            Stat::Fga => "FGA",
            Stat::ThreePm => "3PM",
            Stat::ThreePa => "3PA",
            Stat::Ftm => "FTM",
            Stat::Fta => "FTA",
            Stat::Treb => "TREB",
            Stat::Oreb => "OREB",
            Stat::Dreb => "DREB",
            Stat::Ast => "AST",
            Stat::Stl => "STL",
            Stat::Blk => "BLK",
            Stat::To => "TO",
            Stat::Pf => "PF",
            Stat::Pfd => "PFD",
            Stat::Blkd => "BLKD",
        }
    }

    pub fn from_code(code: &str) -> Option<Stat> {
        Stat::ALL.into_iter().find(|stat| stat.code() == code)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Dense stat vector. Missing stats read as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatLine([f64; Stat::COUNT]);

impl StatLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: &[(Stat, f64)]) -> Self {
        let mut line = Self::default();
        for (stat, value) in pairs {
            line.add(*stat, *value);
        }
        line
    }

    pub fn get(&self, stat: Stat) -> f64 {
        self.0[stat.index()]
    }

    pub fn has(&self, stat: Stat) -> bool {
        self.get(stat) != 0.0
    }

    pub fn add(&mut self, stat: Stat, value: f64) {
        self.0[stat.index()] += value;
    }

    pub fn merge(&mut self, other: &StatLine) {
        for (slot, value) in self.0.iter_mut().zip(other.0.iter()) {
            *slot += value;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|v| *v == 0.0)
    }
}

/// Per-play stat increments, primary actor first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayDelta {
    lines: Vec<(String, StatLine)>,
}

impl PlayDelta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(player: impl Into<String>, line: StatLine) -> Self {
        let mut delta = Self::new();
        delta.credit(player, line);
        delta
    }

    /// Adds `line` to `player`, appending the player if not yet present.
    pub fn credit(&mut self, player: impl Into<String>, line: StatLine) {
        let player = player.into();
        if let Some((_, existing)) = self.lines.iter_mut().find(|(name, _)| *name == player) {
            existing.merge(&line);
        } else {
            self.lines.push((player, line));
        }
    }

    pub fn primary(&self) -> Option<(&str, &StatLine)> {
        self.lines.first().map(|(name, line)| (name.as_str(), line))
    }

    pub fn get(&self, player: &str) -> Option<&StatLine> {
        self.lines
            .iter()
            .find(|(name, _)| name == player)
            .map(|(_, line)| line)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StatLine)> {
        self.lines.iter().map(|(name, line)| (name.as_str(), line))
    }

    pub fn players(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
