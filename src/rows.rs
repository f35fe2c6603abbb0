use serde::Serialize;

use crate::aggregate::Snapshot;
use crate::game::GameResult;
use crate::roster::{Roster, Side};
use crate::stats::{Stat, StatLine};

pub const PLAYER_COLUMNS: [&str; 30] = [
    "gameid",
    "quarter",
    "time",
    "team",
    "player",
    "in_game",
    "uPER",
    "PIR",
    "MIN",
    "PTS",
    "FGM",
    "FGA",
    "3PM",
    "3PA",
    "FTM",
    "FTA",
    "TREB",
    "OREB",
    "DREB",
    "AST",
    "STL",
    "BLK",
    "TO",
    "PF",
    "PFD",
    "home",
    "home_score",
    "away_score",
    "winner",
    "play",
];

pub const TEAM_COLUMNS: [&str; 22] = [
    "gameid", "quarter", "time", "team", "MIN", "PTS", "FGM", "FGA", "3PM", "3PA", "FTM", "FTA",
    "TREB", "OREB", "DREB", "AST", "STL", "BLK", "TO", "PF", "PFD", "winner",
];

/// One output value, typed for whichever sink writes it.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Int(i64),
    Real(f64),
    Bool(bool),
    Null,
}

/// Counting stats as they appear in output rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RowStats {
    #[serde(rename = "PTS")]
    pub pts: f64,
    #[serde(rename = "FGM")]
    pub fgm: f64,
    #[serde(rename = "FGA")]
    pub fga: f64,
    #[serde(rename = "3PM")]
    pub three_pm: f64,
    #[serde(rename = "3PA")]
    pub three_pa: f64,
    #[serde(rename = "FTM")]
    pub ftm: f64,
    #[serde(rename = "FTA")]
    pub fta: f64,
    #[serde(rename = "TREB")]
    pub treb: f64,
    #[serde(rename = "OREB")]
    pub oreb: f64,
    #[serde(rename = "DREB")]
    pub dreb: f64,
    #[serde(rename = "AST")]
    pub ast: f64,
    #[serde(rename = "STL")]
    pub stl: f64,
    #[serde(rename = "BLK")]
    pub blk: f64,
    #[serde(rename = "TO")]
    pub to: f64,
    #[serde(rename = "PF")]
    pub pf: f64,
    #[serde(rename = "PFD")]
    pub pfd: f64,
}

impl RowStats {
    pub fn from_line(line: &StatLine) -> Self {
        Self {
            pts: line.get(Stat::Pts),
            fgm: line.get(Stat::Fgm),
            fga: line.get(Stat::Fga),
            three_pm: line.get(Stat::ThreePm),
            three_pa: line.get(Stat::ThreePa),
            ftm: line.get(Stat::Ftm),
            fta: line.get(Stat::Fta),
            treb: line.get(Stat::Treb),
            oreb: line.get(Stat::Oreb),
            dreb: line.get(Stat::Dreb),
            ast: line.get(Stat::Ast),
            stl: line.get(Stat::Stl),
            blk: line.get(Stat::Blk),
            to: line.get(Stat::To),
            pf: line.get(Stat::Pf),
            pfd: line.get(Stat::Pfd),
        }
    }

    pub fn values(&self) -> [f64; 16] {
        [
            self.pts,
            self.fgm,
            self.fga,
            self.three_pm,
            self.three_pa,
            self.ftm,
            self.fta,
            self.treb,
            self.oreb,
            self.dreb,
            self.ast,
            self.stl,
            self.blk,
            self.to,
            self.pf,
            self.pfd,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerRow {
    pub gameid: String,
    pub quarter: u8,
    pub time: String,
    pub team: String,
    pub player: String,
    pub in_game: bool,
    #[serde(rename = "uPER")]
    pub uper: f64,
    #[serde(rename = "PIR")]
    pub pir: f64,
    #[serde(rename = "MIN")]
    pub min: u32,
    #[serde(flatten)]
    pub stats: RowStats,
    pub home: bool,
    pub home_score: u32,
    pub away_score: u32,
    pub winner: String,
    pub play: Option<String>,
}

impl PlayerRow {
    /// Values in `PLAYER_COLUMNS` order.
    pub fn cells(&self) -> Vec<Cell> {
        let mut cells = Vec::with_capacity(PLAYER_COLUMNS.len());
        cells.push(Cell::Text(self.gameid.clone()));
        cells.push(Cell::Int(i64::from(self.quarter)));
        cells.push(Cell::Text(self.time.clone()));
        cells.push(Cell::Text(self.team.clone()));
        cells.push(Cell::Text(self.player.clone()));
        cells.push(Cell::Bool(self.in_game));
        cells.push(Cell::Real(self.uper));
        cells.push(Cell::Real(self.pir));
        cells.push(Cell::Int(i64::from(self.min)));
        cells.extend(self.stats.values().into_iter().map(Cell::Real));
        cells.push(Cell::Bool(self.home));
        cells.push(Cell::Int(i64::from(self.home_score)));
        cells.push(Cell::Int(i64::from(self.away_score)));
        cells.push(Cell::Text(self.winner.clone()));
        cells.push(match &self.play {
            Some(play) => Cell::Text(play.clone()),
            None => Cell::Null,
        });
        cells
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamRow {
    pub gameid: String,
    pub quarter: u8,
    pub time: String,
    pub team: String,
    /// Game minutes elapsed at this slice.
    #[serde(rename = "MIN")]
    pub min: u32,
    #[serde(flatten)]
    pub stats: RowStats,
    pub winner: String,
}

impl TeamRow {
    /// Values in `TEAM_COLUMNS` order.
    pub fn cells(&self) -> Vec<Cell> {
        let mut cells = Vec::with_capacity(TEAM_COLUMNS.len());
        cells.push(Cell::Text(self.gameid.clone()));
        cells.push(Cell::Int(i64::from(self.quarter)));
        cells.push(Cell::Text(self.time.clone()));
        cells.push(Cell::Text(self.team.clone()));
        cells.push(Cell::Int(i64::from(self.min)));
        cells.extend(self.stats.values().into_iter().map(Cell::Real));
        cells.push(Cell::Text(self.winner.clone()));
        cells
    }
}

pub fn build_rows(
    game_id: &str,
    roster: &Roster,
    result: &GameResult,
    snapshots: &[Snapshot],
) -> (Vec<PlayerRow>, Vec<TeamRow>) {
    let mut player_rows = Vec::with_capacity(snapshots.iter().map(|s| s.players.len()).sum());
    let mut team_rows = Vec::with_capacity(snapshots.len() * 2);

    for snapshot in snapshots {
        let time = snapshot.clock.label();
        let quarter = snapshot.clock.quarter;

        for row in &snapshot.players {
            player_rows.push(PlayerRow {
                gameid: game_id.to_string(),
                quarter,
                time: time.clone(),
                team: roster.team_id(row.side).to_string(),
                player: row.player.clone(),
                in_game: row.in_game,
                uper: row.uper,
                pir: row.pir,
                min: row.minutes,
                stats: RowStats::from_line(&row.stats),
                home: row.side == Side::Home,
                home_score: snapshot.home_score,
                away_score: snapshot.away_score,
                winner: result.winner.clone(),
                play: snapshot.play.clone(),
            });
        }

        for side in Side::BOTH {
            team_rows.push(TeamRow {
                gameid: game_id.to_string(),
                quarter,
                time: time.clone(),
                team: roster.team_id(side).to_string(),
                min: snapshot.clock.game_elapsed() / 60,
                stats: RowStats::from_line(snapshot.team_totals(side)),
                winner: result.winner.clone(),
            });
        }
    }

    (player_rows, team_rows)
}
