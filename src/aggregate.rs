use std::collections::HashMap;

use crate::clock::GameClock;
use crate::roster::{Roster, Side};
use crate::stats::StatLine;
use crate::tracker::{Correction, Tracker};

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSnapshot {
    pub player: String,
    pub side: Side,
    pub stats: StatLine,
    pub minutes: u32,
    pub in_game: bool,
    pub uper: f64,
    pub pir: f64,
}

/// The whole box score at one (quarter, clock) instant.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub clock: GameClock,
    /// `None` for gap-fill rows.
    pub play: Option<String>,
    pub home_score: u32,
    pub away_score: u32,
    pub players: Vec<PlayerSnapshot>,
    /// Running team totals, indexed by `Side::index`.
    pub team_totals: [StatLine; 2],
}

impl Snapshot {
    pub fn key(&self) -> (u8, u32) {
        (self.clock.quarter, self.clock.secs_left)
    }

    pub fn player(&self, name: &str) -> Option<&PlayerSnapshot> {
        self.players.iter().find(|p| p.player == name)
    }

    pub fn side(&self, side: Side) -> impl Iterator<Item = &PlayerSnapshot> {
        self.players.iter().filter(move |p| p.side == side)
    }

    pub fn in_game_count(&self, side: Side) -> usize {
        self.side(side).filter(|p| p.in_game).count()
    }

    pub fn team_totals(&self, side: Side) -> &StatLine {
        &self.team_totals[side.index()]
    }

    /// Rewrites the corrected player's row. Returns false when the player has
    /// no row here or the correction changes nothing.
    pub fn apply_correction(&mut self, correction: &Correction) -> bool {
        if correction.is_noop() {
            return false;
        }
        let Some(row) = self
            .players
            .iter_mut()
            .find(|p| p.player == correction.player)
        else {
            return false;
        };
        let adjusted = i64::from(row.minutes) + correction.minutes;
        row.minutes =
            u32::try_from(adjusted.max(i64::from(correction.floor_minutes))).unwrap_or(row.minutes);
        if let Some(in_game) = correction.in_game {
            row.in_game = in_game;
        }
        true
    }

    /// Copy of this snapshot at another instant, marked as synthetic.
    pub fn carried_to(&self, clock: GameClock) -> Snapshot {
        Snapshot {
            clock,
            play: None,
            home_score: self.home_score,
            away_score: self.away_score,
            players: self.players.clone(),
            team_totals: self.team_totals,
        }
    }
}

#[derive(Debug, Clone)]
struct PlayerLine {
    player: String,
    side: Side,
    stats: StatLine,
}

/// Cumulative per-player stat lines plus incrementally maintained team totals.
#[derive(Debug, Clone, Default)]
pub struct BoxScore {
    lines: Vec<PlayerLine>,
    index: HashMap<String, usize>,
    team_totals: [StatLine; 2],
}

impl BoxScore {
    /// Starts with both starting fives so every snapshot shows ten players on court.
    pub fn with_starters(roster: &Roster) -> Self {
        let mut box_score = Self::default();
        for side in Side::BOTH {
            for name in &roster.team(side).starters {
                box_score.ensure(name, side);
            }
        }
        box_score
    }

    /// Adds a zeroed line for `player` on first appearance.
    pub fn ensure(&mut self, player: &str, side: Side) {
        if self.index.contains_key(player) {
            return;
        }
        self.index.insert(player.to_string(), self.lines.len());
        self.lines.push(PlayerLine {
            player: player.to_string(),
            side,
            stats: StatLine::new(),
        });
    }

    pub fn apply(&mut self, player: &str, side: Side, delta: &StatLine) {
        self.ensure(player, side);
        if let Some(idx) = self.index.get(player) {
            let line = &mut self.lines[*idx];
            line.stats.merge(delta);
            self.team_totals[line.side.index()].merge(delta);
        }
    }

    pub fn stats(&self, player: &str) -> Option<&StatLine> {
        self.index.get(player).map(|idx| &self.lines[*idx].stats)
    }

    pub fn team_totals(&self, side: Side) -> &StatLine {
        &self.team_totals[side.index()]
    }

    pub fn snapshot(
        &self,
        clock: GameClock,
        play: Option<String>,
        home_score: u32,
        away_score: u32,
        tracker: &Tracker,
    ) -> Snapshot {
        let players = self
            .lines
            .iter()
            .map(|line| PlayerSnapshot {
                player: line.player.clone(),
                side: line.side,
                stats: line.stats,
                minutes: tracker.minutes(&line.player),
                in_game: tracker.is_on_court(&line.player),
                uper: 0.0,
                pir: 0.0,
            })
            .collect();
        Snapshot {
            clock,
            play,
            home_score,
            away_score,
            players,
            team_totals: self.team_totals,
        }
    }
}

/// Ordered snapshots emitted so far in a game.
#[derive(Debug, Clone, Default)]
pub struct SnapshotLog {
    snapshots: Vec<Snapshot>,
}

impl SnapshotLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `snapshot`, or replaces the last one when both share a
    /// (quarter, clock) key. Replaced play text is kept, joined with "; ".
    pub fn push(&mut self, mut snapshot: Snapshot) {
        if let Some(last) = self.snapshots.last_mut()
            && last.key() == snapshot.key()
        {
            snapshot.play = match (last.play.take(), snapshot.play.take()) {
                (Some(earlier), Some(later)) => Some(format!("{earlier}; {later}")),
                (earlier, later) => later.or(earlier),
            };
            *last = snapshot;
            return;
        }
        self.snapshots.push(snapshot);
    }

    /// Rewrites `correction.player`'s rows in the correction's quarter.
    /// Returns how many rows changed.
    pub fn apply_correction(&mut self, correction: &Correction) -> usize {
        if correction.is_noop() {
            return 0;
        }
        let mut touched = 0;
        for snapshot in self.snapshots.iter_mut().rev() {
            if snapshot.clock.quarter != correction.quarter {
                break;
            }
            if snapshot.apply_correction(correction) {
                touched += 1;
            }
        }
        touched
    }

    /// True when every emitted row belongs to `quarter`, so a correction for
    /// that quarter also reaches whatever came before the log.
    pub fn spans_only(&self, quarter: u8) -> bool {
        self.snapshots.iter().all(|s| s.clock.quarter == quarter)
    }

    pub fn as_slice(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn into_snapshots(self) -> Vec<Snapshot> {
        self.snapshots
    }
}
