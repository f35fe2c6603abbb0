use serde::Serialize;
use tracing::{debug, info, warn};

use crate::aggregate::{BoxScore, Snapshot, SnapshotLog};
use crate::classify::{Play, parse_play};
use crate::clock::GameClock;
use crate::error::{Diagnostic, GameError};
use crate::feed::PlayEvent;
use crate::gap_fill::fill_gaps;
use crate::metrics;
use crate::roster::{ON_COURT, Roster, Side};
use crate::rows::{PlayerRow, TeamRow, build_rows};
use crate::tracker::{Correction, Tracker};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameResult {
    pub home: String,
    pub away: String,
    pub winner: String,
    pub home_score: u32,
    pub away_score: u32,
}

impl GameResult {
    /// Ties go to the home side; a finished game never ends level.
    pub fn from_final(roster: &Roster, home_score: u32, away_score: u32) -> Self {
        let home = roster.team_id(Side::Home).to_string();
        let away = roster.team_id(Side::Away).to_string();
        let winner = if home_score >= away_score {
            home.clone()
        } else {
            away.clone()
        };
        Self {
            home,
            away,
            winner,
            home_score,
            away_score,
        }
    }

    pub fn point_diff(&self) -> i64 {
        i64::from(self.home_score) - i64::from(self.away_score)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoldOptions {
    pub gap_fill: bool,
}

impl Default for FoldOptions {
    fn default() -> Self {
        Self { gap_fill: true }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameOutput {
    pub game_id: String,
    pub result: GameResult,
    pub player_rows: Vec<PlayerRow>,
    pub team_rows: Vec<TeamRow>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Per-game fold state. One context per game; nothing is shared across games.
#[derive(Debug)]
pub struct GameContext<'a> {
    game_id: String,
    roster: &'a Roster,
    tracker: Tracker,
    box_score: BoxScore,
    log: SnapshotLog,
    opening: Snapshot,
    diagnostics: Vec<Diagnostic>,
    scores: (u32, u32),
    court_counts: [usize; 2],
}

impl<'a> GameContext<'a> {
    pub fn new(game_id: impl Into<String>, roster: &'a Roster) -> Self {
        let tracker = Tracker::new(roster);
        let box_score = BoxScore::with_starters(roster);
        let opening = box_score.snapshot(GameClock::tip_off(), None, 0, 0, &tracker);
        Self {
            game_id: game_id.into(),
            roster,
            tracker,
            box_score,
            log: SnapshotLog::new(),
            opening,
            diagnostics: Vec::new(),
            scores: (0, 0),
            court_counts: [ON_COURT; 2],
        }
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    pub fn box_score(&self) -> &BoxScore {
        &self.box_score
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        self.log.as_slice()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Folds one play into the running state and emits its snapshot.
    pub fn step(&mut self, event: &PlayEvent) -> Result<(), GameError> {
        let clock = GameClock::parse(event.quarter, &event.clock)?;
        self.tracker.advance(clock);

        let roster = self.roster;
        let mut check_court = true;
        let corrections = match parse_play(&event.text) {
            Play::EndOfPeriod => self.tracker.end_quarter(),
            Play::Substitution { entering, leaving } => {
                let (side, entering) = roster.resolve(&entering)?;
                let (_, leaving) = roster.resolve(&leaving)?;
                self.box_score.ensure(entering, side);
                check_court = false;
                self.tracker.substitute(entering, leaving)
            }
            Play::Stat(delta) => {
                for (name, line) in delta.iter() {
                    let (side, player) = roster.resolve(name)?;
                    self.tracker.mark_active(player);
                    self.box_score.apply(player, side, line);
                }
                Vec::new()
            }
            Play::Unrecognized => {
                debug!(game_id = %self.game_id, at = %clock, text = %event.text, "unrecognized play");
                self.diagnostics.push(Diagnostic::UnrecognizedPlay {
                    at: clock,
                    text: event.text.clone(),
                });
                Vec::new()
            }
        };

        // Earlier rows first: the new snapshot already reads corrected totals.
        for correction in &corrections {
            self.apply_correction(clock, correction);
        }
        if check_court {
            self.check_court_counts(clock);
        }

        self.scores = (event.home_score, event.away_score);
        let snapshot = self.box_score.snapshot(
            clock,
            Some(event.text.clone()),
            event.home_score,
            event.away_score,
            &self.tracker,
        );
        self.log.push(snapshot);
        Ok(())
    }

    /// Gap-fills, scores and flattens everything folded so far.
    pub fn finish(self, options: &FoldOptions) -> GameOutput {
        let result = GameResult::from_final(self.roster, self.scores.0, self.scores.1);
        let mut snapshots = if options.gap_fill {
            fill_gaps(&self.opening, self.log.into_snapshots())
        } else {
            self.log.into_snapshots()
        };
        metrics::annotate(&mut snapshots);
        let (player_rows, team_rows) = build_rows(&self.game_id, self.roster, &result, &snapshots);
        GameOutput {
            game_id: self.game_id,
            result,
            player_rows,
            team_rows,
            diagnostics: self.diagnostics,
        }
    }

    fn apply_correction(&mut self, at: GameClock, correction: &Correction) {
        let mut touched = self.log.apply_correction(correction);
        // The tip-off row precedes the log and belongs to the first quarter.
        if self.opening.clock.quarter == correction.quarter
            && self.log.spans_only(correction.quarter)
            && self.opening.apply_correction(correction)
        {
            touched += 1;
        }
        if correction.minutes == 0 {
            return;
        }
        warn!(
            game_id = %self.game_id,
            at = %at,
            player = %correction.player,
            minutes = correction.minutes,
            rows = touched,
            "retroactive minutes correction"
        );
        self.diagnostics.push(Diagnostic::MinutesCorrection {
            at,
            player: correction.player.clone(),
            minutes: correction.minutes,
        });
    }

    fn check_court_counts(&mut self, at: GameClock) {
        for side in Side::BOTH {
            let count = self.tracker.on_court(side).len();
            if count == self.court_counts[side.index()] {
                continue;
            }
            self.court_counts[side.index()] = count;
            if count != ON_COURT {
                warn!(game_id = %self.game_id, at = %at, side = ?side, count, "on-court count is not five");
                self.diagnostics
                    .push(Diagnostic::InconsistentOnCourtCount { at, side, count });
            }
        }
    }
}

/// Folds a whole game's plays into output rows.
pub fn fold_game(
    game_id: &str,
    roster: &Roster,
    plays: &[PlayEvent],
    options: &FoldOptions,
) -> Result<GameOutput, GameError> {
    if plays.is_empty() {
        return Err(GameError::InvalidGame {
            game_id: game_id.to_string(),
            reason: "no plays".to_string(),
        });
    }
    let mut ctx = GameContext::new(game_id, roster);
    for event in plays {
        ctx.step(event)?;
    }
    let output = ctx.finish(options);
    info!(
        game_id,
        player_rows = output.player_rows.len(),
        team_rows = output.team_rows.len(),
        diagnostics = output.diagnostics.len(),
        "folded game"
    );
    Ok(output)
}
