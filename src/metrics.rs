use crate::aggregate::Snapshot;
use crate::roster::Side;
use crate::stats::{Stat, StatLine};

/// Game-wide and per-team cumulative totals for one time slice.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SliceTotals {
    pub game: StatLine,
    pub teams: [StatLine; 2],
}

impl SliceTotals {
    pub fn of(snapshot: &Snapshot) -> Self {
        let teams = snapshot.team_totals;
        let mut game = teams[0];
        game.merge(&teams[1]);
        Self { game, teams }
    }

    pub fn team(&self, side: Side) -> &StatLine {
        &self.teams[side.index()]
    }
}

/// Fills `uper` and `pir` on every player row, using each slice's own totals.
pub fn annotate(snapshots: &mut [Snapshot]) {
    for snapshot in snapshots.iter_mut() {
        let totals = SliceTotals::of(snapshot);
        for row in &mut snapshot.players {
            row.uper = uper(&row.stats, row.minutes, totals.team(row.side), &totals.game);
            row.pir = pir(&row.stats);
        }
    }
}

/// Unadjusted PER.
///
/// Game and team totals that appear as divisors are floored at 1 so a slice
/// early in the game (no free throws yet, say) still produces a number.
pub fn uper(stats: &StatLine, minutes: u32, team: &StatLine, game: &StatLine) -> f64 {
    let gm_ast = game.get(Stat::Ast);
    let gm_fg = floor_one(game.get(Stat::Fgm));
    let gm_fga = game.get(Stat::Fga);
    let gm_ft = floor_one(game.get(Stat::Ftm));
    let gm_fta = game.get(Stat::Fta);
    let gm_orb = game.get(Stat::Oreb);
    let gm_pts = game.get(Stat::Pts);
    let gm_tov = game.get(Stat::To);
    let gm_trb = floor_one(game.get(Stat::Treb));
    let gm_pf = floor_one(game.get(Stat::Pf));
    let tm_ast = team.get(Stat::Ast);
    let tm_fg = floor_one(team.get(Stat::Fgm));

    let factor = (2.0 / 3.0) - (0.5 * (gm_ast / gm_fg)) / (2.0 * (gm_fg / gm_ft));
    let vop = gm_pts / floor_one(gm_fga - gm_orb + gm_tov + 0.44 * gm_fta);
    let drbp = (gm_trb - gm_orb) / gm_trb;

    let s = |stat: Stat| stats.get(stat);
    let per_minute = 1.0 / f64::from(minutes.max(1));

    let assist_part = 2.0 / 3.0 * s(Stat::Ast);
    let field_goal_part = (2.0 - factor * tm_ast / tm_fg) * s(Stat::Fgm);
    let free_throw_part = 0.5 * s(Stat::Ftm) * (2.0 - (1.0 / 3.0) * tm_ast / tm_fg);
    let foul_part = s(Stat::Pf) * (gm_ft / gm_pf - 0.44 * gm_fta / gm_pf * vop);

    per_minute
        * (s(Stat::ThreePm) + assist_part + field_goal_part + free_throw_part
            - vop * s(Stat::To)
            - vop * drbp * (s(Stat::Fga) - s(Stat::Fgm))
            - vop * 0.44 * (0.44 + 0.56 * drbp) * (s(Stat::Fta) - s(Stat::Ftm))
            + vop * (1.0 - drbp) * s(Stat::Dreb)
            + vop * drbp * s(Stat::Oreb)
            + vop * s(Stat::Stl)
            + vop * drbp * s(Stat::Blk)
            - foul_part)
}

/// Performance Index Rating.
pub fn pir(stats: &StatLine) -> f64 {
    let s = |stat: Stat| stats.get(stat);
    (s(Stat::Pts) + s(Stat::Ast) + s(Stat::Stl) + s(Stat::Blk) + s(Stat::Pfd))
        - (s(Stat::Fga) + s(Stat::Fta) + s(Stat::To) + s(Stat::Blkd) + s(Stat::Pf))
}

fn floor_one(value: f64) -> f64 {
    value.max(1.0)
}
