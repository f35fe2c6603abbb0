use pbp_boxscore::aggregate::{PlayerSnapshot, Snapshot};
use pbp_boxscore::clock::GameClock;
use pbp_boxscore::metrics::{SliceTotals, annotate, pir, uper};
use pbp_boxscore::roster::Side;
use pbp_boxscore::stats::{Stat, StatLine};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn pir_adds_contributions_and_subtracts_misses() {
    let line = StatLine::from_pairs(&[
        (Stat::Pts, 3.0),
        (Stat::Ast, 1.0),
        (Stat::Fga, 2.0),
        (Stat::To, 1.0),
        (Stat::Pfd, 1.0),
        (Stat::Blkd, 1.0),
    ]);
    assert_eq!(pir(&line), 3.0 + 1.0 + 1.0 - (2.0 + 1.0 + 1.0));
}

#[test]
fn uper_of_a_lone_make_is_its_field_goal_value() {
    let make = StatLine::from_pairs(&[(Stat::Fga, 1.0), (Stat::Fgm, 1.0), (Stat::Pts, 2.0)]);
    // Only make of the game: VOP = 2, DRB% = 1, nothing else to weigh.
    assert!(approx(uper(&make, 1, &make, &make), 2.0));
    assert!(approx(uper(&make, 2, &make, &make), 1.0));
}

#[test]
fn uper_charges_a_miss_at_the_value_of_a_possession() {
    let line = StatLine::from_pairs(&[(Stat::Fga, 2.0), (Stat::Fgm, 1.0), (Stat::Pts, 2.0)]);
    assert!(approx(uper(&line, 1, &line, &line), 1.0));
}

#[test]
fn empty_slice_yields_finite_zero() {
    let empty = StatLine::new();
    let value = uper(&empty, 0, &empty, &empty);
    assert!(value.is_finite());
    assert_eq!(value, 0.0);
}

#[test]
fn annotate_uses_each_slices_own_totals() {
    let player = |name: &str, side: Side, stats: StatLine| PlayerSnapshot {
        player: name.to_string(),
        side,
        stats,
        minutes: 1,
        in_game: true,
        uper: 0.0,
        pir: 0.0,
    };
    let make = StatLine::from_pairs(&[(Stat::Fga, 1.0), (Stat::Fgm, 1.0), (Stat::Pts, 2.0)]);
    let mut snapshots = vec![
        Snapshot {
            clock: GameClock::new(1, 700),
            play: None,
            home_score: 2,
            away_score: 0,
            players: vec![
                player("A. One", Side::Home, make),
                player("B. Two", Side::Away, StatLine::new()),
            ],
            team_totals: [make, StatLine::new()],
        },
        Snapshot {
            clock: GameClock::new(1, 690),
            play: None,
            home_score: 2,
            away_score: 2,
            players: vec![
                player("A. One", Side::Home, make),
                player("B. Two", Side::Away, make),
            ],
            team_totals: [make, make],
        },
    ];
    annotate(&mut snapshots);

    let totals = SliceTotals::of(&snapshots[1]);
    assert_eq!(totals.game.get(Stat::Pts), 4.0);
    assert_eq!(totals.team(Side::Away).get(Stat::Pts), 2.0);

    let home_first = &snapshots[0].players[0];
    assert!(approx(home_first.uper, 2.0));
    assert!(approx(home_first.pir, 1.0));
    assert!(approx(snapshots[1].players[0].uper, 2.0));

    let away_first = &snapshots[0].players[1];
    let away_second = &snapshots[1].players[1];
    assert_eq!(away_first.uper, 0.0);
    assert_eq!(away_first.pir, 0.0);
    assert!(approx(away_second.uper, 2.0));
    assert!(approx(away_second.pir, 1.0));
}

#[test]
fn slice_totals_come_from_the_snapshot_team_totals() {
    let make = StatLine::from_pairs(&[(Stat::Fga, 1.0), (Stat::Fgm, 1.0), (Stat::Pts, 2.0)]);
    let snapshot = Snapshot {
        clock: GameClock::new(1, 600),
        play: None,
        home_score: 4,
        away_score: 0,
        players: Vec::new(),
        team_totals: [StatLine::from_pairs(&[(Stat::Pts, 4.0)]), make],
    };
    let totals = SliceTotals::of(&snapshot);
    assert_eq!(totals.team(Side::Home).get(Stat::Pts), 4.0);
    assert_eq!(totals.game.get(Stat::Pts), 6.0);
    assert_eq!(totals.game.get(Stat::Fgm), 1.0);
}
