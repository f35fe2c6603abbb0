use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use pbp_boxscore::error::{Diagnostic, GameError};
use pbp_boxscore::feed::{GameFeed, PlayEvent};
use pbp_boxscore::game::{FoldOptions, GameContext, GameOutput, fold_game};
use pbp_boxscore::roster::{Roster, Side};
use pbp_boxscore::rows::PlayerRow;
use pbp_boxscore::stats::{Stat, StatLine};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn sample_feed() -> GameFeed {
    GameFeed::parse(&read_fixture("sample_game.json")).expect("fixture should parse")
}

fn fold(feed: &GameFeed, gap_fill: bool) -> GameOutput {
    let roster = feed.roster().expect("fixture roster should validate");
    fold_game(&feed.game_id, &roster, &feed.plays, &FoldOptions { gap_fill })
        .expect("fixture should fold")
}

fn event(quarter: u8, clock: &str, text: &str) -> PlayEvent {
    PlayEvent {
        quarter,
        clock: clock.to_string(),
        text: text.to_string(),
        team: None,
        home_score: 0,
        away_score: 0,
    }
}

fn rows_by_player(rows: &[PlayerRow]) -> HashMap<&str, Vec<&PlayerRow>> {
    let mut out: HashMap<&str, Vec<&PlayerRow>> = HashMap::new();
    for row in rows {
        out.entry(row.player.as_str()).or_default().push(row);
    }
    out
}

#[test]
fn final_points_match_the_scoreboard() {
    let feed = sample_feed();
    let output = fold(&feed, true);
    let last = feed.plays.last().unwrap();

    assert_eq!(output.result.home_score, last.home_score);
    assert_eq!(output.result.away_score, last.away_score);
    assert_eq!(output.result.winner, "CLE");
    assert_eq!(output.result.point_diff(), 2);

    let final_teams = &output.team_rows[output.team_rows.len() - 2..];
    assert_eq!(final_teams[0].team, "CLE");
    assert_eq!(final_teams[0].stats.pts, f64::from(last.home_score));
    assert_eq!(final_teams[1].team, "GSW");
    assert_eq!(final_teams[1].stats.pts, f64::from(last.away_score));
    assert_eq!(final_teams[0].min, 48);
}

#[test]
fn every_second_of_regulation_has_a_row() {
    let output = fold(&sample_feed(), true);
    assert_eq!(output.team_rows.len(), 2 * 4 * 721);
    assert_eq!(output.team_rows[0].time, "12:00");
    assert_eq!(output.team_rows[0].quarter, 1);
    let last = output.team_rows.last().unwrap();
    assert_eq!((last.quarter, last.time.as_str()), (4, "0:00"));

    let opening = output
        .player_rows
        .iter()
        .filter(|row| row.quarter == 1 && row.time == "12:00")
        .collect::<Vec<_>>();
    assert_eq!(opening.len(), 10);
    assert!(opening.iter().all(|row| row.in_game && row.play.is_none()));
}

#[test]
fn cumulative_stats_never_decrease() {
    let output = fold(&sample_feed(), true);
    for (player, rows) in rows_by_player(&output.player_rows) {
        for pair in rows.windows(2) {
            let before = pair[0].stats.values();
            let after = pair[1].stats.values();
            for (b, a) in before.iter().zip(after.iter()) {
                assert!(a >= b, "{player} went backwards at Q{} {}", pair[1].quarter, pair[1].time);
            }
        }
    }
}

#[test]
fn ten_players_on_court_when_the_game_ends() {
    let output = fold(&sample_feed(), false);
    let last = output.player_rows.last().unwrap();
    let closing = output
        .player_rows
        .iter()
        .filter(|row| row.quarter == last.quarter && row.time == last.time)
        .collect::<Vec<_>>();
    for team in ["CLE", "GSW"] {
        let on_court = closing
            .iter()
            .filter(|row| row.team == team && row.in_game)
            .count();
        assert_eq!(on_court, 5, "{team}");
    }
}

#[test]
fn end_of_game_after_end_of_quarter_keeps_the_closing_five() {
    let mut feed = sample_feed();
    let last = feed.plays.last().unwrap().clone();
    feed.plays.push(PlayEvent {
        text: "End of Game".to_string(),
        ..last
    });
    let output = fold(&feed, false);

    let final_row = output.player_rows.last().unwrap();
    assert_eq!(
        final_row.play.as_deref(),
        Some("End of the 4th Quarter; End of Game")
    );
    for team in ["CLE", "GSW"] {
        let on_court = output
            .player_rows
            .iter()
            .filter(|row| row.quarter == 4 && row.time == "0:00")
            .filter(|row| row.team == team && row.in_game)
            .count();
        assert_eq!(on_court, 5, "{team}");
    }
}

#[test]
fn same_clock_plays_collapse_into_one_row() {
    let output = fold(&sample_feed(), false);
    let rows = output
        .player_rows
        .iter()
        .filter(|row| row.player == "J. Smith" && row.quarter == 1 && row.time == "10:30")
        .collect::<Vec<_>>();
    assert_eq!(rows.len(), 1);
    let row = rows[0];
    assert_eq!(
        row.play.as_deref(),
        Some(
            "D. Green shooting foul (J. Smith draws the foul); \
             J. Smith makes free throw 1 of 2; J. Smith misses free throw 2 of 2"
        )
    );
    assert_eq!(row.stats.fta, 2.0);
    assert_eq!(row.stats.ftm, 1.0);
    assert_eq!(row.stats.pts, 1.0);
    assert_eq!(row.stats.pfd, 1.0);
}

#[test]
fn box_score_totals_for_a_starter() {
    let feed = sample_feed();
    let output = fold(&feed, false);
    let james = output
        .player_rows
        .iter()
        .rev()
        .find(|row| row.player == "L. James")
        .unwrap();
    assert_eq!(james.stats.pts, 4.0);
    assert_eq!(james.stats.fgm, 2.0);
    assert_eq!(james.stats.fga, 3.0);
    assert_eq!(james.stats.ast, 1.0);
    assert_eq!(james.stats.treb, 2.0);
    assert_eq!(james.min, 48);
    assert!(james.home);
    assert!(james.uper.is_finite());
    // 4 + 1 - (3 + 1 blocked)
    assert_eq!(james.pir, 1.0);
}

#[test]
fn team_rebound_is_reported_but_not_fatal() {
    let output = fold(&sample_feed(), false);
    let unrecognized = output
        .diagnostics
        .iter()
        .filter(|d| matches!(d, Diagnostic::UnrecognizedPlay { .. }))
        .count();
    assert_eq!(unrecognized, 1);
    assert!(output.player_rows.iter().any(|row| {
        row.play.as_deref() == Some("Cavaliers offensive team rebound") && row.time == "9:18"
    }));
}

#[test]
fn unknown_player_aborts_the_game() {
    let feed = sample_feed();
    let roster = feed.roster().unwrap();
    let plays = vec![event(1, "11:30", "Z. Nobody makes 2-foot layup")];
    let err = fold_game("g", &roster, &plays, &FoldOptions::default()).unwrap_err();
    assert_eq!(
        err,
        GameError::UnknownPlayer {
            name: "Z. Nobody".to_string()
        }
    );
    assert!(!err.is_skip());
}

#[test]
fn bad_clock_aborts_the_game() {
    let feed = sample_feed();
    let roster = feed.roster().unwrap();
    let plays = vec![event(1, "13:00", "K. Irving makes 2-foot layup")];
    let err = fold_game("g", &roster, &plays, &FoldOptions::default()).unwrap_err();
    assert!(matches!(err, GameError::InvalidClock { .. }));
}

#[test]
fn surprise_substitution_corrects_only_the_current_quarter() {
    let feed = sample_feed();
    let roster: Roster = feed.roster().unwrap();
    let plays = vec![
        event(1, "6:00", "R. Jefferson enters the game for J. Smith"),
        event(1, "3:00", "J. Smith enters the game for R. Jefferson"),
        event(1, "0:00", "End of the 1st Quarter"),
        // R. Jefferson replaced T. Thompson at the break, unrecorded.
        event(2, "10:00", "R. Jefferson makes 2-foot layup"),
        event(2, "9:00", "K. Irving defensive rebound"),
        event(2, "8:00", "M. Williams enters the game for R. Jefferson"),
    ];

    let mut ctx = GameContext::new("g", &roster);
    for play in &plays[..5] {
        ctx.step(play).unwrap();
    }
    let before = ctx
        .snapshots()
        .iter()
        .map(|s| s.player("R. Jefferson").map(|p| (p.minutes, p.in_game)))
        .collect::<Vec<_>>();
    assert_eq!(before[3], Some((3, false)));
    assert_eq!(before[4], Some((3, false)));

    ctx.step(&plays[5]).unwrap();
    let after = ctx
        .snapshots()
        .iter()
        .map(|s| s.player("R. Jefferson").map(|p| (p.minutes, p.in_game)))
        .collect::<Vec<_>>();

    // Quarter 1 rows are untouched.
    assert_eq!(after[..3], before[..3]);
    // Quarter 2 rows gain the four minutes (12:00 to 8:00) exactly once.
    assert_eq!(after[3], Some((7, true)));
    assert_eq!(after[4], Some((7, true)));
    assert_eq!(after[5], Some((7, false)));

    let corrections = ctx
        .diagnostics()
        .iter()
        .filter_map(|d| match d {
            Diagnostic::MinutesCorrection { player, minutes, .. } => {
                Some((player.as_str(), *minutes))
            }
            _ => None,
        })
        .collect::<Vec<_>>();
    assert_eq!(corrections, vec![("R. Jefferson", 4)]);
}

#[test]
fn first_quarter_correction_reaches_the_tip_off_rows() {
    let feed = sample_feed();
    let roster = feed.roster().unwrap();
    let plays = vec![
        event(1, "11:00", "K. Irving makes 2-foot layup"),
        // Listed as a starter, but the feed only has K. Love coming on here.
        event(1, "9:00", "K. Love enters the game for J. Smith"),
    ];
    let output = fold_game("g", &roster, &plays, &FoldOptions::default()).unwrap();

    let love = output
        .player_rows
        .iter()
        .filter(|row| row.player == "K. Love" && row.quarter == 1)
        .collect::<Vec<_>>();
    assert_eq!(love[0].time, "12:00");
    let entered_at = love.iter().position(|row| row.time == "9:00").unwrap();
    assert_eq!(entered_at, 180);
    for row in &love[..entered_at] {
        assert_eq!((row.min, row.in_game), (0, false), "at {}", row.time);
    }
    assert!(love[entered_at].in_game);
    assert_eq!(love[entered_at].min, 0);

    assert!(output.diagnostics.contains(&Diagnostic::MinutesCorrection {
        at: pbp_boxscore::clock::GameClock::new(1, 540),
        player: "K. Love".to_string(),
        minutes: -3,
    }));
}

#[test]
fn snapshots_carry_the_running_team_totals() {
    let feed = sample_feed();
    let roster = feed.roster().unwrap();
    let mut ctx = GameContext::new(&feed.game_id, &roster);
    for play in &feed.plays {
        ctx.step(play).unwrap();
    }

    let last = ctx.snapshots().last().unwrap();
    for side in Side::BOTH {
        let mut summed = StatLine::new();
        for row in last.side(side) {
            summed.merge(&row.stats);
        }
        assert_eq!(last.team_totals(side), &summed, "{side:?}");
        assert_eq!(ctx.box_score().team_totals(side), last.team_totals(side));
        assert_eq!(ctx.tracker().on_court(side).len(), 5);
    }
    assert_eq!(last.team_totals(Side::Home).get(Stat::Pts), 21.0);
    assert_eq!(last.team_totals(Side::Away).get(Stat::Pts), 19.0);
    assert_eq!(
        ctx.box_score().stats("L. James").map(|s| s.get(Stat::Pts)),
        Some(4.0)
    );
}

#[test]
fn fold_options_can_skip_gap_filling() {
    let feed = sample_feed();
    let output = fold(&feed, false);
    assert!(output.player_rows.iter().all(|row| row.play.is_some()));
    // Three plays at 10:30 share one row.
    assert_eq!(output.team_rows.len(), 2 * (feed.plays.len() - 2));
}
