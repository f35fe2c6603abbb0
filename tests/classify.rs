use pbp_boxscore::classify::{Play, Recognizer, classify, parse_play};
use pbp_boxscore::stats::{Stat, StatLine};

fn line(pairs: &[(Stat, f64)]) -> StatLine {
    StatLine::from_pairs(pairs)
}

#[test]
fn missed_two_point_shot_counts_an_attempt() {
    let delta = classify("J. Smith misses 3-foot two point shot").expect("should classify");
    assert_eq!(delta.len(), 1);
    assert_eq!(delta.get("J. Smith"), Some(&line(&[(Stat::Fga, 1.0)])));
}

#[test]
fn assisted_three_credits_both_players() {
    let delta = classify("J. Smith makes 26-foot three point jumper (T. Jones assists)")
        .expect("should classify");
    assert_eq!(delta.primary().map(|(name, _)| name), Some("J. Smith"));
    assert_eq!(
        delta.get("J. Smith"),
        Some(&line(&[
            (Stat::Fga, 1.0),
            (Stat::Fgm, 1.0),
            (Stat::ThreePa, 1.0),
            (Stat::ThreePm, 1.0),
            (Stat::Pts, 3.0),
        ]))
    );
    assert_eq!(delta.get("T. Jones"), Some(&line(&[(Stat::Ast, 1.0)])));
}

#[test]
fn long_two_jumper_is_not_a_three() {
    let delta = classify("K. Thompson makes 18-foot jumper (S. Curry assists)").unwrap();
    let shooter = delta.get("K. Thompson").unwrap();
    assert_eq!(shooter.get(Stat::Pts), 2.0);
    assert_eq!(shooter.get(Stat::ThreePa), 0.0);
    assert_eq!(delta.get("S. Curry").map(|l| l.get(Stat::Ast)), Some(1.0));
}

#[test]
fn made_free_throw_never_carries_an_assist() {
    let delta = classify("J. Smith makes free throw 1 of 2 (T. Jones assists)").unwrap();
    assert_eq!(delta.len(), 1);
    assert_eq!(
        delta.get("J. Smith"),
        Some(&line(&[(Stat::Fta, 1.0), (Stat::Ftm, 1.0), (Stat::Pts, 1.0)]))
    );
}

#[test]
fn blocked_shot_charges_the_shooter() {
    let delta = classify("A. Bogut blocks L. James's 5-foot two point shot").unwrap();
    assert_eq!(delta.get("A. Bogut"), Some(&line(&[(Stat::Blk, 1.0)])));
    assert_eq!(
        delta.get("L. James"),
        Some(&line(&[(Stat::Fga, 1.0), (Stat::Blkd, 1.0)]))
    );
}

#[test]
fn foul_and_turnover_credit_the_other_side() {
    let foul = classify("D. Green shooting foul (J. Smith draws the foul)").unwrap();
    assert_eq!(foul.get("D. Green"), Some(&line(&[(Stat::Pf, 1.0)])));
    assert_eq!(foul.get("J. Smith"), Some(&line(&[(Stat::Pfd, 1.0)])));

    let turnover = classify("K. Love bad pass (S. Curry steals)").unwrap();
    assert_eq!(turnover.get("K. Love"), Some(&line(&[(Stat::To, 1.0)])));
    assert_eq!(turnover.get("S. Curry"), Some(&line(&[(Stat::Stl, 1.0)])));
}

#[test]
fn rebounds_split_by_side_of_the_floor() {
    let off = classify("L. James offensive rebound").unwrap();
    assert_eq!(
        off.get("L. James"),
        Some(&line(&[(Stat::Oreb, 1.0), (Stat::Treb, 1.0)]))
    );
    let def = classify("T. Thompson defensive rebound").unwrap();
    assert_eq!(
        def.get("T. Thompson"),
        Some(&line(&[(Stat::Dreb, 1.0), (Stat::Treb, 1.0)]))
    );
}

#[test]
fn team_rebounds_are_unrecognized() {
    assert_eq!(classify("Cavaliers offensive team rebound"), None);
    assert_eq!(parse_play("Cavaliers offensive team rebound"), Play::Unrecognized);
}

#[test]
fn recognizers_are_tried_in_priority_order() {
    assert_eq!(Recognizer::PRIORITY[0], Recognizer::FreeThrow);
    assert_eq!(Recognizer::PRIORITY[6], Recognizer::Turnover);
    // No make/miss verb, so the shot recognizers step aside.
    assert_eq!(Recognizer::TwoPoint.recognize("A. B blocks C. D's layup"), None);
    assert!(Recognizer::Block.recognize("A. B blocks C. D's layup").is_some());
}

#[test]
fn parse_play_dispatches_structural_lines() {
    assert_eq!(parse_play("End of the 1st Quarter"), Play::EndOfPeriod);
    assert_eq!(
        parse_play("R. Jefferson enters the game for J. Smith"),
        Play::Substitution {
            entering: "R. Jefferson".to_string(),
            leaving: "J. Smith".to_string(),
        }
    );
    assert!(matches!(
        parse_play("H. Barnes makes 3-foot dunk"),
        Play::Stat(delta) if delta.get("H. Barnes").is_some_and(|l| l.get(Stat::Pts) == 2.0)
    ));
    assert_eq!(parse_play("Jump ball: A. Bogut vs. T. Thompson"), Play::Unrecognized);
}
