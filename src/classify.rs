use crate::stats::{PlayDelta, Stat, StatLine};

const SUBSTITUTION_MARKER: &str = " enters the game for ";
const END_OF_PERIOD_MARKER: &str = "End of";

const TWO_POINT_MARKERS: [&str; 7] = [
    "two point shot",
    "dunk",
    "layup",
    "putback",
    "hook shot",
    "tip shot",
    "Regular Jump Shot",
];

/// What a single line of play-by-play text means to the fold.
#[derive(Debug, Clone, PartialEq)]
pub enum Play {
    Substitution { entering: String, leaving: String },
    EndOfPeriod,
    Stat(PlayDelta),
    Unrecognized,
}

pub fn parse_play(text: &str) -> Play {
    if text.contains(END_OF_PERIOD_MARKER) {
        return Play::EndOfPeriod;
    }
    if let Some((entering, leaving)) = parse_substitution(text) {
        return Play::Substitution { entering, leaving };
    }
    match classify(text) {
        Some(delta) => Play::Stat(delta),
        None => Play::Unrecognized,
    }
}

/// Stat-bearing play kinds, tried in `PRIORITY` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recognizer {
    FreeThrow,
    TwoPoint,
    ThreePoint,
    Rebound,
    Block,
    Foul,
    Turnover,
}

impl Recognizer {
    /// Earlier entries shadow later ones: a blocked jumper carries no make/miss
    /// verb, so it falls through the shot recognizers and lands on `Block`.
    pub const PRIORITY: [Recognizer; 7] = [
        Recognizer::FreeThrow,
        Recognizer::TwoPoint,
        Recognizer::ThreePoint,
        Recognizer::Rebound,
        Recognizer::Block,
        Recognizer::Foul,
        Recognizer::Turnover,
    ];

    /// The primary actor's increments, or `None` when this kind does not apply.
    pub fn recognize(self, text: &str) -> Option<StatLine> {
        match self {
            Recognizer::FreeThrow => {
                if !text.contains("free throw") {
                    return None;
                }
                shot_result(
                    text,
                    &[(Stat::Fta, 1.0)],
                    &[(Stat::Fta, 1.0), (Stat::Ftm, 1.0), (Stat::Pts, 1.0)],
                )
            }
            Recognizer::TwoPoint => {
                let jumper = text.contains("jumper") && !text.contains("three point");
                if !jumper && !TWO_POINT_MARKERS.iter().any(|m| text.contains(m)) {
                    return None;
                }
                shot_result(
                    text,
                    &[(Stat::Fga, 1.0)],
                    &[(Stat::Fga, 1.0), (Stat::Fgm, 1.0), (Stat::Pts, 2.0)],
                )
            }
            Recognizer::ThreePoint => {
                if !text.contains("three point") {
                    return None;
                }
                shot_result(
                    text,
                    &[(Stat::Fga, 1.0), (Stat::ThreePa, 1.0)],
                    &[
                        (Stat::Fga, 1.0),
                        (Stat::Fgm, 1.0),
                        (Stat::ThreePa, 1.0),
                        (Stat::ThreePm, 1.0),
                        (Stat::Pts, 3.0),
                    ],
                )
            }
            Recognizer::Rebound => {
                if !text.contains("rebound") {
                    return None;
                }
                // "Cavaliers offensive team rebound": nobody to credit.
                if matches!(text.split(' ').nth(1), Some("offensive" | "defensive")) {
                    return None;
                }
                if text.contains("offensive") {
                    Some(StatLine::from_pairs(&[(Stat::Oreb, 1.0), (Stat::Treb, 1.0)]))
                } else if text.contains("defensive") {
                    Some(StatLine::from_pairs(&[(Stat::Dreb, 1.0), (Stat::Treb, 1.0)]))
                } else {
                    None
                }
            }
            Recognizer::Block => text
                .contains("blocks")
                .then(|| StatLine::from_pairs(&[(Stat::Blk, 1.0)])),
            Recognizer::Foul => text
                .contains("foul")
                .then(|| StatLine::from_pairs(&[(Stat::Pf, 1.0)])),
            Recognizer::Turnover => {
                let turnover = text.contains("turnover")
                    || text.contains("Turnover")
                    || text.contains("bad pass");
                turnover.then(|| StatLine::from_pairs(&[(Stat::To, 1.0)]))
            }
        }
    }
}

/// Maps play text to per-player increments; the first entry is the play's main actor.
pub fn classify(text: &str) -> Option<PlayDelta> {
    let player = primary_player(text)?;
    let line = Recognizer::PRIORITY
        .into_iter()
        .find_map(|recognizer| recognizer.recognize(text))?;
    let mut delta = PlayDelta::single(player, line);
    if let Some((other, other_line)) = secondary_credit(&line, text) {
        delta.credit(other, other_line);
    }
    Some(delta)
}

pub fn primary_player(text: &str) -> Option<String> {
    let name = text.split_whitespace().take(2).collect::<Vec<_>>().join(" ");
    (!name.is_empty()).then_some(name)
}

pub fn parse_substitution(text: &str) -> Option<(String, String)> {
    let (entering, leaving) = text.split_once(SUBSTITUTION_MARKER)?;
    let entering = entering.trim();
    let leaving = leaving.trim().trim_end_matches('.').trim_end();
    if entering.is_empty() || leaving.is_empty() {
        return None;
    }
    Some((entering.to_string(), leaving.to_string()))
}

fn shot_result(text: &str, missed: &[(Stat, f64)], made: &[(Stat, f64)]) -> Option<StatLine> {
    if text.contains("misses") {
        Some(StatLine::from_pairs(missed))
    } else if text.contains("makes") {
        Some(StatLine::from_pairs(made))
    } else {
        None
    }
}

fn secondary_credit(primary: &StatLine, text: &str) -> Option<(String, StatLine)> {
    if primary.has(Stat::Pts) && !primary.has(Stat::Fta) {
        paren_actor(text, "assists").map(|name| (name, StatLine::from_pairs(&[(Stat::Ast, 1.0)])))
    } else if primary.has(Stat::Blk) {
        blocked_shooter(text).map(|name| {
            (
                name,
                StatLine::from_pairs(&[(Stat::Fga, 1.0), (Stat::Blkd, 1.0)]),
            )
        })
    } else if primary.has(Stat::To) {
        paren_actor(text, "steals").map(|name| (name, StatLine::from_pairs(&[(Stat::Stl, 1.0)])))
    } else if primary.has(Stat::Pf) {
        paren_actor(text, "draws the foul")
            .map(|name| (name, StatLine::from_pairs(&[(Stat::Pfd, 1.0)])))
    } else {
        None
    }
}

/// Name inside a trailing `(<name> <verb>)` group.
fn paren_actor(text: &str, verb: &str) -> Option<String> {
    let close = format!(" {verb})");
    let end = text.find(&close)?;
    let open = text[..end].rfind('(')?;
    let name = text[open + 1..end].trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// The shooter in "<blocker> blocks <shooter>'s <shot>".
fn blocked_shooter(text: &str) -> Option<String> {
    let (_, rest) = text.split_once("blocks ")?;
    let end = rest.find("'s")?;
    let name = rest[..end].trim();
    (!name.is_empty()).then(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paren_actor_uses_innermost_group() {
        assert_eq!(
            paren_actor("A. B makes layup (C. D assists)", "assists").as_deref(),
            Some("C. D")
        );
        assert_eq!(
            paren_actor("A. B makes layup (x) (C. D assists)", "assists").as_deref(),
            Some("C. D")
        );
        assert_eq!(paren_actor("A. B makes layup", "assists"), None);
    }

    #[test]
    fn blocked_shooter_handles_spaced_possessive() {
        assert_eq!(
            blocked_shooter("S. Ibaka blocks K. Durant's 15-foot jumper").as_deref(),
            Some("K. Durant")
        );
        assert_eq!(
            blocked_shooter("S. Ibaka blocks K. Durant 's layup").as_deref(),
            Some("K. Durant")
        );
    }

    #[test]
    fn substitution_trims_trailing_period() {
        assert_eq!(
            parse_substitution("J. Smith enters the game for K. Love."),
            Some(("J. Smith".to_string(), "K. Love".to_string()))
        );
        assert_eq!(parse_substitution(" enters the game for K. Love"), None);
    }
}
