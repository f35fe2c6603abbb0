use crate::aggregate::Snapshot;
use crate::clock::GameClock;

/// Expands real snapshots into one row per game second.
///
/// `opening` is the tip-off state (starters, empty stats). It is emitted at
/// 12:00 of the first quarter unless a real play already sits there, and it
/// seeds the rows up to the first play. Every synthetic row copies the most
/// recent real snapshot with `play = None`. After the last play the rows run
/// down to 0:00 of its quarter.
pub fn fill_gaps(opening: &Snapshot, real: Vec<Snapshot>) -> Vec<Snapshot> {
    let mut out = Vec::with_capacity(estimated_len(opening, &real));

    if real.first().map(|s| s.key()) != Some(opening.key()) {
        out.push(opening.carried_to(opening.clock));
    }

    let mut template = opening.clone();
    let mut last = opening.clock;
    for snapshot in real {
        fill_between(&template, last, snapshot.clock, &mut out);
        last = snapshot.clock;
        template = snapshot.clone();
        out.push(snapshot);
    }
    fill_to_end(&template, last, &mut out);
    out
}

/// Pushes rows for every second strictly between `after` and `before`.
pub fn fill_between(
    template: &Snapshot,
    after: GameClock,
    before: GameClock,
    out: &mut Vec<Snapshot>,
) {
    if after.quarter > before.quarter {
        return;
    }
    if after.quarter == before.quarter {
        for secs in (before.secs_left + 1..after.secs_left).rev() {
            out.push(template.carried_to(GameClock::new(after.quarter, secs)));
        }
        return;
    }

    fill_to_end(template, after, out);
    let next_start = GameClock::start_of(after.quarter + 1);
    if next_start.chrono_cmp(&before).is_lt() {
        out.push(template.carried_to(next_start));
    }
    fill_between(template, next_start, before, out);
}

/// Pushes rows from just after `after` down to 0:00 of the same quarter.
pub fn fill_to_end(template: &Snapshot, after: GameClock, out: &mut Vec<Snapshot>) {
    for secs in (0..after.secs_left).rev() {
        out.push(template.carried_to(GameClock::new(after.quarter, secs)));
    }
}

fn estimated_len(opening: &Snapshot, real: &[Snapshot]) -> usize {
    let end = real.last().map(|s| s.clock).unwrap_or(opening.clock);
    let span = opening.clock.secs_until(&GameClock::new(end.quarter, 0));
    usize::try_from(span).unwrap_or(0) + real.len() + 1
}
