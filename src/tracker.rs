use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::clock::{GameClock, quarter_length_secs};
use crate::roster::{Roster, Side};

/// Retroactive minutes fix for rows already emitted in `quarter`.
#[derive(Debug, Clone, PartialEq)]
pub struct Correction {
    pub player: String,
    pub quarter: u8,
    pub minutes: i64,
    /// On-court flag the corrected rows should carry, if it changed.
    pub in_game: Option<bool>,
    /// Rows never drop below the minutes the player had when the quarter began.
    pub floor_minutes: u32,
}

impl Correction {
    pub fn is_noop(&self) -> bool {
        self.minutes == 0 && self.in_game.is_none()
    }
}

#[derive(Debug, Clone)]
struct PlayerClock {
    side: Side,
    seconds: u32,
    /// Retroactive adjustment from corrections; `seconds` itself only grows.
    offset_secs: i64,
    on_court: bool,
    quarter_start_secs: u32,
}

impl PlayerClock {
    /// Seconds after corrections, never negative.
    fn credited_secs(&self) -> u32 {
        let credited = (i64::from(self.seconds) + self.offset_secs).max(0);
        u32::try_from(credited).unwrap_or(u32::MAX)
    }
}

/// Who is on court and how long everyone has played.
///
/// Seconds are credited to the on-court set whenever the clock moves, so the
/// order of `advance` and `substitute` calls matters: advance first, then apply
/// whatever happened at that instant.
#[derive(Debug, Clone)]
pub struct Tracker {
    clock: GameClock,
    players: HashMap<String, PlayerClock>,
    on_court: [Vec<String>; 2],
    active: HashSet<String>,
    quarter_enders: Vec<(u8, [Vec<String>; 2])>,
    last_ended: Option<u8>,
}

impl Tracker {
    pub fn new(roster: &Roster) -> Self {
        let mut players = HashMap::new();
        let mut on_court: [Vec<String>; 2] = [Vec::new(), Vec::new()];
        for side in Side::BOTH {
            let team = roster.team(side);
            for name in &team.players {
                players.insert(
                    name.clone(),
                    PlayerClock {
                        side,
                        seconds: 0,
                        offset_secs: 0,
                        on_court: false,
                        quarter_start_secs: 0,
                    },
                );
            }
            for name in &team.starters {
                if let Some(player) = players.get_mut(name) {
                    player.on_court = true;
                }
                on_court[side.index()].push(name.clone());
            }
        }
        Self {
            clock: GameClock::tip_off(),
            players,
            on_court,
            active: HashSet::new(),
            quarter_enders: Vec::new(),
            last_ended: None,
        }
    }

    pub fn clock(&self) -> GameClock {
        self.clock
    }

    /// Moves the clock to `to`, crediting elapsed seconds to the on-court set.
    /// Returns the seconds credited.
    pub fn advance(&mut self, to: GameClock) -> u32 {
        if to.chrono_cmp(&self.clock).is_lt() {
            warn!(from = %self.clock, to = %to, "clock moved backwards; ignoring");
            return 0;
        }
        let from = self.clock;
        if to.quarter == from.quarter {
            let elapsed = from.secs_left - to.secs_left;
            self.credit(elapsed);
        } else {
            self.credit(from.secs_left);
            for skipped in from.quarter + 1..to.quarter {
                self.begin_quarter();
                self.credit(quarter_length_secs(skipped));
            }
            self.begin_quarter();
            self.credit(to.elapsed_in_quarter());
        }
        self.clock = to;
        from.secs_until(&to)
    }

    /// Handles an "End of ..." play: records the closing five and drops anyone
    /// who did nothing all quarter.
    ///
    /// A second "End of" in the same quarter ("End of the 4th Quarter" then
    /// "End of Game") only refreshes the recorded closing five.
    pub fn end_quarter(&mut self) -> Vec<Correction> {
        let quarter = self.clock.quarter;
        if self.last_ended == Some(quarter) {
            if let Some(last) = self.quarter_enders.last_mut() {
                last.1 = self.on_court.clone();
            }
            return Vec::new();
        }
        self.last_ended = Some(quarter);
        self.quarter_enders.push((quarter, self.on_court.clone()));

        let mut corrections = Vec::new();
        // Nothing to compare against in the opening quarter.
        if quarter > 1 {
            for side in Side::BOTH {
                let idle = self.on_court[side.index()]
                    .iter()
                    .filter(|name| !self.active.contains(*name))
                    .cloned()
                    .collect::<Vec<_>>();
                for name in idle {
                    debug!(player = %name, quarter, "pruning idle player at end of quarter");
                    self.take_off(&name);
                    corrections.push(Correction {
                        floor_minutes: self.quarter_floor_minutes(&name),
                        player: name,
                        quarter,
                        minutes: 0,
                        in_game: None,
                    });
                }
            }
        }
        self.active.clear();
        corrections
    }

    /// Applies "`entering` enters the game for `leaving`". Both names must be
    /// canonical roster names.
    ///
    /// When the tracker disagrees with the feed (the player entering is already
    /// on, or the player leaving is already off) the quarter-start substitution
    /// was never recorded, and a correction covering the quarter so far is
    /// returned for the disputed player.
    pub fn substitute(&mut self, entering: &str, leaving: &str) -> Vec<Correction> {
        if entering == leaving {
            return Vec::new();
        }
        let adjustment = i64::from(self.clock.quarter_length() / 60)
            - i64::from(self.clock.minutes_component());
        let mut corrections = Vec::new();

        if self.is_on_court(entering) {
            corrections.push(self.correct(entering, -adjustment, false));
        }
        if !self.is_on_court(leaving) {
            corrections.push(self.correct(leaving, adjustment, true));
        }

        self.put_on(entering, leaving);
        self.take_off(leaving);
        self.active.insert(entering.to_string());
        corrections
    }

    pub fn mark_active(&mut self, player: &str) {
        self.active.insert(player.to_string());
    }

    pub fn is_on_court(&self, player: &str) -> bool {
        self.players.get(player).is_some_and(|p| p.on_court)
    }

    pub fn on_court(&self, side: Side) -> &[String] {
        &self.on_court[side.index()]
    }

    /// Seconds actually observed on court. Corrections never change this.
    pub fn seconds(&self, player: &str) -> u32 {
        self.players.get(player).map(|p| p.seconds).unwrap_or(0)
    }

    /// Minutes shown in rows, including retroactive corrections.
    pub fn minutes(&self, player: &str) -> u32 {
        self.players
            .get(player)
            .map(|p| display_minutes(p.credited_secs()))
            .unwrap_or(0)
    }

    /// On-court sets captured at each "End of" play, by quarter.
    pub fn quarter_enders(&self) -> &[(u8, [Vec<String>; 2])] {
        &self.quarter_enders
    }

    fn credit(&mut self, secs: u32) {
        if secs == 0 {
            return;
        }
        for name in self.on_court.iter().flatten() {
            if let Some(player) = self.players.get_mut(name) {
                player.seconds += secs;
            }
        }
    }

    fn begin_quarter(&mut self) {
        for player in self.players.values_mut() {
            player.quarter_start_secs = player.credited_secs();
        }
        self.active.clear();
    }

    fn correct(&mut self, name: &str, minutes: i64, in_game: bool) -> Correction {
        let quarter = self.clock.quarter;
        if let Some(player) = self.players.get_mut(name) {
            let adjusted = i64::from(player.credited_secs()) + minutes * 60;
            let floored = adjusted.max(i64::from(player.quarter_start_secs));
            player.offset_secs = floored - i64::from(player.seconds);
        }
        Correction {
            player: name.to_string(),
            quarter,
            minutes,
            in_game: Some(in_game),
            floor_minutes: self.quarter_floor_minutes(name),
        }
    }

    fn quarter_floor_minutes(&self, name: &str) -> u32 {
        self.players
            .get(name)
            .map(|p| display_minutes(p.quarter_start_secs))
            .unwrap_or(0)
    }

    fn put_on(&mut self, entering: &str, replacing: &str) {
        let Some(player) = self.players.get_mut(entering) else {
            return;
        };
        if player.on_court {
            return;
        }
        player.on_court = true;
        let side = player.side.index();
        let slot = self.on_court[side].iter().position(|name| name == replacing);
        match slot {
            Some(idx) => self.on_court[side].insert(idx, entering.to_string()),
            None => self.on_court[side].push(entering.to_string()),
        }
    }

    fn take_off(&mut self, player: &str) {
        let Some(state) = self.players.get_mut(player) else {
            return;
        };
        if !state.on_court {
            return;
        }
        state.on_court = false;
        self.on_court[state.side.index()].retain(|name| name != player);
    }
}

/// Minutes shown for a seconds total: zero only when the player has not played
/// at all, otherwise at least one.
pub fn display_minutes(seconds: u32) -> u32 {
    if seconds == 0 {
        0
    } else {
        (seconds / 60).max(1)
    }
}
