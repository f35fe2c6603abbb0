use std::cmp::Ordering;
use std::fmt;

use crate::error::GameError;

pub const REGULATION_QUARTERS: u8 = 4;
pub const REGULATION_QUARTER_SECS: u32 = 12 * 60;
pub const OVERTIME_SECS: u32 = 5 * 60;

pub fn quarter_length_secs(quarter: u8) -> u32 {
    if quarter <= REGULATION_QUARTERS {
        REGULATION_QUARTER_SECS
    } else {
        OVERTIME_SECS
    }
}

/// A point in game time: quarter plus seconds remaining on the game clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameClock {
    pub quarter: u8,
    pub secs_left: u32,
}

impl GameClock {
    pub fn new(quarter: u8, secs_left: u32) -> Self {
        Self { quarter, secs_left }
    }

    pub fn tip_off() -> Self {
        Self::start_of(1)
    }

    pub fn start_of(quarter: u8) -> Self {
        Self::new(quarter, quarter_length_secs(quarter))
    }

    /// Parses `M:SS`/`MM:SS`, or the sub-minute `SS.s` form (tenths dropped).
    pub fn parse(quarter: u8, raw: &str) -> Result<Self, GameError> {
        let invalid = || GameError::InvalidClock {
            raw: raw.to_string(),
        };
        if quarter == 0 {
            return Err(invalid());
        }
        let trimmed = raw.trim();
        let secs_left = if let Some((mins, secs)) = trimmed.split_once(':') {
            let mins = mins.trim().parse::<u32>().map_err(|_| invalid())?;
            let secs = parse_whole_secs(secs).ok_or_else(invalid)?;
            if secs >= 60 {
                return Err(invalid());
            }
            mins * 60 + secs
        } else {
            parse_whole_secs(trimmed).ok_or_else(invalid)?
        };
        if secs_left > quarter_length_secs(quarter) {
            return Err(invalid());
        }
        Ok(Self::new(quarter, secs_left))
    }

    pub fn quarter_length(&self) -> u32 {
        quarter_length_secs(self.quarter)
    }

    /// Whole minutes shown on the clock (the `M` of `M:SS`).
    pub fn minutes_component(&self) -> u32 {
        self.secs_left / 60
    }

    pub fn elapsed_in_quarter(&self) -> u32 {
        self.quarter_length().saturating_sub(self.secs_left)
    }

    /// Total game seconds played up to this point.
    pub fn game_elapsed(&self) -> u32 {
        let before: u32 = (1..self.quarter).map(quarter_length_secs).sum();
        before + self.elapsed_in_quarter()
    }

    /// Seconds of game time from `self` forward to `later`; zero if `later` is not after `self`.
    pub fn secs_until(&self, later: &GameClock) -> u32 {
        match self.quarter.cmp(&later.quarter) {
            Ordering::Equal => self.secs_left.saturating_sub(later.secs_left),
            Ordering::Greater => 0,
            Ordering::Less => {
                // Rest of this quarter, any quarters skipped entirely, then into the new one.
                let skipped: u32 = (self.quarter + 1..later.quarter)
                    .map(quarter_length_secs)
                    .sum();
                self.secs_left + skipped + later.elapsed_in_quarter()
            }
        }
    }

    /// Chronological order: quarter ascending, clock descending.
    pub fn chrono_cmp(&self, other: &GameClock) -> Ordering {
        self.quarter
            .cmp(&other.quarter)
            .then(other.secs_left.cmp(&self.secs_left))
    }

    pub fn label(&self) -> String {
        format!("{}:{:02}", self.secs_left / 60, self.secs_left % 60)
    }
}

impl fmt::Display for GameClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{} {}", self.quarter, self.label())
    }
}

fn parse_whole_secs(raw: &str) -> Option<u32> {
    let whole = raw.trim().split('.').next()?;
    if whole.is_empty() {
        return None;
    }
    whole.parse::<u32>().ok()
}
