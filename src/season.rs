use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local};
use serde::Serialize;

use crate::error::{Result, StatsError};

pub const FIRST_SEASON: u16 = 1981;

/// A season labeled by the calendar year it ends in (2024-25 is `2025`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SeasonId(pub u16);

impl SeasonId {
    pub fn year(self) -> u16 {
        self.0
    }

    /// Season in progress (or most recently finished) on the given date.
    /// Seasons tip off in October and are labeled by the following year.
    pub fn for_date(year: i32, month: u32) -> Self {
        let label = if month >= 10 { year + 1 } else { year };
        SeasonId(label.clamp(0, u16::MAX as i32) as u16)
    }

    pub fn current() -> Self {
        let today = Local::now().date_naive();
        Self::for_date(today.year(), today.month())
    }
}

impl fmt::Display for SeasonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SeasonId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim().parse::<u16>().map(SeasonId)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonRange {
    pub first: SeasonId,
    pub last: SeasonId,
}

impl SeasonRange {
    pub fn new(first: SeasonId, last: SeasonId) -> Self {
        if first <= last {
            Self { first, last }
        } else {
            Self {
                first: last,
                last: first,
            }
        }
    }

    pub fn through_current() -> Self {
        Self::new(SeasonId(FIRST_SEASON), SeasonId::current())
    }

    pub fn contains(&self, season: SeasonId) -> bool {
        season >= self.first && season <= self.last
    }

    pub fn validate(&self, season: SeasonId) -> Result<SeasonId> {
        if self.contains(season) {
            Ok(season)
        } else {
            Err(StatsError::SeasonOutOfRange {
                season,
                first: self.first,
                last: self.last,
            })
        }
    }

    pub fn seasons_desc(&self) -> Vec<SeasonId> {
        (self.first.0..=self.last.0).rev().map(SeasonId).collect()
    }

    pub fn newer(&self, season: SeasonId) -> SeasonId {
        SeasonId(season.0.saturating_add(1)).min(self.last)
    }

    pub fn older(&self, season: SeasonId) -> SeasonId {
        SeasonId(season.0.saturating_sub(1)).max(self.first)
    }
}
