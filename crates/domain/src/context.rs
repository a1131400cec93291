use std::{fmt, str::FromStr};

use chrono::{Datelike, Local, Timelike};

/// Temporal bucket scoping the transition model.
///
/// The day of the week (0 = Sunday) combined with one of six 4-hour windows of the day.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ContextKey {
    day: u8,
    window: u8,
}

impl ContextKey {
    pub const WINDOW_HOURS: u32 = 4;
    pub const WINDOWS_PER_DAY: u8 = 6;

    pub fn new(day: u8, window: u8) -> Result<Self, ContextKeyError> {
        if day > 6 {
            return Err(ContextKeyError::InvalidDay(day));
        }
        if window >= Self::WINDOWS_PER_DAY {
            return Err(ContextKeyError::InvalidWindow(window));
        }
        Ok(Self { day, window })
    }

    #[must_use]
    pub fn of<T: Datelike + Timelike>(date: &T) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        Self {
            day: date.weekday().num_days_from_sunday() as u8,
            window: (date.hour() / Self::WINDOW_HOURS) as u8,
        }
    }

    #[must_use]
    pub fn now() -> Self {
        Self::of(&Local::now())
    }

    #[must_use]
    pub fn day(&self) -> u8 {
        self.day
    }

    #[must_use]
    pub fn window(&self) -> u8 {
        self.window
    }
}

impl fmt::Display for ContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.day, self.window)
    }
}

impl FromStr for ContextKey {
    type Err = ContextKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (day, window) = s
            .split_once('-')
            .ok_or_else(|| ContextKeyError::ParseError(s.to_string()))?;
        let day = day
            .parse::<u8>()
            .map_err(|_| ContextKeyError::ParseError(s.to_string()))?;
        let window = window
            .parse::<u8>()
            .map_err(|_| ContextKeyError::ParseError(s.to_string()))?;
        Self::new(day, window)
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ContextKeyError {
    #[error("Day must be in the range 0 to 6 ({0} > 6)")]
    InvalidDay(u8),
    #[error("Time window must be in the range 0 to 5 ({0} > 5)")]
    InvalidWindow(u8),
    #[error("Invalid context key \"{0}\"")]
    ParseError(String),
}
