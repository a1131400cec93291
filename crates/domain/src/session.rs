use std::fmt;

use crate::{MS_PER_SECOND, Time, Timestamp};

/// Wall-clock state of the current training session.
///
/// A session without start time is inactive.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionState {
    pub start_time: Option<Timestamp>,
    pub is_paused: bool,
    pub total_paused_ms: i64,
    pub last_pause_start: Option<Timestamp>,
}

impl SessionState {
    #[must_use]
    pub fn start(now: Timestamp) -> Self {
        Self {
            start_time: Some(now),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.start_time.is_some()
    }

    #[must_use]
    pub fn toggle_pause(self, now: Timestamp) -> Self {
        if !self.is_active() {
            return self;
        }
        if self.is_paused {
            let pause = now.millis_since(self.last_pause_start.unwrap_or(now));
            Self {
                is_paused: false,
                total_paused_ms: self.total_paused_ms.saturating_add(pause.max(0)),
                last_pause_start: None,
                ..self
            }
        } else {
            Self {
                is_paused: true,
                last_pause_start: Some(now),
                ..self
            }
        }
    }

    #[must_use]
    pub fn finish(self) -> Self {
        Self::default()
    }

    /// Active training time in milliseconds, excluding pauses.
    #[must_use]
    pub fn active_duration(&self, now: Timestamp) -> i64 {
        let Some(start_time) = self.start_time else {
            return 0;
        };
        let end = match (self.is_paused, self.last_pause_start) {
            (true, Some(pause_start)) => pause_start,
            _ => now,
        };
        end.millis_since(start_time)
            .saturating_sub(self.total_paused_ms)
            .max(0)
    }
}

/// Milliseconds formatted as `H:MM:SS`, or `M:SS` below one hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elapsed(pub i64);

impl fmt::Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_seconds = self.0.max(0) / MS_PER_SECOND;
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;
        if hours > 0 {
            write!(f, "{hours}:{minutes:02}:{seconds:02}")
        } else {
            write!(f, "{minutes}:{seconds:02}")
        }
    }
}

/// Rest timers are hidden after this many seconds.
pub const MAX_REST_SECONDS: i64 = 3600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestStatus {
    pub elapsed_seconds: i64,
    pub is_optimal: bool,
}

impl fmt::Display for RestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Elapsed(self.elapsed_seconds * MS_PER_SECOND))
    }
}

/// Time since the last log, if a rest timer should be shown.
#[must_use]
pub fn rest_status(
    last_log: Option<Timestamp>,
    now: Timestamp,
    optimal_rest: Time,
) -> Option<RestStatus> {
    let elapsed_seconds = now.millis_since(last_log?).max(0) / MS_PER_SECOND;
    if elapsed_seconds > MAX_REST_SECONDS {
        return None;
    }
    Some(RestStatus {
        elapsed_seconds,
        is_optimal: elapsed_seconds >= i64::from(optimal_rest),
    })
}
