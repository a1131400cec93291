use std::collections::BTreeMap;

use crate::{ExerciseID, MS_PER_DAY, Timestamp, WorkoutLog};

/// Score of an exercise which was never logged.
pub const UNTRIED_SCORE: f64 = 100.0;
/// Days after which the recency contribution stops growing.
pub const MAX_RECENCY_DAYS: f64 = 60.0;
pub const RECENCY_WEIGHT: f64 = 2.0;
pub const FREQUENCY_WEIGHT: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExerciseStats {
    pub last_log: Timestamp,
    pub total_logs: u32,
}

#[must_use]
pub fn exercise_stats(logs: &[WorkoutLog]) -> BTreeMap<ExerciseID, ExerciseStats> {
    let mut stats = BTreeMap::<ExerciseID, ExerciseStats>::new();
    for log in logs {
        stats
            .entry(log.exercise_id)
            .and_modify(|s| {
                s.total_logs += 1;
                s.last_log = s.last_log.max(log.timestamp);
            })
            .or_insert(ExerciseStats {
                last_log: log.timestamp,
                total_logs: 1,
            });
    }
    stats
}

#[must_use]
pub fn smart_score(stats: Option<&ExerciseStats>) -> f64 {
    smart_score_at(stats, Timestamp::now())
}

/// Priority of an exercise at `now`, higher is more due.
///
/// Combines the days since the last log (capped) with a logarithmic frequency bonus.
#[must_use]
pub fn smart_score_at(stats: Option<&ExerciseStats>, now: Timestamp) -> f64 {
    match stats {
        Some(stats) if stats.total_logs > 0 => {
            #[allow(clippy::cast_precision_loss)]
            let days_since_last = now.millis_since(stats.last_log) as f64 / MS_PER_DAY as f64;
            let recency = days_since_last.min(MAX_RECENCY_DAYS) * RECENCY_WEIGHT;
            let frequency = (f64::from(stats.total_logs) + 1.0).log2() * FREQUENCY_WEIGHT;
            recency + frequency
        }
        _ => UNTRIED_SCORE,
    }
}
