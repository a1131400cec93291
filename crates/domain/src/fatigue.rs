use crate::{ExerciseID, MS_PER_DAY, Timestamp, WorkoutLog};

/// Gaps of this length or longer are breaks rather than recovery latency.
pub const BREAK_THRESHOLD_MS: i64 = 14 * MS_PER_DAY;

/// Allowed excess of the current gap over the average gap.
pub const LATENCY_FACTOR: f64 = 1.2;

/// Check whether the time since the last session of an exercise is abnormally long compared to
/// the usual time between its sessions.
#[must_use]
pub fn check_fatigue(logs: &[WorkoutLog], exercise_id: ExerciseID, now: Timestamp) -> bool {
    let mut timestamps = logs
        .iter()
        .filter(|l| l.exercise_id == exercise_id && l.is_session())
        .map(|l| l.timestamp)
        .collect::<Vec<_>>();

    if timestamps.len() < 2 {
        return false;
    }

    timestamps.sort_unstable();

    let gaps = timestamps
        .windows(2)
        .map(|w| w[1].millis_since(w[0]))
        .filter(|gap| *gap < BREAK_THRESHOLD_MS)
        .collect::<Vec<_>>();

    if gaps.is_empty() {
        return false;
    }

    #[allow(clippy::cast_precision_loss)]
    let avg_gap = gaps.iter().sum::<i64>() as f64 / gaps.len() as f64;
    let last = timestamps[timestamps.len() - 1];

    #[allow(clippy::cast_precision_loss)]
    let current_gap = now.millis_since(last) as f64;

    current_gap > avg_gap * LATENCY_FACTOR
}
