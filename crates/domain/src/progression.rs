use std::fmt;

use log::debug;

use crate::{ExerciseID, RPE, Reps, SubSet, Weight, WorkoutLog};

pub const OVERLOAD_FACTOR: f64 = 1.025;
pub const DELOAD_FACTOR: f64 = 0.9;

/// Load proposed for the next session of an exercise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadSuggestion {
    pub weight: Weight,
    pub reps: Reps,
    pub deload: bool,
}

impl fmt::Display for LoadSuggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}kg x {}", self.weight, self.reps)?;
        if self.deload {
            write!(f, " (CNS Deload)")?;
        }
        Ok(())
    }
}

/// Derive the next load of an exercise from the top set of its most recent log.
///
/// Returns `None` if the exercise was never logged or its most recent log contains no working
/// sets.
#[must_use]
pub fn calculate_suggestion(
    logs: &[WorkoutLog],
    exercise_id: ExerciseID,
    is_fatigued: bool,
) -> Option<LoadSuggestion> {
    let latest = logs
        .iter()
        .filter(|l| l.exercise_id == exercise_id)
        .rev()
        .max_by_key(|l| l.timestamp)?;

    let top = latest
        .working_sets()
        .filter_map(|s| s.top())
        .rev()
        .max_by(|a, b| a.load_cmp(b))?;

    let suggestion = if is_fatigued {
        LoadSuggestion {
            weight: scale(top.weight, DELOAD_FACTOR),
            reps: top.reps,
            deload: true,
        }
    } else {
        match top.rpe {
            Some(rpe) if rpe <= RPE::SEVEN => LoadSuggestion {
                weight: scale(top.weight, OVERLOAD_FACTOR),
                reps: top.reps,
                deload: false,
            },
            _ => maintain(top),
        }
    };

    debug!("load suggestion for {exercise_id}: {suggestion}");

    Some(suggestion)
}

fn maintain(top: &SubSet) -> LoadSuggestion {
    LoadSuggestion {
        weight: top.weight,
        reps: top.reps,
        deload: false,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn scale(weight: Weight, factor: f64) -> Weight {
    let value = Weight::round_to_half(f64::from(f32::from(weight)) * factor);
    Weight::new(value as f32).unwrap_or(weight)
}
