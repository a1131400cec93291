use log::debug;

use crate::{ContextKey, ExerciseID, TransitionMap, WorkoutLog};

/// Minimum size of the history before any next exercise is suggested.
pub const MIN_LOGS_FOR_SUGGESTION: usize = 30;

/// Suggest the exercise which most often followed `last` in the current temporal bucket.
#[must_use]
pub fn suggest_next_exercise(
    logs: &[WorkoutLog],
    transition_map: &TransitionMap,
    last: ExerciseID,
) -> Option<ExerciseID> {
    suggest_next_exercise_in(logs, transition_map, last, ContextKey::now())
}

/// Suggest the exercise with the greatest transition weight from `last` in bucket `key`.
///
/// On equal weights the exercise with the lowest id wins.
#[must_use]
pub fn suggest_next_exercise_in(
    logs: &[WorkoutLog],
    transition_map: &TransitionMap,
    last: ExerciseID,
    key: ContextKey,
) -> Option<ExerciseID> {
    if logs.len() < MIN_LOGS_FOR_SUGGESTION {
        debug!(
            "no suggestion after {last}: {} of {MIN_LOGS_FOR_SUGGESTION} logs",
            logs.len()
        );
        return None;
    }

    let mut best = None;
    let mut max_weight = -1.0;

    for (to, weight) in transition_map.transitions(key, last)? {
        if *weight > max_weight {
            max_weight = *weight;
            best = Some(*to);
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::{Reps, SubSet, Timestamp, Weight, WorkoutSet};

    use super::*;

    static KEY: std::sync::LazyLock<ContextKey> =
        std::sync::LazyLock::new(|| ContextKey::new(1, 3).unwrap());

    fn logs(n: usize) -> Vec<WorkoutLog> {
        (0..n)
            .map(|i| WorkoutLog {
                id: (i as u128).into(),
                timestamp: Timestamp::from(i as i64 * 60_000),
                exercise_id: ((i % 3) as u32 + 1).into(),
                sets: vec![WorkoutSet::single(SubSet {
                    weight: Weight::new(50.0).unwrap(),
                    reps: Reps::new(10).unwrap(),
                    rpe: None,
                })],
            })
            .collect()
    }

    fn transition_map(entries: &[(u32, u32, f64)]) -> TransitionMap {
        entries
            .iter()
            .map(|(from, to, weight)| (*KEY, (*from).into(), (*to).into(), *weight))
            .collect()
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(29)]
    fn test_suggest_next_exercise_insufficient_history(#[case] n: usize) {
        assert_eq!(
            suggest_next_exercise_in(
                &logs(n),
                &transition_map(&[(1, 2, 10.0)]),
                1.into(),
                *KEY
            ),
            None
        );
    }

    #[rstest]
    #[case::single(&[(1, 2, 1.0)], Some(2))]
    #[case::greatest_weight(&[(1, 2, 1.0), (1, 3, 4.5), (1, 4, 2.0)], Some(3))]
    #[case::tie_lowest_id(&[(1, 4, 3.0), (1, 2, 3.0), (1, 3, 1.0)], Some(2))]
    #[case::other_source(&[(2, 3, 1.0)], None)]
    #[case::no_transitions(&[], None)]
    fn test_suggest_next_exercise(
        #[case] entries: &[(u32, u32, f64)],
        #[case] expected: Option<u32>,
    ) {
        assert_eq!(
            suggest_next_exercise_in(&logs(30), &transition_map(entries), 1.into(), *KEY),
            expected.map(ExerciseID::from)
        );
    }

    #[test]
    fn test_suggest_next_exercise_other_context() {
        assert_eq!(
            suggest_next_exercise_in(
                &logs(30),
                &transition_map(&[(1, 2, 1.0)]),
                1.into(),
                ContextKey::new(1, 4).unwrap()
            ),
            None
        );
    }
}
