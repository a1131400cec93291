use chrono::Local;

use crate::{ExerciseID, Timestamp, Weight, WorkoutLog};

#[derive(Debug, Clone, PartialEq)]
pub struct DailySummary {
    pub exercises: Vec<DailyExercise>,
}

impl DailySummary {
    #[must_use]
    pub fn total_sets(&self) -> usize {
        self.exercises.iter().map(|e| e.sets).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyExercise {
    pub exercise_id: ExerciseID,
    pub logs: usize,
    pub sets: usize,
    pub max_weight: Option<Weight>,
}

#[must_use]
pub fn daily_summary_today(logs: &[WorkoutLog]) -> DailySummary {
    daily_summary(logs, Timestamp::start_of_day(&Local::now()))
}

/// Summarize all logs from `start_of_day` on, grouped by exercise in order of first appearance.
#[must_use]
pub fn daily_summary(logs: &[WorkoutLog], start_of_day: Timestamp) -> DailySummary {
    let mut exercises: Vec<DailyExercise> = vec![];

    for log in logs.iter().filter(|l| l.timestamp >= start_of_day) {
        let max_weight = log
            .sets
            .iter()
            .filter_map(|s| s.max_weight())
            .max_by(Weight::total_cmp);
        let index = match exercises
            .iter()
            .position(|e| e.exercise_id == log.exercise_id)
        {
            Some(index) => index,
            None => {
                exercises.push(DailyExercise {
                    exercise_id: log.exercise_id,
                    logs: 0,
                    sets: 0,
                    max_weight: None,
                });
                exercises.len() - 1
            }
        };
        let entry = &mut exercises[index];
        entry.logs += 1;
        entry.sets += log.sets.len();
        entry.max_weight = match (entry.max_weight, max_weight) {
            (Some(a), Some(b)) => Some(if b.total_cmp(&a).is_gt() { b } else { a }),
            (a, b) => a.or(b),
        };
    }

    DailySummary { exercises }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{MS_PER_DAY, Reps, SubSet, WorkoutSet};

    use super::*;

    fn log(exercise_id: u32, timestamp: i64, weights: &[f32]) -> WorkoutLog {
        WorkoutLog {
            id: (timestamp as u128).into(),
            timestamp: Timestamp::from(timestamp),
            exercise_id: exercise_id.into(),
            sets: weights
                .iter()
                .map(|w| {
                    WorkoutSet::single(SubSet {
                        weight: Weight::new(*w).unwrap(),
                        reps: Reps::new(5).unwrap(),
                        rpe: None,
                    })
                })
                .collect(),
        }
    }

    #[test]
    fn test_daily_summary() {
        let start = MS_PER_DAY;
        let logs = vec![
            log(1, start - 1, &[200.0]),
            log(2, start, &[40.0, 50.0]),
            log(1, start + 10, &[80.0, 100.0, 90.0]),
            log(2, start + 20, &[45.0]),
        ];
        let summary = daily_summary(&logs, Timestamp::from(start));
        assert_eq!(
            summary,
            DailySummary {
                exercises: vec![
                    DailyExercise {
                        exercise_id: 2.into(),
                        logs: 2,
                        sets: 3,
                        max_weight: Some(Weight::new(50.0).unwrap()),
                    },
                    DailyExercise {
                        exercise_id: 1.into(),
                        logs: 1,
                        sets: 3,
                        max_weight: Some(Weight::new(100.0).unwrap()),
                    },
                ],
            }
        );
        assert_eq!(summary.total_sets(), 6);
    }

    #[test]
    fn test_daily_summary_without_sets() {
        let summary = daily_summary(&[log(3, 10, &[])], Timestamp::from(0_i64));
        assert_eq!(summary.exercises[0].max_weight, None);
        assert_eq!(summary.total_sets(), 0);
    }

    #[test]
    fn test_daily_summary_empty() {
        let summary = daily_summary(&[log(1, 10, &[60.0])], Timestamp::from(MS_PER_DAY));
        assert!(summary.is_empty());
        assert_eq!(summary.total_sets(), 0);
    }
}
