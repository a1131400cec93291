use std::collections::BTreeMap;

use liftlog_domain::{
    ContextKey, Exercise, ExerciseFilter, ExerciseID, ExerciseStats, LoadSuggestion,
    SessionState, Timestamp, TransitionMap, WorkoutLog, WorkoutLogID, calculate_suggestion,
    check_fatigue, exercise_stats, merge_catalog, suggest_next_exercise_in,
};
use log::{debug, info};

/// Authoritative state of the application.
///
/// All operations consume the state and return the successor state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub exercises: BTreeMap<ExerciseID, Exercise>,
    pub logs: Vec<WorkoutLog>,
    pub transition_map: TransitionMap,
    pub active_suggestion: Option<ExerciseID>,
    pub session: SessionState,
}

/// Display hints of an exercise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Annotation {
    pub is_fatigued: bool,
    pub load: Option<LoadSuggestion>,
}

impl AppState {
    #[must_use]
    pub fn new(catalog: impl IntoIterator<Item = Exercise>) -> Self {
        Self {
            exercises: catalog.into_iter().map(|e| (e.id, e)).collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn add_exercise(mut self, exercise: Exercise) -> Self {
        self.exercises.insert(exercise.id, exercise);
        self
    }

    #[must_use]
    pub fn refresh_catalog(self, catalog: impl IntoIterator<Item = Exercise>) -> Self {
        Self {
            exercises: merge_catalog(&self.exercises, catalog),
            ..self
        }
    }

    #[must_use]
    pub fn add_log(self, log: WorkoutLog) -> Self {
        self.add_log_in(log, ContextKey::now())
    }

    /// Append a log, learn the transition from the previous session and update the suggestion.
    ///
    /// Warmup-only logs and repetitions of the previous exercise leave the transition map and
    /// the suggestion unchanged.
    #[must_use]
    pub fn add_log_in(mut self, log: WorkoutLog, key: ContextKey) -> Self {
        let previous = self.last_session().map(|l| l.exercise_id);
        let exercise_id = log.exercise_id;
        let is_session = log.is_session();

        self.logs.push(log);

        if !is_session {
            debug!("log of {exercise_id} contains only warmup sets");
            return self;
        }

        if let Some(from) = previous.filter(|from| *from != exercise_id) {
            self.transition_map = self.transition_map.process_feedback_in(
                key,
                from,
                exercise_id,
                self.active_suggestion,
            );
        }

        if previous != Some(exercise_id) {
            self.active_suggestion =
                suggest_next_exercise_in(&self.logs, &self.transition_map, exercise_id, key);
            if let Some(suggestion) = self.active_suggestion {
                info!("suggest {suggestion} after {exercise_id}");
            }
        }

        self
    }

    #[must_use]
    pub fn remove_log(mut self, id: WorkoutLogID) -> Self {
        self.logs.retain(|l| l.id != id);
        self
    }

    /// Remove all logs and learned transitions. The catalog is kept.
    #[must_use]
    pub fn clear(self) -> Self {
        Self {
            exercises: self.exercises,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn set_session(self, session: SessionState) -> Self {
        Self { session, ..self }
    }

    #[must_use]
    pub fn last_log(&self) -> Option<&WorkoutLog> {
        self.logs.iter().rev().max_by_key(|l| l.timestamp)
    }

    fn last_session(&self) -> Option<&WorkoutLog> {
        self.logs
            .iter()
            .filter(|l| l.is_session())
            .rev()
            .max_by_key(|l| l.timestamp)
    }

    #[must_use]
    pub fn stats(&self) -> BTreeMap<ExerciseID, ExerciseStats> {
        exercise_stats(&self.logs)
    }

    #[must_use]
    pub fn annotation(&self, exercise_id: ExerciseID, now: Timestamp) -> Annotation {
        let is_fatigued = check_fatigue(&self.logs, exercise_id, now);
        Annotation {
            is_fatigued,
            load: calculate_suggestion(&self.logs, exercise_id, is_fatigued),
        }
    }

    /// Catalog entries matching `filter` in display order.
    #[must_use]
    pub fn exercises(&self, filter: &ExerciseFilter, now: Timestamp) -> Vec<&Exercise> {
        filter.exercises_at(
            self.exercises.values(),
            &self.stats(),
            self.active_suggestion,
            now,
        )
    }
}
