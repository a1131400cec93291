use std::{
    cmp::Reverse,
    collections::{BTreeMap, BTreeSet},
};

use crate::{Exercise, ExerciseID, ExerciseStats, Timestamp, smart_score_at};

#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
pub enum SortBy {
    #[strum(serialize = "name")]
    Name,
    #[strum(serialize = "frequency")]
    Frequency,
    #[default]
    #[strum(serialize = "smart")]
    Smart,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExerciseFilter {
    pub search: String,
    pub muscle_group: Option<String>,
    pub equipment: Option<String>,
    pub sort_by: SortBy,
}

impl ExerciseFilter {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.search.trim().is_empty() && self.muscle_group.is_none() && self.equipment.is_none()
    }

    #[must_use]
    pub fn matches(&self, exercise: &Exercise) -> bool {
        let search = self.search.trim().to_lowercase();
        (search.is_empty() || exercise.name.to_string().to_lowercase().contains(&search))
            && self
                .muscle_group
                .as_ref()
                .is_none_or(|m| *m == exercise.muscle_group)
            && self
                .equipment
                .as_ref()
                .is_none_or(|e| *e == exercise.equipment)
    }

    #[must_use]
    pub fn exercises<'a>(
        &self,
        exercises: impl IntoIterator<Item = &'a Exercise>,
        stats: &BTreeMap<ExerciseID, ExerciseStats>,
        suggestion: Option<ExerciseID>,
    ) -> Vec<&'a Exercise> {
        self.exercises_at(exercises, stats, suggestion, Timestamp::now())
    }

    /// Matching exercises in display order.
    ///
    /// The suggested exercise is always listed first. Exercises ranked equal keep their input
    /// order.
    #[must_use]
    pub fn exercises_at<'a>(
        &self,
        exercises: impl IntoIterator<Item = &'a Exercise>,
        stats: &BTreeMap<ExerciseID, ExerciseStats>,
        suggestion: Option<ExerciseID>,
        now: Timestamp,
    ) -> Vec<&'a Exercise> {
        let mut result = exercises
            .into_iter()
            .filter(|e| self.matches(e))
            .collect::<Vec<_>>();

        match self.sort_by {
            SortBy::Name => result.sort_by_cached_key(|e| e.name.to_string().to_lowercase()),
            SortBy::Frequency => {
                result.sort_by_key(|e| Reverse(stats.get(&e.id).map_or(0, |s| s.total_logs)));
            }
            SortBy::Smart => result.sort_by(|a, b| {
                smart_score_at(stats.get(&b.id), now)
                    .total_cmp(&smart_score_at(stats.get(&a.id), now))
            }),
        }

        if suggestion.is_some() {
            result.sort_by_key(|e| Some(e.id) != suggestion);
        }

        result
    }
}

/// Distinct values available for the exercise filter.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FilterOptions {
    pub muscle_groups: Vec<String>,
    pub equipment: Vec<String>,
}

#[must_use]
pub fn filter_options<'a>(exercises: impl IntoIterator<Item = &'a Exercise>) -> FilterOptions {
    let mut muscle_groups = BTreeSet::new();
    let mut equipment = BTreeSet::new();
    for exercise in exercises {
        muscle_groups.insert(exercise.muscle_group.clone());
        equipment.insert(exercise.equipment.clone());
    }
    FilterOptions {
        muscle_groups: muscle_groups.into_iter().collect(),
        equipment: equipment.into_iter().collect(),
    }
}
