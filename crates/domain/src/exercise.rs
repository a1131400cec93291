use std::collections::{BTreeMap, BTreeSet};

use derive_more::{AsRef, Deref, Display, From, Into};
use log::debug;

use crate::Weight;

#[derive(Debug, Clone, PartialEq)]
pub struct Exercise {
    pub id: ExerciseID,
    pub name: Name,
    pub muscle_group: String,
    pub equipment: String,
    pub tags: BTreeSet<String>,
    /// Weight of the equipment itself, e.g. the bar.
    pub base_weight: Option<Weight>,
}

#[derive(
    Deref, Debug, Default, Display, Clone, Copy, From, Into, Hash, PartialEq, Eq, PartialOrd, Ord,
)]
pub struct ExerciseID(u32);

#[derive(AsRef, Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Name(String);

impl Name {
    pub fn new(name: &str) -> Result<Self, NameError> {
        let trimmed_name = name.trim();

        if trimmed_name.is_empty() {
            return Err(NameError::Empty);
        }

        let len = trimmed_name.chars().count();

        if len > 64 {
            return Err(NameError::TooLong(len));
        }

        Ok(Name(trimmed_name.to_string()))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum NameError {
    #[error("Name must not be empty")]
    Empty,
    #[error("Name must be 64 characters or fewer ({0} > 64)")]
    TooLong(usize),
}

/// Merge a freshly seeded catalog into the user's catalog.
///
/// Display fields are taken from the fresh entries. A base weight set by the user is kept,
/// entries only known to the user are preserved.
#[must_use]
pub fn merge_catalog(
    existing: &BTreeMap<ExerciseID, Exercise>,
    fresh: impl IntoIterator<Item = Exercise>,
) -> BTreeMap<ExerciseID, Exercise> {
    let mut result = existing.clone();
    for exercise in fresh {
        let base_weight = existing
            .get(&exercise.id)
            .and_then(|e| e.base_weight)
            .or(exercise.base_weight);
        debug!("merge catalog entry {} ({})", exercise.id, exercise.name);
        result.insert(
            exercise.id,
            Exercise {
                base_weight,
                ..exercise
            },
        );
    }
    result
}
