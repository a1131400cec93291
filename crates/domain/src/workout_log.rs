use chrono::{DateTime, Local, NaiveTime, TimeZone};
use derive_more::{Deref, Display, From, Into};
use uuid::Uuid;

use crate::{
    ExerciseID, RPE, RPEError, Reps, RepsError, SubSet, Time, TimeError, Weight, WeightError,
    WorkoutSet,
};

pub const MS_PER_SECOND: i64 = 1000;
pub const MS_PER_DAY: i64 = 24 * 60 * 60 * MS_PER_SECOND;

/// Milliseconds since the Unix epoch.
#[derive(
    Deref, Debug, Default, Display, Clone, Copy, From, Into, Hash, PartialEq, Eq, PartialOrd, Ord,
)]
pub struct Timestamp(i64);

impl Timestamp {
    #[must_use]
    pub fn now() -> Self {
        Self(Local::now().timestamp_millis())
    }

    /// Start of the day containing `date`, in the time zone of `date`.
    #[must_use]
    pub fn start_of_day<Tz: TimeZone>(date: &DateTime<Tz>) -> Self {
        date.timezone()
            .from_local_datetime(&date.date_naive().and_time(NaiveTime::MIN))
            .earliest()
            .map_or(Self(date.timestamp_millis()), |d| Self(d.timestamp_millis()))
    }

    /// Milliseconds from `earlier` to `self`, saturating at the bounds of `i64`.
    #[must_use]
    pub fn millis_since(self, earlier: Timestamp) -> i64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Timestamp {
    fn from(value: DateTime<Tz>) -> Self {
        Self(value.timestamp_millis())
    }
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct WorkoutLogID(Uuid);

impl WorkoutLogID {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for WorkoutLogID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for WorkoutLogID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutLog {
    pub id: WorkoutLogID,
    pub timestamp: Timestamp,
    pub exercise_id: ExerciseID,
    pub sets: Vec<WorkoutSet>,
}

impl WorkoutLog {
    /// Create a log of identical sets from a logging form.
    #[must_use]
    pub fn from_entry(exercise_id: ExerciseID, entry: &LogEntry, timestamp: Timestamp) -> Self {
        let set = WorkoutSet {
            sub_sets: vec![SubSet {
                weight: entry.weight,
                reps: entry.reps,
                rpe: entry.rpe,
            }],
            is_drop_set: false,
            is_warmup: false,
            rest_time: entry.rest_time,
        };
        Self {
            id: WorkoutLogID::new(),
            timestamp,
            exercise_id,
            sets: vec![set; entry.sets as usize],
        }
    }

    pub fn working_sets(&self) -> impl DoubleEndedIterator<Item = &WorkoutSet> {
        self.sets.iter().filter(|s| !s.is_warmup)
    }

    /// Whether the log represents a training session of its exercise.
    ///
    /// Logs consisting solely of warmup sets are ignored by the fatigue monitor and do not
    /// contribute to transition learning.
    #[must_use]
    pub fn is_session(&self) -> bool {
        self.sets.is_empty() || self.working_sets().next().is_some()
    }
}

/// Validated input of the logging form.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub sets: u32,
    pub weight: Weight,
    pub reps: Reps,
    pub rpe: Option<RPE>,
    pub rest_time: Option<Time>,
}

impl LogEntry {
    pub fn parse(
        sets: u32,
        weight: &str,
        reps: &str,
        rpe: &str,
        rest_time: &str,
    ) -> Result<Self, EntryError> {
        if sets == 0 {
            return Err(EntryError::NoSets);
        }
        let weight = Weight::try_from(weight)?;
        if f32::from(weight) <= 0.0 {
            return Err(EntryError::NonPositiveWeight);
        }
        Ok(Self {
            sets,
            weight,
            reps: Reps::try_from(reps)?,
            rpe: if rpe.trim().is_empty() {
                None
            } else {
                Some(RPE::try_from(rpe)?)
            },
            rest_time: if rest_time.trim().is_empty() {
                None
            } else {
                Some(Time::try_from(rest_time)?)
            },
        })
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum EntryError {
    #[error("At least one set is required")]
    NoSets,
    #[error("Weight must be greater than 0 kg")]
    NonPositiveWeight,
    #[error(transparent)]
    Weight(#[from] WeightError),
    #[error(transparent)]
    Reps(#[from] RepsError),
    #[error(transparent)]
    RPE(#[from] RPEError),
    #[error(transparent)]
    Time(#[from] TimeError),
}
