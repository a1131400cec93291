use std::collections::{BTreeMap, BTreeSet};

use liftlog_app::AppState;
use liftlog_domain as domain;
use log::warn;
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::Value;
use uuid::Uuid;

pub const CURRENT_VERSION: u32 = 1;

/// Stored state, either wrapped in a versioned envelope or in the unversioned legacy form.
///
/// Deserialization is done through [`StoredState::version_of`] and `TryFrom<Value>`, so that
/// the version can be checked before the state itself is parsed.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum StoredState {
    Versioned { version: u32, state: State },
    Unversioned(State),
}

impl StoredState {
    #[must_use]
    pub fn version(&self) -> u32 {
        match self {
            StoredState::Versioned { version, .. } => *version,
            StoredState::Unversioned(_) => 0,
        }
    }

    #[must_use]
    pub fn into_state(self) -> State {
        match self {
            StoredState::Versioned { state, .. } | StoredState::Unversioned(state) => state,
        }
    }
}

impl StoredState {
    /// Version of a stored state, 0 for the unversioned legacy form.
    pub fn version_of(value: &Value) -> Result<u32, serde_json::Error> {
        value.get("version").map_or(Ok(0), u32::deserialize)
    }
}

impl TryFrom<Value> for StoredState {
    type Error = serde_json::Error;

    fn try_from(mut value: Value) -> Result<Self, Self::Error> {
        let version = StoredState::version_of(&value)?;
        if version == 0 {
            return Ok(StoredState::Unversioned(serde_json::from_value(value)?));
        }
        let state = value.get_mut("state").map(Value::take).unwrap_or_default();
        Ok(StoredState::Versioned {
            version,
            state: serde_json::from_value(state)?,
        })
    }
}

impl From<&AppState> for StoredState {
    fn from(value: &AppState) -> Self {
        StoredState::Versioned {
            version: CURRENT_VERSION,
            state: State::from(value),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct State {
    #[serde(default, deserialize_with = "valid_entries")]
    pub exercises: BTreeMap<u32, Exercise>,
    #[serde(default, deserialize_with = "valid_items")]
    pub logs: Vec<WorkoutLog>,
    #[serde(rename = "transitionMap", default)]
    pub transition_map: BTreeMap<String, BTreeMap<u32, BTreeMap<u32, f64>>>,
    #[serde(
        rename = "activeNextSuggestion",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub active_next_suggestion: Option<Vec<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<Session>,
}

impl From<&AppState> for State {
    fn from(value: &AppState) -> Self {
        let mut transition_map: BTreeMap<String, BTreeMap<u32, BTreeMap<u32, f64>>> =
            BTreeMap::new();
        for (key, from, to, weight) in value.transition_map.iter() {
            transition_map
                .entry(key.to_string())
                .or_default()
                .entry(*from)
                .or_default()
                .insert(*to, weight);
        }
        Self {
            exercises: value
                .exercises
                .values()
                .map(|e| (*e.id, Exercise::from(e)))
                .collect(),
            logs: value.logs.iter().map(WorkoutLog::from).collect(),
            transition_map,
            active_next_suggestion: value.active_suggestion.map(|id| vec![*id]),
            session: value
                .session
                .is_active()
                .then(|| Session::from(value.session)),
        }
    }
}

impl From<State> for AppState {
    fn from(value: State) -> Self {
        let exercises = value
            .exercises
            .into_values()
            .filter_map(|e| match domain::Exercise::try_from(e) {
                Ok(exercise) => Some((exercise.id, exercise)),
                Err(err) => {
                    warn!("skipped invalid exercise: {err}");
                    None
                }
            })
            .collect::<BTreeMap<_, _>>();
        let transition_map = value
            .transition_map
            .into_iter()
            .filter_map(|(key, sources)| match key.parse::<domain::ContextKey>() {
                Ok(key) => Some((key, sources)),
                Err(err) => {
                    warn!("skipped transitions: {err}");
                    None
                }
            })
            .flat_map(|(key, sources)| {
                sources.into_iter().flat_map(move |(from, weights)| {
                    weights
                        .into_iter()
                        .filter(|(_, weight)| weight.is_finite() && *weight >= 0.0)
                        .map(move |(to, weight)| {
                            (
                                key,
                                domain::ExerciseID::from(from),
                                domain::ExerciseID::from(to),
                                weight,
                            )
                        })
                })
            })
            .collect::<domain::TransitionMap>();
        Self {
            exercises,
            logs: value.logs.into_iter().map(domain::WorkoutLog::from).collect(),
            transition_map,
            active_suggestion: value
                .active_next_suggestion
                .and_then(|ids| ids.first().copied())
                .map(domain::ExerciseID::from),
            session: value
                .session
                .map(domain::SessionState::from)
                .unwrap_or_default(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Exercise {
    pub id: u32,
    pub name: String,
    #[serde(rename = "muscleGroup")]
    pub muscle_group: String,
    pub equipment: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(rename = "baseWeight", default, skip_serializing_if = "Option::is_none")]
    pub base_weight: Option<f32>,
}

impl From<&domain::Exercise> for Exercise {
    fn from(value: &domain::Exercise) -> Self {
        Self {
            id: *value.id,
            name: value.name.to_string(),
            muscle_group: value.muscle_group.clone(),
            equipment: value.equipment.clone(),
            tags: value.tags.iter().cloned().collect(),
            base_weight: value.base_weight.map(f32::from),
        }
    }
}

impl TryFrom<Exercise> for domain::Exercise {
    type Error = domain::NameError;

    fn try_from(value: Exercise) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            name: domain::Name::new(&value.name)?,
            muscle_group: value.muscle_group,
            equipment: value.equipment,
            tags: value.tags.into_iter().collect::<BTreeSet<_>>(),
            base_weight: value.base_weight.and_then(|w| domain::Weight::new(w).ok()),
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WorkoutLog {
    pub id: String,
    pub timestamp: i64,
    #[serde(rename = "exerciseId")]
    pub exercise_id: u32,
    #[serde(default, deserialize_with = "valid_items")]
    pub sets: Vec<WorkoutSet>,
    #[serde(
        default,
        deserialize_with = "valid_items",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub series: Vec<Series>,
}

impl From<&domain::WorkoutLog> for WorkoutLog {
    fn from(value: &domain::WorkoutLog) -> Self {
        Self {
            id: value.id.to_string(),
            timestamp: *value.timestamp,
            exercise_id: *value.exercise_id,
            sets: value.sets.iter().map(WorkoutSet::from).collect(),
            series: vec![],
        }
    }
}

impl From<WorkoutLog> for domain::WorkoutLog {
    fn from(value: WorkoutLog) -> Self {
        let sets = if value.sets.is_empty() {
            value.series.into_iter().map(domain::WorkoutSet::from).collect()
        } else {
            value.sets.into_iter().map(domain::WorkoutSet::from).collect()
        };
        Self {
            id: Uuid::parse_str(&value.id).map_or_else(
                |_| {
                    warn!("replaced invalid log id \"{}\"", value.id);
                    domain::WorkoutLogID::new()
                },
                domain::WorkoutLogID::from,
            ),
            timestamp: value.timestamp.into(),
            exercise_id: value.exercise_id.into(),
            sets,
        }
    }
}

/// Persisted shapes of a set.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum WorkoutSet {
    Compound {
        #[serde(rename = "subSets", deserialize_with = "valid_items")]
        sub_sets: Vec<SubSet>,
        #[serde(rename = "isDropSet", default)]
        is_drop_set: bool,
        #[serde(rename = "isWarmup", default)]
        is_warmup: bool,
        #[serde(
            rename = "restTimeSeconds",
            default,
            deserialize_with = "lenient_u32",
            skip_serializing_if = "Option::is_none"
        )]
        rest_time_seconds: Option<u32>,
    },
    Flat {
        #[serde(default, deserialize_with = "lenient_f32")]
        weight: Option<f32>,
        #[serde(default, deserialize_with = "lenient_u32")]
        reps: Option<u32>,
        #[serde(
            default,
            deserialize_with = "lenient_f32",
            skip_serializing_if = "Option::is_none"
        )]
        rpe: Option<f32>,
        #[serde(
            rename = "restTime",
            default,
            deserialize_with = "lenient_u32",
            skip_serializing_if = "Option::is_none"
        )]
        rest_time: Option<u32>,
        #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
        set_type: Option<SetType>,
    },
}

impl From<&domain::WorkoutSet> for WorkoutSet {
    fn from(value: &domain::WorkoutSet) -> Self {
        WorkoutSet::Compound {
            sub_sets: value.sub_sets.iter().map(SubSet::from).collect(),
            is_drop_set: value.is_drop_set,
            is_warmup: value.is_warmup,
            rest_time_seconds: value.rest_time.map(u32::from),
        }
    }
}

impl From<WorkoutSet> for domain::WorkoutSet {
    fn from(value: WorkoutSet) -> Self {
        match value {
            WorkoutSet::Compound {
                sub_sets,
                is_drop_set,
                is_warmup,
                rest_time_seconds,
            } => domain::WorkoutSet {
                sub_sets: sub_sets.into_iter().map(domain::SubSet::from).collect(),
                is_drop_set,
                is_warmup,
                rest_time: rest_time_seconds.and_then(|t| domain::Time::new(t).ok()),
            },
            WorkoutSet::Flat {
                weight,
                reps,
                rpe,
                rest_time,
                set_type,
            } => domain::WorkoutSet {
                sub_sets: vec![domain::SubSet::from(SubSet { weight, reps, rpe })],
                is_drop_set: set_type == Some(SetType::Dropset),
                is_warmup: set_type == Some(SetType::Warmup),
                rest_time: rest_time.and_then(|t| domain::Time::new(t).ok()),
            },
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum SetType {
    Warmup,
    Normal,
    Dropset,
    Failure,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct SubSet {
    #[serde(default, deserialize_with = "lenient_f32")]
    pub weight: Option<f32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub reps: Option<u32>,
    #[serde(
        default,
        deserialize_with = "lenient_f32",
        skip_serializing_if = "Option::is_none"
    )]
    pub rpe: Option<f32>,
}

impl From<&domain::SubSet> for SubSet {
    fn from(value: &domain::SubSet) -> Self {
        Self {
            weight: Some(f32::from(value.weight)),
            reps: Some(u32::from(value.reps)),
            rpe: value.rpe.map(f32::from),
        }
    }
}

impl From<SubSet> for domain::SubSet {
    fn from(value: SubSet) -> Self {
        Self {
            weight: weight(value.weight),
            reps: reps(value.reps),
            rpe: value.rpe.and_then(|rpe| domain::RPE::new(rpe).ok()),
        }
    }
}

/// Set of the series format, with effort given as reps in reserve.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Series {
    #[serde(default, deserialize_with = "lenient_f32")]
    pub weight: Option<f32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub reps: Option<u32>,
    #[serde(default, deserialize_with = "lenient_f32")]
    pub rir: Option<f32>,
}

impl From<Series> for domain::WorkoutSet {
    fn from(value: Series) -> Self {
        domain::WorkoutSet::single(domain::SubSet {
            weight: weight(value.weight),
            reps: reps(value.reps),
            rpe: value
                .rir
                .and_then(|rir| domain::RIR::new(rir).ok())
                .map(domain::RPE::from),
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    #[serde(rename = "startTime")]
    pub start_time: Option<i64>,
    #[serde(rename = "isPaused", default)]
    pub is_paused: bool,
    #[serde(rename = "totalPausedTime", default)]
    pub total_paused_time: i64,
    #[serde(rename = "lastPauseStartTime", default)]
    pub last_pause_start_time: Option<i64>,
}

impl From<domain::SessionState> for Session {
    fn from(value: domain::SessionState) -> Self {
        Self {
            start_time: value.start_time.map(i64::from),
            is_paused: value.is_paused,
            total_paused_time: value.total_paused_ms,
            last_pause_start_time: value.last_pause_start.map(i64::from),
        }
    }
}

impl From<Session> for domain::SessionState {
    fn from(value: Session) -> Self {
        Self {
            start_time: value.start_time.map(domain::Timestamp::from),
            is_paused: value.is_paused,
            total_paused_ms: value.total_paused_time.max(0),
            last_pause_start: value.last_pause_start_time.map(domain::Timestamp::from),
        }
    }
}

/// Weight rounded to the supported resolution, or zero if absent or out of range.
fn weight(value: Option<f32>) -> domain::Weight {
    value
        .and_then(|v| domain::Weight::new((v * 10.0).round() / 10.0).ok())
        .unwrap_or_default()
}

fn reps(value: Option<u32>) -> domain::Reps {
    value
        .and_then(|v| domain::Reps::new(v).ok())
        .unwrap_or_default()
}

/// Any JSON value, reduced to a number if it is one.
fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?
        .as_ref()
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite()))
}

fn lenient_f32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f32>, D::Error> {
    #[allow(clippy::cast_possible_truncation)]
    let value = lenient_number(deserializer)?.map(|v| v as f32);
    Ok(value)
}

/// Non-negative whole numbers only.
fn lenient_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let value = lenient_number(deserializer)?
        .filter(|v| v.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(v))
        .map(|v| v as u32);
    Ok(value)
}

/// Items that can be parsed, skipping the others.
fn valid_items<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(Vec::<Value>::deserialize(deserializer)?
        .into_iter()
        .filter_map(|value| match serde_json::from_value(value) {
            Ok(item) => Some(item),
            Err(err) => {
                warn!("skipped invalid record: {err}");
                None
            }
        })
        .collect())
}

/// Entries with a numeric key and a value that can be parsed, skipping the others.
fn valid_entries<'de, D, T>(deserializer: D) -> Result<BTreeMap<u32, T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(BTreeMap::<String, Value>::deserialize(deserializer)?
        .into_iter()
        .filter_map(|(key, value)| {
            match (key.parse::<u32>(), serde_json::from_value(value)) {
                (Ok(key), Ok(item)) => Some((key, item)),
                (Err(err), _) => {
                    warn!("skipped record with invalid key \"{key}\": {err}");
                    None
                }
                (_, Err(err)) => {
                    warn!("skipped invalid record \"{key}\": {err}");
                    None
                }
            }
        })
        .collect())
}
