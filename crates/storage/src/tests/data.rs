use std::{collections::BTreeSet, sync::LazyLock};

use liftlog_app::AppState;
use liftlog_domain as domain;

pub static CATALOG: LazyLock<Vec<domain::Exercise>> =
    LazyLock::new(|| vec![EXERCISE.clone(), EXERCISE_2.clone()]);

pub static EXERCISE: LazyLock<domain::Exercise> = LazyLock::new(|| domain::Exercise {
    id: 1.into(),
    name: domain::Name::new("Bench Press").unwrap(),
    muscle_group: String::from("Chest"),
    equipment: String::from("Barbell"),
    tags: BTreeSet::from([String::from("compound"), String::from("push")]),
    base_weight: Some(domain::Weight::new(20.0).unwrap()),
});

pub static EXERCISE_2: LazyLock<domain::Exercise> = LazyLock::new(|| domain::Exercise {
    id: 2.into(),
    name: domain::Name::new("Cable Fly").unwrap(),
    muscle_group: String::from("Chest"),
    equipment: String::from("Cable"),
    tags: BTreeSet::new(),
    base_weight: None,
});

pub static WORKOUT_LOG: LazyLock<domain::WorkoutLog> = LazyLock::new(|| domain::WorkoutLog {
    id: 1_u128.into(),
    timestamp: 1_709_663_400_000_i64.into(),
    exercise_id: 1.into(),
    sets: vec![
        domain::WorkoutSet {
            is_warmup: true,
            ..domain::WorkoutSet::single(domain::SubSet {
                weight: domain::Weight::new(60.0).unwrap(),
                reps: domain::Reps::new(10).unwrap(),
                rpe: None,
            })
        },
        domain::WorkoutSet {
            rest_time: Some(domain::Time::new(120).unwrap()),
            ..domain::WorkoutSet::single(domain::SubSet {
                weight: domain::Weight::new(102.5).unwrap(),
                reps: domain::Reps::new(5).unwrap(),
                rpe: Some(domain::RPE::new(7.5).unwrap()),
            })
        },
        domain::WorkoutSet {
            sub_sets: vec![
                domain::SubSet {
                    weight: domain::Weight::new(80.0).unwrap(),
                    reps: domain::Reps::new(8).unwrap(),
                    rpe: Some(domain::RPE::NINE),
                },
                domain::SubSet {
                    weight: domain::Weight::new(62.5).unwrap(),
                    reps: domain::Reps::new(6).unwrap(),
                    rpe: Some(domain::RPE::TEN),
                },
            ],
            is_drop_set: true,
            is_warmup: false,
            rest_time: None,
        },
    ],
});

pub static WORKOUT_LOG_2: LazyLock<domain::WorkoutLog> = LazyLock::new(|| domain::WorkoutLog {
    id: 2_u128.into(),
    timestamp: 1_709_663_700_000_i64.into(),
    exercise_id: 2.into(),
    sets: vec![domain::WorkoutSet::single(domain::SubSet {
        weight: domain::Weight::new(12.5).unwrap(),
        reps: domain::Reps::new(12).unwrap(),
        rpe: Some(domain::RPE::EIGHT),
    })],
});

pub static APP_STATE: LazyLock<AppState> = LazyLock::new(|| AppState {
    exercises: CATALOG.iter().map(|e| (e.id, e.clone())).collect(),
    logs: vec![WORKOUT_LOG.clone(), WORKOUT_LOG_2.clone()],
    transition_map: [
        (
            domain::ContextKey::new(2, 4).unwrap(),
            domain::ExerciseID::from(1),
            domain::ExerciseID::from(2),
            2.5,
        ),
        (
            domain::ContextKey::new(2, 4).unwrap(),
            domain::ExerciseID::from(2),
            domain::ExerciseID::from(1),
            0.5,
        ),
        (
            domain::ContextKey::new(6, 1).unwrap(),
            domain::ExerciseID::from(1),
            domain::ExerciseID::from(2),
            1.0,
        ),
    ]
    .into_iter()
    .collect(),
    active_suggestion: Some(1.into()),
    session: domain::SessionState {
        start_time: Some(1_709_662_800_000_i64.into()),
        is_paused: true,
        total_paused_ms: 30_000,
        last_pause_start: Some(1_709_663_900_000_i64.into()),
    },
});
