use std::collections::VecDeque;

use ::log::{error, info, warn};
use liftlog_domain::{DeleteError, Exercise, ReadError, StorageError, WriteError};

use crate::{AppState, Settings, SettingsRepository, SettingsService, log};

pub trait StateRepository {
    /// Read the stored state, or `None` if no state was stored yet.
    fn read_state(&self) -> Result<Option<AppState>, ReadError>;
    fn write_state(&self, state: &AppState) -> Result<(), WriteError>;
    fn delete_state(&self) -> Result<(), DeleteError>;
}

pub struct Service<R> {
    repository: R,
}

impl<R> Service<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

macro_rules! log_on_error {
    ($result: expr, $error: ident, $action: literal, $entity: literal) => {{
        let result = $result;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                $error::Storage(StorageError::QuotaExceeded) => {
                    warn!("failed to {} {}: {err}", $action, $entity);
                }
                _ => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

impl<R: StateRepository> Service<R> {
    /// Load the stored state and merge `catalog` into it.
    ///
    /// Without a stored state a new state containing only `catalog` is created.
    pub fn load(&self, catalog: Vec<Exercise>) -> Result<AppState, ReadError> {
        let state = log_on_error!(self.repository.read_state(), ReadError, "read", "state")?;
        Ok(match state {
            Some(state) => state.refresh_catalog(catalog),
            None => {
                info!("initialize state with {} exercises", catalog.len());
                AppState::new(catalog)
            }
        })
    }

    pub fn save(&self, state: &AppState) -> Result<(), WriteError> {
        log_on_error!(
            self.repository.write_state(state),
            WriteError,
            "write",
            "state"
        )
    }

    /// Apply `update` to `state` and persist the result.
    ///
    /// The updated state is returned even if it could not be persisted, together with the
    /// persistence error.
    pub fn update(
        &self,
        state: AppState,
        update: impl FnOnce(AppState) -> AppState,
    ) -> (AppState, Result<(), WriteError>) {
        let state = update(state);
        let result = self.save(&state);
        (state, result)
    }

    pub fn clear(&self, state: AppState) -> Result<AppState, DeleteError> {
        log_on_error!(
            self.repository.delete_state(),
            DeleteError,
            "delete",
            "state"
        )?;
        Ok(state.clear())
    }
}

impl<R: SettingsRepository> SettingsService for Service<R> {
    fn get_settings(&self) -> Result<Settings, ReadError> {
        log_on_error!(
            self.repository.read_settings(),
            ReadError,
            "read",
            "settings"
        )
    }

    fn set_settings(&self, settings: Settings) -> Result<(), WriteError> {
        log_on_error!(
            self.repository.write_settings(settings),
            WriteError,
            "write",
            "settings"
        )
    }
}

impl<R: log::Repository> log::Service for Service<R> {
    fn get_log_entries(&self) -> Result<VecDeque<log::Entry>, log::Error> {
        self.repository.read_entries()
    }

    fn add_log_entry(&self, entry: log::Entry) -> Result<(), log::Error> {
        self.repository.write_entry(entry)
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, collections::BTreeSet};

    use liftlog_domain::{Name, Timestamp, WorkoutLog, WorkoutLogID};
    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Default)]
    struct FakeRepository {
        state: RefCell<Option<AppState>>,
        settings: RefCell<Option<Settings>>,
        quota: Option<usize>,
    }

    impl StateRepository for FakeRepository {
        fn read_state(&self) -> Result<Option<AppState>, ReadError> {
            Ok(self.state.borrow().clone())
        }

        fn write_state(&self, state: &AppState) -> Result<(), WriteError> {
            if self.quota.is_some_and(|quota| state.logs.len() > quota) {
                return Err(StorageError::QuotaExceeded.into());
            }
            *self.state.borrow_mut() = Some(state.clone());
            Ok(())
        }

        fn delete_state(&self) -> Result<(), DeleteError> {
            *self.state.borrow_mut() = None;
            Ok(())
        }
    }

    impl SettingsRepository for FakeRepository {
        fn read_settings(&self) -> Result<Settings, ReadError> {
            Ok(self.settings.borrow().unwrap_or_default())
        }

        fn write_settings(&self, settings: Settings) -> Result<(), WriteError> {
            *self.settings.borrow_mut() = Some(settings);
            Ok(())
        }
    }

    fn exercise(id: u32, name: &str) -> Exercise {
        Exercise {
            id: id.into(),
            name: Name::new(name).unwrap(),
            muscle_group: String::from("Back"),
            equipment: String::from("Cable"),
            tags: BTreeSet::new(),
            base_weight: None,
        }
    }

    fn log(id: u128) -> WorkoutLog {
        WorkoutLog {
            id: WorkoutLogID::from(id),
            timestamp: Timestamp::from(1000_i64),
            exercise_id: 1.into(),
            sets: vec![],
        }
    }

    #[test]
    fn test_load_without_stored_state() {
        let service = Service::new(FakeRepository::default());
        assert_eq!(
            service.load(vec![exercise(1, "Row")]).unwrap(),
            AppState::new([exercise(1, "Row")])
        );
    }

    #[test]
    fn test_load_merges_catalog() {
        let service = Service::new(FakeRepository::default());
        let state = AppState::new([exercise(1, "Row")]).add_exercise(exercise(7, "Custom"));
        service.save(&state).unwrap();
        assert_eq!(
            service
                .load(vec![exercise(1, "Seated Row"), exercise(2, "Pulldown")])
                .unwrap()
                .exercises
                .values()
                .map(|e| e.name.to_string())
                .collect::<Vec<_>>(),
            vec!["Seated Row", "Pulldown", "Custom"]
        );
    }

    #[test]
    fn test_update_returns_state_on_quota_exceeded() {
        let service = Service::new(FakeRepository {
            quota: Some(1),
            ..FakeRepository::default()
        });
        let state = AppState::new([exercise(1, "Row")]);
        let (state, result) = service.update(state, |s| s.add_log(log(1)));
        assert!(result.is_ok());
        let (state, result) = service.update(state, |s| s.add_log(log(2)));
        assert!(matches!(
            result,
            Err(WriteError::Storage(StorageError::QuotaExceeded))
        ));
        assert_eq!(state.logs.len(), 2);
        assert_eq!(service.load(vec![]).unwrap().logs.len(), 1);
    }

    #[test]
    fn test_clear() {
        let service = Service::new(FakeRepository::default());
        let (state, _) = service.update(AppState::new([exercise(1, "Row")]), |s| {
            s.add_log(log(1))
        });
        let state = service.clear(state).unwrap();
        assert!(state.logs.is_empty());
        assert_eq!(state.exercises.len(), 1);
        assert_eq!(service.repository.read_state().unwrap(), None);
    }

    #[test]
    fn test_settings() {
        let service = Service::new(FakeRepository::default());
        assert_eq!(service.get_settings().unwrap(), Settings::default());
        let settings = Settings {
            show_rpe: false,
            ..Settings::default()
        };
        service.set_settings(settings).unwrap();
        assert_eq!(service.get_settings().unwrap(), settings);
    }
}
