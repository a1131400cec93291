use std::{
    collections::VecDeque,
    fs, io,
    path::{Path, PathBuf},
};

use liftlog_app::{AppState, Settings, SettingsRepository, StateRepository, log};
use liftlog_domain::{DeleteError, ReadError, StorageError, WriteError};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use strum::AsRefStr;

use crate::record::{CURRENT_VERSION, StoredState};

/// Storage of the application data as JSON files in a directory.
#[derive(Debug, Clone)]
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, file: File) -> PathBuf {
        self.root.join(file.as_ref())
    }

    fn read<T: DeserializeOwned>(&self, file: File) -> Result<Option<T>, JsonStoreError> {
        match fs::read(self.path(file)) {
            Ok(content) => Ok(Some(serde_json::from_slice(&content)?)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Replace the content of `file` atomically.
    fn write<T: Serialize>(&self, file: File, value: &T) -> Result<(), JsonStoreError> {
        if self.root.exists() && !self.root.is_dir() {
            return Err(anyhow::anyhow!("{} is not a directory", self.root.display()).into());
        }
        fs::create_dir_all(&self.root)?;
        let content = serde_json::to_vec(value)?;
        let path = self.path(file);
        let tmp_path = path.with_extension("json.tmp");
        let result = fs::write(&tmp_path, content).and_then(|()| fs::rename(&tmp_path, &path));
        if result.is_err() {
            let _ = fs::remove_file(&tmp_path);
        }
        Ok(result?)
    }

    fn delete(&self, file: File) -> Result<(), JsonStoreError> {
        match fs::remove_file(self.path(file)) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }
}

impl StateRepository for JsonStore {
    fn read_state(&self) -> Result<Option<AppState>, ReadError> {
        let Some(value) = self.read::<Value>(File::State)? else {
            return Ok(None);
        };
        let version = StoredState::version_of(&value).map_err(JsonStoreError::from)?;
        if version > CURRENT_VERSION {
            return Err(JsonStoreError::UnsupportedVersion(version).into());
        }
        if version < CURRENT_VERSION {
            ::log::info!("migrate state from version {version} to {CURRENT_VERSION}");
        }
        let stored = StoredState::try_from(value).map_err(JsonStoreError::from)?;
        Ok(Some(AppState::from(stored.into_state())))
    }

    fn write_state(&self, state: &AppState) -> Result<(), WriteError> {
        Ok(self.write(File::State, &StoredState::from(state))?)
    }

    fn delete_state(&self) -> Result<(), DeleteError> {
        Ok(self.delete(File::State)?)
    }
}

impl SettingsRepository for JsonStore {
    fn read_settings(&self) -> Result<Settings, ReadError> {
        Ok(self.read::<Settings>(File::Settings)?.unwrap_or_default())
    }

    fn write_settings(&self, settings: Settings) -> Result<(), WriteError> {
        Ok(self.write(File::Settings, &settings)?)
    }
}

impl log::Repository for JsonStore {
    fn read_entries(&self) -> Result<VecDeque<log::Entry>, log::Error> {
        self.read(File::Log)
            .map(Option::unwrap_or_default)
            .map_err(|err| log::Error::Unknown(err.to_string()))
    }

    fn write_entry(&self, entry: log::Entry) -> Result<(), log::Error> {
        let mut entries = self.read_entries()?;
        log::push_entry(&mut entries, entry);
        self.write(File::Log, &entries)
            .map_err(|err| log::Error::Unknown(err.to_string()))
    }
}

#[derive(AsRefStr, Debug, Clone, Copy)]
enum File {
    #[strum(serialize = "state.json")]
    State,
    #[strum(serialize = "settings.json")]
    Settings,
    #[strum(serialize = "log.json")]
    Log,
}

#[derive(thiserror::Error, Debug)]
pub enum JsonStoreError {
    #[error("storage quota exceeded")]
    QuotaExceeded,
    #[error(transparent)]
    Io(io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("unsupported data version {0}")]
    UnsupportedVersion(u32),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<io::Error> for JsonStoreError {
    fn from(value: io::Error) -> Self {
        match value.kind() {
            io::ErrorKind::StorageFull => JsonStoreError::QuotaExceeded,
            _ => JsonStoreError::Io(value),
        }
    }
}

impl From<JsonStoreError> for StorageError {
    fn from(value: JsonStoreError) -> Self {
        match value {
            JsonStoreError::QuotaExceeded => StorageError::QuotaExceeded,
            JsonStoreError::Io(err) => StorageError::Io(err),
            JsonStoreError::Json(err) => StorageError::Serialization(err.to_string()),
            JsonStoreError::UnsupportedVersion(version) => {
                StorageError::UnsupportedVersion(version)
            }
            JsonStoreError::Other(err) => StorageError::Other(err.into()),
        }
    }
}

impl From<JsonStoreError> for ReadError {
    fn from(value: JsonStoreError) -> Self {
        ReadError::Storage(value.into())
    }
}

impl From<JsonStoreError> for WriteError {
    fn from(value: JsonStoreError) -> Self {
        WriteError::Storage(value.into())
    }
}

impl From<JsonStoreError> for DeleteError {
    fn from(value: JsonStoreError) -> Self {
        DeleteError::Storage(value.into())
    }
}
