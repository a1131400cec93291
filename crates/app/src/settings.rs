use liftlog_domain::{ReadError, SortBy, Time, WriteError};

pub trait SettingsService {
    fn get_settings(&self) -> Result<Settings, ReadError>;
    fn set_settings(&self, settings: Settings) -> Result<(), WriteError>;
}

pub trait SettingsRepository {
    /// Read the stored settings, or the defaults if no settings were stored yet.
    fn read_settings(&self) -> Result<Settings, ReadError>;
    fn write_settings(&self, settings: Settings) -> Result<(), WriteError>;
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    #[serde(with = "SortByDef")]
    pub sort_by: SortBy,
    pub optimal_rest_seconds: u32,
    pub show_rpe: bool,
    pub show_suggestions: bool,
}

impl Settings {
    #[must_use]
    pub fn optimal_rest(&self) -> Time {
        Time::new(self.optimal_rest_seconds).unwrap_or(Time::DEFAULT_REST)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sort_by: SortBy::Smart,
            optimal_rest_seconds: Time::DEFAULT_REST.into(),
            show_rpe: true,
            show_suggestions: true,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(remote = "SortBy", rename_all = "lowercase")]
enum SortByDef {
    Name,
    Frequency,
    Smart,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(90, 90)]
    #[case(180, 180)]
    #[case(10_000, 90)]
    fn test_settings_optimal_rest(#[case] seconds: u32, #[case] expected: u32) {
        let settings = Settings {
            optimal_rest_seconds: seconds,
            ..Settings::default()
        };
        assert_eq!(u32::from(settings.optimal_rest()), expected);
    }

    #[test]
    fn test_settings_default() {
        assert_eq!(
            Settings::default(),
            Settings {
                sort_by: SortBy::Smart,
                optimal_rest_seconds: 90,
                show_rpe: true,
                show_suggestions: true,
            }
        );
    }
}
