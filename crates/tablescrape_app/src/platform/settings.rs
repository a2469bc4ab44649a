use std::fs;
use std::io;
use std::path::Path;

use engine_logging::{engine_info, engine_warn};
use tablescrape_core::Settings;
use tablescrape_engine::{ArtifactWriter, PersistError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] io::Error),
    #[error("invalid settings: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] ron::Error),
    #[error("settings path has no file name: {0}")]
    InvalidPath(String),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

pub(crate) fn parse_settings(text: &str) -> Result<Settings, SettingsError> {
    Ok(ron::from_str(text)?)
}

/// Loads settings once at startup. A missing file means defaults; an
/// unreadable or malformed one is reported and also falls back to defaults.
pub(crate) fn load_settings(path: &Path) -> Settings {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            engine_info!("No settings at {:?}; using defaults", path);
            return Settings::default();
        }
        Err(err) => {
            engine_warn!("Failed to read settings from {:?}: {}", path, err);
            return Settings::default();
        }
    };

    match parse_settings(&content) {
        Ok(settings) => {
            engine_info!("Loaded settings from {:?}", path);
            settings
        }
        Err(err) => {
            engine_warn!("Failed to parse settings from {:?}: {}", path, err);
            Settings::default()
        }
    }
}

pub(crate) fn save_settings(path: &Path, settings: &Settings) -> Result<(), SettingsError> {
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| SettingsError::InvalidPath(path.display().to_string()))?;
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let pretty = ron::ser::PrettyConfig::new();
    let content = ron::ser::to_string_pretty(settings, pretty)?;
    ArtifactWriter::new(dir).write(filename, content.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use tablescrape_core::{ExportFormat, NextControlSpec};
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        assert_eq!(
            load_settings(&temp.path().join("absent.ron")),
            Settings::default()
        );
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let settings = parse_settings(
            r#"(
                auto_start: true,
                default_format: csv,
                scrape: (min_wait_ms: 100, file_prefix: "dune"),
            )"#,
        )
        .unwrap();

        assert!(settings.auto_start);
        assert_eq!(settings.default_format, ExportFormat::Csv);
        assert_eq!(settings.scrape.min_wait_ms, 100);
        assert_eq!(settings.scrape.file_prefix, "dune");
        assert_eq!(settings.max_pagination_attempts, 100);
        assert!(settings.show_ui);
    }

    #[test]
    fn matcher_strategy_is_configurable() {
        let settings = parse_settings(
            r#"(scrape: (next_control: attribute(name: "aria-label", value: "Next")))"#,
        )
        .unwrap();
        assert_eq!(
            settings.scrape.next_control,
            NextControlSpec::Attribute {
                name: "aria-label".into(),
                value: "Next".into(),
            }
        );
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.ron");
        fs::write(&path, "(auto_start: maybe").unwrap();

        assert!(parse_settings("(auto_start: maybe").is_err());
        assert_eq!(load_settings(&path), Settings::default());
    }

    #[test]
    fn saved_settings_load_back() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tablescrape.ron");
        let settings = Settings {
            debug_mode: true,
            pagination_delay_ms: 750,
            ..Settings::default()
        };

        save_settings(&path, &settings).unwrap();
        assert_eq!(load_settings(&path), settings);
    }
}
