// Configuration: platform config directory resolution and config.toml
// loading with validation. Invalid values fall back to defaults and are
// reported as warnings rather than aborting startup.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;

/// Application identifier used for the config directory.
pub const APP_ID: &str = "ScreenerFilter";

/// File name of the configuration file inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Log level used when neither RUST_LOG, --debug nor config set one.
pub const DEFAULT_LOG_LEVEL: &str = "info";

const VALID_LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Directory holding `config.toml`, or the current directory when the
/// platform directories cannot be determined.
pub fn config_dir() -> PathBuf {
    match ProjectDirs::from("", "", APP_ID) {
        Some(dirs) => dirs.config_dir().to_path_buf(),
        None => {
            log::warn!("Could not determine platform config directory, using current directory");
            PathBuf::from(".")
        }
    }
}

// ---------------------------------------------------------------------------
// Raw file shape
// ---------------------------------------------------------------------------

/// Deserialisable shape of config.toml. Unknown keys are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    pub data: DataSection,
    pub ui: UiSection,
    pub logging: LoggingSection,
}

/// `[data]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DataSection {
    /// Dataset opened at startup.
    pub path: Option<PathBuf>,
    /// CSV whose first row lists the filterable columns.
    pub columns: Option<PathBuf>,
}

/// `[ui]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UiSection {
    /// "dark" or "light".
    pub theme: Option<String>,
    /// Start with one empty filter row.
    pub initial_filter_row: Option<bool>,
}

/// `[logging]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub level: Option<String>,
}

// ---------------------------------------------------------------------------
// Validated config
// ---------------------------------------------------------------------------

/// Validated application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_path: Option<PathBuf>,
    pub columns_path: Option<PathBuf>,
    pub dark_mode: bool,
    pub initial_filter_row: bool,
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: None,
            columns_path: None,
            dark_mode: true,
            initial_filter_row: true,
            log_level: None,
        }
    }
}

/// Load `config.toml` from `dir`.
///
/// A missing file yields defaults and no warnings. An unreadable or
/// unparseable file yields defaults plus one warning.
pub fn load_config(dir: &Path) -> (AppConfig, Vec<String>) {
    let path = dir.join(CONFIG_FILE_NAME);
    if !path.exists() {
        log::debug!("No config file at {}; using defaults", path.display());
        return (AppConfig::default(), Vec::new());
    }

    let content = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) => {
            let msg = format!("Could not read config file '{}': {e}. Using defaults.", path.display());
            return (AppConfig::default(), vec![msg]);
        }
    };

    let (config, warnings) = parse_config(&content);
    log::info!("Loaded config from {}", path.display());
    (config, warnings)
}

/// Parse and validate config text.
pub fn parse_config(content: &str) -> (AppConfig, Vec<String>) {
    let raw: RawConfig = match toml::from_str(content) {
        Ok(r) => r,
        Err(e) => {
            return (
                AppConfig::default(),
                vec![format!("Failed to parse config: {e}. Using defaults.")],
            );
        }
    };

    let mut warnings = Vec::new();
    let mut config = AppConfig {
        data_path: raw.data.path,
        columns_path: raw.data.columns,
        ..AppConfig::default()
    };

    if let Some(theme) = raw.ui.theme {
        match theme.to_lowercase().as_str() {
            "dark" => config.dark_mode = true,
            "light" => config.dark_mode = false,
            other => warnings.push(format!(
                "[ui] theme = \"{other}\" is not recognised. Expected \"dark\" or \"light\". Using default (dark)."
            )),
        }
    }

    if let Some(initial) = raw.ui.initial_filter_row {
        config.initial_filter_row = initial;
    }

    if let Some(level) = raw.logging.level {
        let lower = level.to_lowercase();
        if VALID_LOG_LEVELS.contains(&lower.as_str()) {
            config.log_level = Some(lower);
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default ({DEFAULT_LOG_LEVEL})."
            ));
        }
    }

    (config, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        let (config, warnings) = parse_config("");
        assert_eq!(config, AppConfig::default());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_full_config() {
        let (config, warnings) = parse_config(
            r#"
            [data]
            path = "data/screener_data.csv"
            columns = "data/screener_list.csv"

            [ui]
            theme = "Light"
            initial_filter_row = false

            [logging]
            level = "DEBUG"
            "#,
        );
        assert!(warnings.is_empty());
        assert_eq!(config.data_path, Some(PathBuf::from("data/screener_data.csv")));
        assert_eq!(config.columns_path, Some(PathBuf::from("data/screener_list.csv")));
        assert!(!config.dark_mode);
        assert!(!config.initial_filter_row);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_invalid_values_warn_and_default() {
        let (config, warnings) = parse_config(
            r#"
            [ui]
            theme = "sepia"
            [logging]
            level = "loud"
            "#,
        );
        assert_eq!(warnings.len(), 2);
        assert!(config.dark_mode);
        assert_eq!(config.log_level, None);
    }

    #[test]
    fn test_unparseable_config() {
        let (config, warnings) = parse_config("[ui\ntheme = ");
        assert_eq!(config, AppConfig::default());
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_missing_file_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        let (config, warnings) = load_config(dir.path());
        assert_eq!(config, AppConfig::default());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[ui]\ntheme = \"light\"\n").unwrap();
        let (config, _) = load_config(dir.path());
        assert!(!config.dark_mode);
    }
}
