//! Configuration file loading with precedence handling.

use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file path contains invalid UTF-8 or cannot be resolved.
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/chatdeck/config.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Fraction of the viewport height for full dismiss progress.
    #[serde(default)]
    pub dismiss_distance_fraction: Option<f64>,

    /// Maximum |horizontal / vertical| velocity ratio for the dismiss
    /// gesture.
    #[serde(default)]
    pub max_axis_ratio: Option<f64>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, and env vars.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Fraction of the viewport height for full dismiss progress.
    pub dismiss_distance_fraction: f64,
    /// Maximum |horizontal / vertical| velocity ratio.
    pub max_axis_ratio: f64,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            dismiss_distance_fraction: 0.6,
            max_axis_ratio: 1.5,
            log_file_path: default_log_path(),
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/chatdeck/chatdeck.log` on Unix-like systems, or
/// the appropriate platform path elsewhere. Falls back to the current
/// directory if no state directory can be determined.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("chatdeck").join("chatdeck.log")
    } else {
        PathBuf::from("chatdeck.log")
    }
}

/// Resolve default config file path.
///
/// Returns `~/.config/chatdeck/config.toml` on Unix, appropriate path on
/// other platforms. Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("chatdeck").join("config.toml"))
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument
/// 2. `CHATDECK_CONFIG` environment variable
/// 3. Default path `~/.config/chatdeck/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var("CHATDECK_CONFIG") {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use
/// the default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        dismiss_distance_fraction: config
            .dismiss_distance_fraction
            .unwrap_or(defaults.dismiss_distance_fraction),
        max_axis_ratio: config.max_axis_ratio.unwrap_or(defaults.max_axis_ratio),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `CHATDECK_DISMISS_FRACTION`: override the dismiss distance fraction
/// - `CHATDECK_LOG_FILE`: override the log file path
///
/// Unparsable numeric values are ignored with a warning rather than
/// failing startup.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(raw) = std::env::var("CHATDECK_DISMISS_FRACTION") {
        match raw.parse::<f64>() {
            Ok(fraction) if fraction > 0.0 => config.dismiss_distance_fraction = fraction,
            _ => tracing::warn!(%raw, "ignoring invalid CHATDECK_DISMISS_FRACTION"),
        }
    }

    if let Ok(path) = std::env::var("CHATDECK_LOG_FILE") {
        config.log_file_path = PathBuf::from(path);
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn missing_file_resolves_to_defaults() {
        let loaded = load_config_file("/nonexistent/chatdeck/config.toml").expect("not an error");
        assert_eq!(loaded, None);
        assert_eq!(merge_config(loaded), ResolvedConfig::default());
    }

    #[test]
    fn file_values_override_defaults() {
        let config_file = ConfigFile {
            dismiss_distance_fraction: Some(0.4),
            max_axis_ratio: None,
            log_file_path: Some(PathBuf::from("/tmp/custom.log")),
        };

        let resolved = merge_config(Some(config_file));

        assert_eq!(resolved.dismiss_distance_fraction, 0.4);
        assert_eq!(
            resolved.max_axis_ratio,
            ResolvedConfig::default().max_axis_ratio,
            "unset fields keep defaults"
        );
        assert_eq!(resolved.log_file_path, PathBuf::from("/tmp/custom.log"));
    }

    #[test]
    fn parse_error_reports_the_path() {
        let temp_dir = std::env::temp_dir().join("chatdeck_test_config_bad");
        let _ = std::fs::create_dir_all(&temp_dir);
        let path = temp_dir.join("config.toml");
        std::fs::write(&path, "dismiss_distance_fraction = [not toml").expect("write fixture");

        let err = load_config_file(&path).expect_err("must fail to parse");
        assert!(matches!(err, ConfigError::ParseError { .. }));

        let _ = std::fs::remove_dir_all(&temp_dir);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let temp_dir = std::env::temp_dir().join("chatdeck_test_config_unknown");
        let _ = std::fs::create_dir_all(&temp_dir);
        let path = temp_dir.join("config.toml");
        std::fs::write(&path, "no_such_option = true\n").expect("write fixture");

        let err = load_config_file(&path).expect_err("unknown field must fail");
        assert!(matches!(err, ConfigError::ParseError { .. }));

        let _ = std::fs::remove_dir_all(&temp_dir);
    }

    #[test]
    fn valid_file_round_trips() {
        let temp_dir = std::env::temp_dir().join("chatdeck_test_config_ok");
        let _ = std::fs::create_dir_all(&temp_dir);
        let path = temp_dir.join("config.toml");
        std::fs::write(
            &path,
            "dismiss_distance_fraction = 0.5\nmax_axis_ratio = 2.0\n",
        )
        .expect("write fixture");

        let loaded = load_config_file(&path).expect("load").expect("present");
        let resolved = merge_config(Some(loaded));
        assert_eq!(resolved.dismiss_distance_fraction, 0.5);
        assert_eq!(resolved.max_axis_ratio, 2.0);

        let _ = std::fs::remove_dir_all(&temp_dir);
    }

    #[test]
    #[serial(chatdeck_env)]
    fn env_override_replaces_fraction() {
        std::env::set_var("CHATDECK_DISMISS_FRACTION", "0.75");
        let resolved = apply_env_overrides(ResolvedConfig::default());
        std::env::remove_var("CHATDECK_DISMISS_FRACTION");

        assert_eq!(resolved.dismiss_distance_fraction, 0.75);
    }

    #[test]
    #[serial(chatdeck_env)]
    fn invalid_env_override_is_ignored() {
        std::env::set_var("CHATDECK_DISMISS_FRACTION", "not-a-number");
        let resolved = apply_env_overrides(ResolvedConfig::default());
        std::env::remove_var("CHATDECK_DISMISS_FRACTION");

        assert_eq!(
            resolved.dismiss_distance_fraction,
            ResolvedConfig::default().dismiss_distance_fraction
        );
    }

    #[test]
    fn default_log_path_names_the_crate() {
        let path = default_log_path();
        assert!(
            path.to_string_lossy().contains("chatdeck"),
            "got: {path:?}"
        );
    }
}
