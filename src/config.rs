// Configuration loading and parsing (config/dashboard.toml).

use chrono::NaiveDateTime;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEADLINE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// dashboard.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire dashboard.toml file.
#[derive(Debug, Clone, Deserialize)]
struct DashboardFile {
    backend: BackendSection,
    event: EventSection,
    #[serde(default)]
    feed: FeedSection,
}

#[derive(Debug, Clone, Deserialize)]
struct BackendSection {
    http_url: String,
    /// Live feed endpoint. When absent the dashboard runs on REST polling
    /// alone.
    #[serde(default)]
    ws_url: Option<String>,
    #[serde(default)]
    bearer_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct EventSection {
    name: String,
    /// Local wall-clock deadline, e.g. `2025-11-12T16:00:00`.
    deadline: String,
}

#[derive(Debug, Clone, Deserialize)]
struct FeedSection {
    #[serde(default = "default_poll_interval")]
    poll_interval_secs: u64,
    #[serde(default = "default_max_backoff")]
    max_backoff_ms: u64,
}

impl Default for FeedSection {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            max_backoff_ms: default_max_backoff(),
        }
    }
}

fn default_poll_interval() -> u64 {
    300
}

fn default_max_backoff() -> u64 {
    30_000
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub http_url: String,
    pub ws_url: Option<String>,
    pub bearer_token: Option<String>,
    pub event_name: String,
    pub deadline: NaiveDateTime,
    pub poll_interval_secs: u64,
    pub max_backoff_ms: u64,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/dashboard.toml` relative to
/// the given `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy defaults
/// and applies no environment overrides. Prefer `load_config()`.
pub(crate) fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join("dashboard.toml");
    let text = std::fs::read_to_string(&path).map_err(|_| ConfigError::FileNotFound {
        path: path.clone(),
    })?;
    let file: DashboardFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    build_config(file)
}

fn build_config(file: DashboardFile) -> Result<Config, ConfigError> {
    if file.backend.http_url.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "backend.http_url".into(),
            message: "must not be empty".into(),
        });
    }
    if file.feed.poll_interval_secs == 0 {
        return Err(ConfigError::ValidationError {
            field: "feed.poll_interval_secs".into(),
            message: "must be greater than 0".into(),
        });
    }

    let deadline = parse_deadline(&file.event.deadline)?;

    Ok(Config {
        http_url: file.backend.http_url,
        ws_url: file.backend.ws_url.filter(|u| !u.trim().is_empty()),
        bearer_token: file.backend.bearer_token.filter(|t| !t.is_empty()),
        event_name: file.event.name,
        deadline,
        poll_interval_secs: file.feed.poll_interval_secs,
        max_backoff_ms: file.feed.max_backoff_ms,
    })
}

fn parse_deadline(raw: &str) -> Result<NaiveDateTime, ConfigError> {
    NaiveDateTime::parse_from_str(raw, DEADLINE_FORMAT).map_err(|e| {
        ConfigError::ValidationError {
            field: "event.deadline".into(),
            message: format!("expected `YYYY-MM-DDTHH:MM:SS`, got {raw:?} ({e})"),
        }
    })
}

/// Ensure config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let mut copied = Vec::new();

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                // Already customized in config/, leave it alone.
            }
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Convenience wrapper: loads config relative to the current working
/// directory, copying defaults first and applying environment overrides
/// (`REEFBOARD_HTTP_URL`, `REEFBOARD_WS_URL`, `REEFBOARD_DEADLINE`).
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    let mut config = load_config_from(&cwd)?;
    apply_env_overrides(&mut config)?;
    Ok(config)
}

fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
    if let Ok(url) = std::env::var("REEFBOARD_HTTP_URL") {
        if !url.trim().is_empty() {
            config.http_url = url;
        }
    }
    if let Ok(url) = std::env::var("REEFBOARD_WS_URL") {
        config.ws_url = Some(url).filter(|u| !u.trim().is_empty());
    }
    if let Ok(deadline) = std::env::var("REEFBOARD_DEADLINE") {
        config.deadline = parse_deadline(&deadline)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const VALID_TOML: &str = r#"
[backend]
http_url = "https://scoreboard.example.test"
ws_url = "wss://scoreboard.example.test/ws"
bearer_token = "tok"

[event]
name = "Hack the Future"
deadline = "2025-11-12T16:00:00"

[feed]
poll_interval_secs = 120
max_backoff_ms = 30000
"#;

    fn write_config(tag: &str, toml_text: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(format!("reefboard_config_test_{tag}"));
        let config_dir = tmp.join("config");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join("dashboard.toml"), toml_text).unwrap();
        tmp
    }

    #[test]
    fn loads_valid_config() {
        let tmp = write_config("valid", VALID_TOML);
        let config = load_config_from(&tmp).expect("should load valid config");

        assert_eq!(config.http_url, "https://scoreboard.example.test");
        assert_eq!(
            config.ws_url.as_deref(),
            Some("wss://scoreboard.example.test/ws")
        );
        assert_eq!(config.bearer_token.as_deref(), Some("tok"));
        assert_eq!(config.event_name, "Hack the Future");
        assert_eq!(config.poll_interval_secs, 120);
        assert_eq!(config.max_backoff_ms, 30_000);
        assert_eq!(
            config.deadline,
            NaiveDateTime::parse_from_str("2025-11-12T16:00:00", DEADLINE_FORMAT).unwrap()
        );

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn missing_ws_url_is_allowed() {
        let toml_text = r#"
[backend]
http_url = "https://scoreboard.example.test"

[event]
name = "Hack the Future"
deadline = "2025-11-12T16:00:00"
"#;
        let tmp = write_config("no_ws", toml_text);
        let config = load_config_from(&tmp).expect("should load without ws_url");
        assert!(config.ws_url.is_none());
        assert!(config.bearer_token.is_none());
        // Feed section omitted entirely: defaults apply.
        assert_eq!(config.poll_interval_secs, 300);
        assert_eq!(config.max_backoff_ms, 30_000);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn blank_ws_url_is_treated_as_missing() {
        let toml_text = r#"
[backend]
http_url = "https://scoreboard.example.test"
ws_url = ""

[event]
name = "Hack the Future"
deadline = "2025-11-12T16:00:00"
"#;
        let tmp = write_config("blank_ws", toml_text);
        let config = load_config_from(&tmp).unwrap();
        assert!(config.ws_url.is_none());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_empty_http_url() {
        let toml_text = r#"
[backend]
http_url = ""

[event]
name = "Hack the Future"
deadline = "2025-11-12T16:00:00"
"#;
        let tmp = write_config("empty_http", toml_text);
        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => {
                assert_eq!(field, "backend.http_url");
            }
            other => panic!("expected ValidationError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_poll_interval() {
        let toml_text = r#"
[backend]
http_url = "https://scoreboard.example.test"

[event]
name = "Hack the Future"
deadline = "2025-11-12T16:00:00"

[feed]
poll_interval_secs = 0
"#;
        let tmp = write_config("zero_poll", toml_text);
        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => {
                assert_eq!(field, "feed.poll_interval_secs");
            }
            other => panic!("expected ValidationError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_malformed_deadline() {
        let toml_text = r#"
[backend]
http_url = "https://scoreboard.example.test"

[event]
name = "Hack the Future"
deadline = "tomorrow-ish"
"#;
        let tmp = write_config("bad_deadline", toml_text);
        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => {
                assert_eq!(field, "event.deadline");
            }
            other => panic!("expected ValidationError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn file_not_found_for_missing_dashboard_toml() {
        let tmp = std::env::temp_dir().join("reefboard_config_test_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::FileNotFound { path } => {
                assert!(path.ends_with("dashboard.toml"));
            }
            other => panic!("expected FileNotFound, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let tmp = write_config("invalid_toml", "this is not valid [[[ toml");
        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ParseError { path, .. } => {
                assert!(path.ends_with("dashboard.toml"));
            }
            other => panic!("expected ParseError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_copies_missing_files() {
        let tmp = std::env::temp_dir().join("reefboard_config_test_ensure_copies");
        let _ = fs::remove_dir_all(&tmp);

        let defaults_dir = tmp.join("defaults");
        fs::create_dir_all(&defaults_dir).unwrap();
        fs::write(defaults_dir.join("dashboard.toml"), VALID_TOML).unwrap();
        fs::write(
            defaults_dir.join("dashboard.toml.example"),
            "# template\n",
        )
        .unwrap();

        assert!(!tmp.join("config").exists());

        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert_eq!(copied.len(), 1);
        assert!(tmp.join("config/dashboard.toml").exists());
        assert!(!tmp.join("config/dashboard.toml.example").exists());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_skips_existing() {
        let tmp = std::env::temp_dir().join("reefboard_config_test_ensure_skips");
        let _ = fs::remove_dir_all(&tmp);

        let defaults_dir = tmp.join("defaults");
        let config_dir = tmp.join("config");
        fs::create_dir_all(&defaults_dir).unwrap();
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(defaults_dir.join("dashboard.toml"), VALID_TOML).unwrap();
        fs::write(config_dir.join("dashboard.toml"), "# custom\n").unwrap();

        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert!(copied.is_empty());

        let content = fs::read_to_string(config_dir.join("dashboard.toml")).unwrap();
        assert_eq!(content, "# custom\n");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_errors_when_both_dirs_missing() {
        let tmp = std::env::temp_dir().join("reefboard_config_test_both_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();

        let err = ensure_config_files(&tmp).unwrap_err();
        match &err {
            ConfigError::DefaultsCopyError { message } => {
                assert!(message.contains("neither defaults/ nor config/"));
            }
            other => panic!("expected DefaultsCopyError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }
}
