use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("failed to serialize config: {0}")]
    Serialize(String),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Minimum similarity in permille for a fuzzy match to be listed.
    pub match_threshold: u16,
    /// Rows the result list shows at once; drives scroll-to-visible.
    pub visible_rows: u16,
    /// Also clear query and selection when the window loses focus.
    pub reset_on_blur: bool,
    pub log_level: String,
    pub logs_dir: PathBuf,
    #[serde(skip)]
    pub config_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let base = default_base_dir();
        Self {
            match_threshold: crate::search::DEFAULT_THRESHOLD as u16,
            visible_rows: 8,
            reset_on_blur: false,
            log_level: "info".to_string(),
            logs_dir: base.join("logs"),
            config_path: base.join("config.toml"),
        }
    }
}

pub fn default_base_dir() -> PathBuf {
    std::env::temp_dir().join("quicklaunch")
}

pub fn validate(cfg: &Config) -> Result<(), String> {
    if !(500..=1000).contains(&cfg.match_threshold) {
        return Err("match_threshold out of range".into());
    }

    if !(1..=50).contains(&cfg.visible_rows) {
        return Err("visible_rows out of range".into());
    }

    if !LOG_LEVELS.contains(&cfg.log_level.to_ascii_lowercase().as_str()) {
        return Err(format!("unsupported log_level '{}'", cfg.log_level));
    }

    if cfg.logs_dir.as_os_str().is_empty() {
        return Err("logs_dir is required".into());
    }

    if cfg.config_path.as_os_str().is_empty() {
        return Err("config_path is required".into());
    }

    Ok(())
}

/// Loads config from `path` (or the default location). A missing file yields
/// defaults pointing at that path.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let config_path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| Config::default().config_path);

    if !config_path.exists() {
        let cfg = Config {
            config_path,
            ..Config::default()
        };
        validate(&cfg).map_err(ConfigError::Invalid)?;
        return Ok(cfg);
    }

    let raw = std::fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
        path: config_path.clone(),
        source,
    })?;

    let mut cfg: Config = if is_json5(&config_path) {
        json5::from_str(&raw).map_err(|e| ConfigError::Parse {
            path: config_path.clone(),
            message: e.to_string(),
        })?
    } else {
        toml::from_str(&raw).map_err(|e| ConfigError::Parse {
            path: config_path.clone(),
            message: e.to_string(),
        })?
    };
    cfg.config_path = config_path;
    validate(&cfg).map_err(ConfigError::Invalid)?;
    Ok(cfg)
}

pub fn save(cfg: &Config) -> Result<(), ConfigError> {
    validate(cfg).map_err(ConfigError::Invalid)?;

    let encoded = if is_json5(&cfg.config_path) {
        json5::to_string(cfg).map_err(|e| ConfigError::Serialize(e.to_string()))?
    } else {
        toml::to_string_pretty(cfg).map_err(|e| ConfigError::Serialize(e.to_string()))?
    };

    if let Some(parent) = cfg.config_path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(&cfg.config_path, encoded).map_err(|source| ConfigError::Write {
        path: cfg.config_path.clone(),
        source,
    })
}

fn is_json5(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json5") || ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}
