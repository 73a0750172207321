use crate::core::accumulator::OpenShiftPolicy;
use crate::core::desk::DeskSettings;
use crate::errors::{AppError, AppResult};
use crate::utils::path::expand_tilde;
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

const APP_DIR: &str = ".shiftledger";
const CONFIG_NAME: &str = "shiftledger.conf";
const DB_NAME: &str = "shiftledger.sqlite";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: String,
    /// How a shift still open at the end of a window is counted.
    pub open_shift: OpenShiftPolicy,
    pub prompt_ttl_secs: u64,
    pub max_pending_prompts: usize,
    /// 0 = unlimited
    pub history_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            open_shift: OpenShiftPolicy::default(),
            prompt_ttl_secs: 900,
            max_pending_prompts: 64,
            history_limit: 0,
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("shiftledger")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(APP_DIR)
        }
    }

    pub fn config_file() -> PathBuf {
        Self::config_dir().join(CONFIG_NAME)
    }

    pub fn database_file() -> PathBuf {
        Self::config_dir().join(DB_NAME)
    }

    /// Load the configuration file, or defaults when there is none.
    /// Fields missing from the file take their default value.
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no configuration file, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: Config = serde_yaml::from_str(&content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> AppResult<()> {
        if self.database.trim().is_empty() {
            return Err(AppError::Config("'database' must not be empty".into()));
        }
        self.prompt_ttl()?;
        Ok(())
    }

    /// `prompt_ttl_secs` as a duration; zero and values past what a
    /// `TimeDelta` can hold are rejected.
    fn prompt_ttl(&self) -> AppResult<TimeDelta> {
        if self.prompt_ttl_secs == 0 {
            return Err(AppError::Config("'prompt_ttl_secs' must be positive".into()));
        }
        i64::try_from(self.prompt_ttl_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .ok_or_else(|| {
                AppError::Config(format!(
                    "'prompt_ttl_secs' is too large: {}",
                    self.prompt_ttl_secs
                ))
            })
    }

    /// Database path with `~` expanded.
    pub fn database_path(&self) -> PathBuf {
        expand_tilde(&self.database)
    }

    pub fn desk_settings(&self) -> AppResult<DeskSettings> {
        Ok(DeskSettings {
            open_shift: self.open_shift,
            prompt_ttl: self.prompt_ttl()?,
            max_pending_prompts: self.max_pending_prompts,
            history_limit: self.history_limit,
        })
    }

    /// Create the configuration directory, write the configuration file
    /// (skipped in test mode) and return the configuration in effect.
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<Self> {
        let dir = Self::config_dir();

        let db_path = match custom_db {
            Some(name) => {
                let p = expand_tilde(&name);
                if p.is_absolute() { p } else { dir.join(p) }
            }
            None => dir.join(DB_NAME),
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        if !is_test {
            fs::create_dir_all(&dir)?;
            let yaml = serde_yaml::to_string(&config)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
        }

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        Ok(config)
    }
}
