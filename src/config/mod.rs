use crate::errors::{AppError, AppResult};
use crate::ui::messages::warning;
use chrono::NaiveTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    pub database: String,

    /// IANA name of the fixed civil timezone all day/month bucketing uses.
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Daily auto-close cutoff, civil wall-clock "HH:MM".
    #[serde(default = "default_cutoff")]
    pub auto_close_cutoff: String,

    /// Recurring sweep tick, minutes. Clamped to at most 5.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_minutes: u64,

    /// Open sessions longer than this (minutes) get a data-quality warning.
    #[serde(default = "default_implausible_open")]
    pub implausible_open_minutes: i64,

    /// processId → category name, used by `report --group-by category`.
    /// The ledger itself never validates these ids; this is a snapshot of the
    /// external process registry.
    #[serde(default)]
    pub categories: HashMap<String, String>,
}

fn default_timezone() -> String {
    "Asia/Tokyo".to_string()
}
fn default_cutoff() -> String {
    "23:59".to_string()
}
fn default_sweep_interval() -> u64 {
    5
}
fn default_implausible_open() -> i64 {
    960
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            timezone: default_timezone(),
            auto_close_cutoff: default_cutoff(),
            sweep_interval_minutes: default_sweep_interval(),
            implausible_open_minutes: default_implausible_open(),
            categories: HashMap::new(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".shiftledger")
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("shiftledger.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("shiftledger.sqlite")
    }

    /// Load configuration from file, or return defaults if not found.
    /// An unreadable file falls back to defaults with a warning rather than
    /// aborting: the `--db` override still has to work.
    pub fn load() -> Self {
        let path = Self::config_file();

        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(cfg) => cfg,
                Err(e) => {
                    warning(format!("Failed to parse {}: {}", path.display(), e));
                    Self::default()
                }
            },
            Err(e) => {
                warning(format!("Failed to read {}: {}", path.display(), e));
                Self::default()
            }
        }
    }

    /// Initialize configuration and database files
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> io::Result<Config> {
        let dir = Self::config_dir();

        // DB name: user provided or default
        let db_path = if let Some(name) = custom_db {
            let p = std::path::Path::new(&name);
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                dir.join(p)
            }
        } else {
            Self::database_file()
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        // Write config file (skipped in test mode)
        if !is_test {
            fs::create_dir_all(&dir)?;
            let yaml = serde_yaml::to_string(&config)
                .map_err(|e| io::Error::other(e.to_string()))?;
            fs::write(Self::config_file(), yaml)?;
        }

        Ok(config)
    }

    /// The configured civil timezone.
    pub fn tz(&self) -> AppResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| AppError::InvalidTimezone(self.timezone.clone()))
    }

    /// The configured daily cutoff.
    pub fn cutoff(&self) -> AppResult<NaiveTime> {
        crate::utils::time::parse_time(&self.auto_close_cutoff)
            .ok_or_else(|| AppError::InvalidTime(self.auto_close_cutoff.clone()))
    }

    /// Sweep tick, clamped to the 5-minute contract.
    pub fn sweep_tick(&self) -> std::time::Duration {
        let mins = self.sweep_interval_minutes.clamp(1, 5);
        std::time::Duration::from_secs(mins * 60)
    }
}
