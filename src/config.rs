//! Settings file and effective schedule.
//!
//! Precedence, lowest first: built-in defaults, `%APPDATA%\Sysmute\config.toml`,
//! positional command-line arguments. The file is optional and only read;
//! sysmute never creates or rewrites it.

pub mod raw_config;

use std::{
    io,
    path::{Path, PathBuf},
};

pub use raw_config::RawConfig;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sysmute_core::{IdleThreshold, QuietWindow, Schedule, TimeOfDay};

use crate::cli::Cli;

const APP_DIR: &str = "Sysmute";
const CONFIG_FILE: &str = "config.toml";

pub const DEFAULT_START: TimeOfDay = TimeOfDay::from_minutes(22 * 60);
pub const DEFAULT_END: TimeOfDay = TimeOfDay::from_minutes(9 * 60);
pub const DEFAULT_IDLE: IdleThreshold = match IdleThreshold::from_minutes(5) {
    Some(t) => t,
    None => panic!("default idle threshold must be non-zero"),
};

/// Values from the settings file. Every key is optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Config {
    pub start: Option<TimeOfDay>,
    pub end: Option<TimeOfDay>,
    pub idle_minutes: Option<IdleThreshold>,
}

pub fn config_path() -> io::Result<PathBuf> {
    let appdata = std::env::var_os("APPDATA")
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "APPDATA is not set"))?;

    Ok(PathBuf::from(appdata).join(APP_DIR).join(CONFIG_FILE))
}

fn confy_err(e: confy::ConfyError) -> io::Error {
    io::Error::other(e)
}

/// Loads the settings file if there is one.
///
/// A missing file, or no `APPDATA` to look in, is `Ok(None)`.
pub fn load() -> io::Result<Option<Config>> {
    match config_path() {
        Ok(path) => load_from(&path),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

pub fn load_from(path: &Path) -> io::Result<Option<Config>> {
    // confy writes defaults when the file is missing; check first so we never do.
    if !path.is_file() {
        return Ok(None);
    }

    confy::load_path(path).map(Some).map_err(confy_err)
}

pub fn effective_schedule(file: Option<Config>, cli: &Cli) -> Schedule {
    let file = file.unwrap_or_default();

    Schedule {
        window: QuietWindow::new(
            cli.start.or(file.start).unwrap_or(DEFAULT_START),
            cli.end.or(file.end).unwrap_or(DEFAULT_END),
        ),
        idle_threshold: cli
            .idle_minutes
            .or(file.idle_minutes)
            .unwrap_or(DEFAULT_IDLE),
    }
}

impl TryFrom<RawConfig> for Config {
    type Error = String;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        let start = raw
            .start
            .as_deref()
            .map(str::parse::<TimeOfDay>)
            .transpose()
            .map_err(|e| format!("start: {e}"))?;

        let end = raw
            .end
            .as_deref()
            .map(str::parse::<TimeOfDay>)
            .transpose()
            .map_err(|e| format!("end: {e}"))?;

        let idle_minutes = raw
            .idle_minutes
            .map(IdleThreshold::try_from)
            .transpose()
            .map_err(|e| format!("idle_minutes: {e}"))?;

        Ok(Self {
            start,
            end,
            idle_minutes,
        })
    }
}

impl From<&Config> for RawConfig {
    fn from(cfg: &Config) -> Self {
        Self {
            start: cfg.start.map(|t| t.to_string()),
            end: cfg.end.map(|t| t.to_string()),
            idle_minutes: cfg.idle_minutes.map(IdleThreshold::minutes),
        }
    }
}

impl<'de> Deserialize<'de> for Config {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawConfig::deserialize(deserializer)?;
        Self::try_from(raw).map_err(serde::de::Error::custom)
    }
}

impl Serialize for Config {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        RawConfig::from(self).serialize(serializer)
    }
}
