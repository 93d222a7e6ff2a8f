use std::{
    ffi::OsString,
    fs,
    path::PathBuf,
    sync::{Mutex, MutexGuard, OnceLock},
    time::{SystemTime, UNIX_EPOCH},
};

use sysmute_core::{IdleThreshold, TimeOfDay};

use crate::config::{self, Config};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

pub(super) fn lock_env() -> MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("sysmute-tests-{prefix}-{ts}"))
}

/// Points `APPDATA` at a fresh directory for the lifetime of the value.
pub(super) struct TempAppData {
    pub dir: PathBuf,
    old: Option<OsString>,
}

impl TempAppData {
    pub fn new(prefix: &str) -> Self {
        let dir = unique_temp_dir(prefix);
        fs::create_dir_all(&dir).unwrap();
        let old = std::env::var_os("APPDATA");
        unsafe { std::env::set_var("APPDATA", &dir) };
        Self { dir, old }
    }

    pub fn write_config(&self, contents: &str) -> PathBuf {
        let path = config::config_path().unwrap();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
        path
    }
}

impl Drop for TempAppData {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe { std::env::set_var("APPDATA", v) },
            None => unsafe { std::env::remove_var("APPDATA") },
        }
        let _ = fs::remove_dir_all(&self.dir);
    }
}

#[test]
fn config_path_lives_under_appdata() {
    let _g = lock_env();
    let appdata = TempAppData::new("path");

    let path = config::config_path().unwrap();
    assert!(path.starts_with(&appdata.dir));
    assert!(path.ends_with("Sysmute/config.toml") || path.ends_with("Sysmute\\config.toml"));
}

#[test]
fn missing_file_is_not_an_error_and_is_not_created() {
    let _g = lock_env();
    let _appdata = TempAppData::new("missing");

    assert_eq!(config::load().unwrap(), None);
    assert!(!config::config_path().unwrap().exists());
}

#[test]
fn missing_appdata_means_no_file() {
    let _g = lock_env();
    let old = std::env::var_os("APPDATA");
    unsafe { std::env::remove_var("APPDATA") };

    let loaded = config::load();

    if let Some(v) = old {
        unsafe { std::env::set_var("APPDATA", v) };
    }
    assert_eq!(loaded.unwrap(), None);
}

#[test]
fn full_file_is_parsed_into_typed_values() {
    let _g = lock_env();
    let appdata = TempAppData::new("full");
    appdata.write_config("start = \"23:15\"\nend = \"7:00\"\nidle_minutes = 10\n");

    let cfg = config::load().unwrap().unwrap();
    assert_eq!(
        cfg,
        Config {
            start: TimeOfDay::new(23, 15),
            end: TimeOfDay::new(7, 0),
            idle_minutes: IdleThreshold::from_minutes(10),
        }
    );
}

#[test]
fn partial_file_leaves_other_keys_unset() {
    let _g = lock_env();
    let appdata = TempAppData::new("partial");
    appdata.write_config("idle_minutes = 2\n");

    let cfg = config::load().unwrap().unwrap();
    assert_eq!(cfg.start, None);
    assert_eq!(cfg.end, None);
    assert_eq!(cfg.idle_minutes, IdleThreshold::from_minutes(2));
}

#[test]
fn invalid_values_are_rejected() {
    let _g = lock_env();
    let appdata = TempAppData::new("invalid");

    for contents in [
        "start = \"25:00\"\n",
        "end = \"nine\"\n",
        "idle_minutes = 0\n",
        "idle_minutes = -4\n",
        "quiet = true\n",
        "start = \n",
    ] {
        let path = appdata.write_config(contents);
        assert!(config::load_from(&path).is_err(), "accepted {contents:?}");
    }
}

#[test]
fn loading_never_rewrites_the_file() {
    let _g = lock_env();
    let appdata = TempAppData::new("readonly");
    let contents = "# hand written\nstart = \"21:00\"\n";
    let path = appdata.write_config(contents);

    config::load().unwrap();
    assert_eq!(fs::read_to_string(path).unwrap(), contents);
}
