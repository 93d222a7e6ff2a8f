use clap::Parser;
use sysmute_core::{IdleThreshold, QuietWindow, TimeOfDay};

use super::config_io_tests::{TempAppData, lock_env};
use crate::{
    app,
    cli::Cli,
    config::{self, Config, DEFAULT_END, DEFAULT_IDLE, DEFAULT_START},
};

fn cli(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("sysmute").chain(args.iter().copied())).unwrap()
}

fn t(s: &str) -> TimeOfDay {
    s.parse().unwrap()
}

#[test]
fn defaults_are_ten_pm_to_nine_am_with_five_idle_minutes() {
    assert_eq!(DEFAULT_START, t("22:00"));
    assert_eq!(DEFAULT_END, t("09:00"));
    assert_eq!(DEFAULT_IDLE.minutes(), 5);

    let schedule = config::effective_schedule(None, &cli(&[]));
    assert_eq!(schedule.window, QuietWindow::new(t("22:00"), t("09:00")));
    assert_eq!(schedule.idle_threshold, DEFAULT_IDLE);
}

#[test]
fn file_values_override_defaults() {
    let file = Config {
        start: Some(t("21:00")),
        end: None,
        idle_minutes: IdleThreshold::from_minutes(15),
    };

    let schedule = config::effective_schedule(Some(file), &cli(&[]));
    assert_eq!(schedule.window, QuietWindow::new(t("21:00"), DEFAULT_END));
    assert_eq!(schedule.idle_threshold.minutes(), 15);
}

#[test]
fn command_line_overrides_file() {
    let file = Config {
        start: Some(t("21:00")),
        end: Some(t("06:00")),
        idle_minutes: IdleThreshold::from_minutes(15),
    };

    let schedule = config::effective_schedule(Some(file), &cli(&["23:00", "08:00"]));
    assert_eq!(schedule.window, QuietWindow::new(t("23:00"), t("08:00")));
    assert_eq!(schedule.idle_threshold.minutes(), 15);
}

#[test]
fn resolve_reads_the_settings_file() {
    let _g = lock_env();
    let appdata = TempAppData::new("resolve");
    appdata.write_config("end = \"07:30\"\n");

    let schedule = app::resolve_schedule(&cli(&[])).unwrap();
    assert_eq!(schedule.window, QuietWindow::new(DEFAULT_START, t("07:30")));

    let schedule = app::resolve_schedule(&cli(&["--no-config"])).unwrap();
    assert_eq!(schedule.window.end, DEFAULT_END);
}

#[test]
fn resolve_fails_on_a_broken_settings_file() {
    let _g = lock_env();
    let appdata = TempAppData::new("broken");
    appdata.write_config("idle_minutes = \"soon\"\n");

    let err = app::resolve_schedule(&cli(&[])).unwrap_err();
    assert!(err.contains("invalid settings file"), "{err}");

    assert!(app::resolve_schedule(&cli(&["--no-config"])).is_ok());
}
