//! Startup: settings resolution, banner, then hand-off to the platform shell.

use std::process::ExitCode;

use sysmute_core::{POLL_INTERVAL, Schedule};
use tracing::{error, info};

use crate::{cli::Cli, config, platform};

/// Resolves the effective schedule. A broken settings file is fatal for this launch.
pub fn resolve_schedule(cli: &Cli) -> Result<Schedule, String> {
    if cli.no_config {
        return Ok(config::effective_schedule(None, cli));
    }

    let file = config::load().map_err(|e| {
        let path = config::config_path()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        format!("invalid settings file {path}: {e}")
    })?;

    Ok(config::effective_schedule(file, cli))
}

pub fn run(cli: &Cli) -> ExitCode {
    let schedule = match resolve_schedule(cli) {
        Ok(s) => s,
        Err(e) => {
            error!(msg = "config_invalid", error = %e);
            return ExitCode::FAILURE;
        }
    };

    info!(
        msg = "sysmute_started",
        window = %schedule.window,
        idle_min = schedule.idle_threshold.minutes(),
        poll_secs = POLL_INTERVAL.as_secs(),
        "mutes system audio between {} and {} once the mouse has been idle for {}",
        schedule.window.start,
        schedule.window.end,
        schedule.idle_threshold,
    );

    if !cli.has_overrides() {
        info!("to override start, end and idle minutes pass them on the command line, e.g. sysmute 23:00 08:00 5");
    }

    match platform::run(schedule) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(msg = "platform_failed", error = %e);
            ExitCode::FAILURE
        }
    }
}
