//! Command-line surface: `sysmute [START] [END] [IDLE_MINUTES]`.
//!
//! Values are parsed straight into validated core types, so a malformed
//! time or idle count is reported by clap and the process exits before
//! anything else starts.

use std::path::PathBuf;

use clap::Parser;
use sysmute_core::{IdleThreshold, TimeOfDay};

#[derive(Debug, Clone, Parser)]
#[command(
    name = "sysmute",
    version,
    about = "Mutes the master volume during a quiet window once the mouse has been idle",
    after_help = "Example: sysmute 23:00 08:00 5"
)]
pub struct Cli {
    /// Start of the quiet window, HH:MM 24-hour [default: 22:00]
    #[arg(value_name = "START")]
    pub start: Option<TimeOfDay>,

    /// End of the quiet window, HH:MM 24-hour [default: 09:00]
    #[arg(value_name = "END")]
    pub end: Option<TimeOfDay>,

    /// Minutes without mouse movement before muting [default: 5]
    #[arg(value_name = "IDLE_MINUTES", allow_negative_numbers = true)]
    pub idle_minutes: Option<IdleThreshold>,

    /// Write logs to daily rolling files in DIR instead of the console
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Ignore the settings file
    #[arg(long)]
    pub no_config: bool,
}

impl Cli {
    pub fn has_overrides(&self) -> bool {
        self.start.is_some() || self.end.is_some() || self.idle_minutes.is_some()
    }
}
