//! Decision logic for muting the master volume during a quiet window
//! once the pointer has been idle long enough.
//!
//! Platform access goes through the traits in [`env`]; everything here is
//! deterministic given the samples it is fed.

pub mod controller;
pub mod env;
pub mod idle;
pub mod poller;
pub mod time_window;

pub use controller::{ControllerState, MuteController, Schedule, TickReport};
pub use env::{AudioEnvironment, BoxError, Clock, EnvError, PointerEnvironment, Position, Timestamp};
pub use idle::{IdleSignal, IdleThreshold, IdleThresholdError, IdleTracker};
pub use poller::{POLL_INTERVAL, PollingLoop};
pub use time_window::{QuietWindow, TimeOfDay, TimeParseError, is_within_window};
