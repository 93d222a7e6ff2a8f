//! Capabilities the controller needs from the host.
//!
//! The audio subsystem is the single source of truth for the mute flag.
//! Nothing here caches it between ticks.

use std::time::Instant;

use thiserror::Error;

use crate::time_window::TimeOfDay;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// One reading of the clock: the wall-clock time of day for the window
/// test and a monotonic instant for idle accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    pub time_of_day: TimeOfDay,
    pub instant: Instant,
}

#[derive(Debug, Error)]
pub enum EnvError {
    #[error("failed to read master mute state: {0}")]
    ReadMute(#[source] BoxError),

    #[error("failed to set master mute state: {0}")]
    SetMute(#[source] BoxError),

    #[error("failed to read pointer position: {0}")]
    ReadPointer(#[source] BoxError),
}

pub trait AudioEnvironment {
    fn master_mute(&self) -> Result<bool, EnvError>;

    fn set_master_mute(&self, muted: bool) -> Result<(), EnvError>;
}

pub trait PointerEnvironment {
    fn position(&self) -> Result<Position, EnvError>;
}

pub trait Clock {
    fn now(&self) -> Timestamp;
}

impl<T: AudioEnvironment + ?Sized> AudioEnvironment for &T {
    fn master_mute(&self) -> Result<bool, EnvError> {
        (**self).master_mute()
    }

    fn set_master_mute(&self, muted: bool) -> Result<(), EnvError> {
        (**self).set_master_mute(muted)
    }
}

impl<T: PointerEnvironment + ?Sized> PointerEnvironment for &T {
    fn position(&self) -> Result<Position, EnvError> {
        (**self).position()
    }
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}
