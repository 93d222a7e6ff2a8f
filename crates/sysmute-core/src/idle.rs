//! Pointer idle tracking.
//!
//! The tracker is fed one pointer sample per tick. Any movement, however
//! small, restarts the idle clock from zero. Elapsed time is counted in
//! complete minutes, matching the one-minute poll interval.

use std::{
    fmt,
    num::NonZeroU32,
    str::FromStr,
    time::{Duration, Instant},
};

use thiserror::Error;

use crate::env::Position;

/// Minutes of pointer stillness required before the user counts as idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IdleThreshold(NonZeroU32);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdleThresholdError {
    #[error("invalid idle minutes {input:?}: must be a whole number")]
    NotANumber { input: String },

    #[error("idle minutes must be greater than zero")]
    Zero,
}

impl IdleThreshold {
    pub const fn from_minutes(minutes: u32) -> Option<Self> {
        match NonZeroU32::new(minutes) {
            Some(m) => Some(Self(m)),
            None => None,
        }
    }

    pub const fn minutes(self) -> u32 {
        self.0.get()
    }
}

impl TryFrom<u32> for IdleThreshold {
    type Error = IdleThresholdError;

    fn try_from(minutes: u32) -> Result<Self, Self::Error> {
        Self::from_minutes(minutes).ok_or(IdleThresholdError::Zero)
    }
}

impl FromStr for IdleThreshold {
    type Err = IdleThresholdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let minutes = input
            .parse::<u32>()
            .map_err(|_| IdleThresholdError::NotANumber {
                input: input.to_string(),
            })?;

        Self::try_from(minutes)
    }
}

impl fmt::Display for IdleThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} min", self.minutes())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleSignal {
    /// The tracker was not running; it is now, with this sample as reference.
    Started,
    /// Same position as last time, threshold not reached yet.
    Unchanged,
    /// Position changed; the idle clock restarted.
    Moved,
    /// Same position for at least the threshold. Keeps firing until `stop`.
    ThresholdReached,
}

#[derive(Debug, Clone, Copy)]
struct Tracking {
    last_position: Position,
    idle_since: Instant,
    idle_for: Duration,
}

#[derive(Debug, Clone)]
pub struct IdleTracker {
    threshold: IdleThreshold,
    tracking: Option<Tracking>,
}

impl IdleTracker {
    pub fn new(threshold: IdleThreshold) -> Self {
        Self {
            threshold,
            tracking: None,
        }
    }

    pub fn threshold(&self) -> IdleThreshold {
        self.threshold
    }

    pub fn is_running(&self) -> bool {
        self.tracking.is_some()
    }

    pub fn last_position(&self) -> Option<Position> {
        self.tracking.map(|t| t.last_position)
    }

    /// Idle time measured at the most recent observation.
    pub fn idle_for(&self) -> Option<Duration> {
        self.tracking.map(|t| t.idle_for)
    }

    pub fn observe(&mut self, position: Position, at: Instant) -> IdleSignal {
        let Some(tracking) = self.tracking.as_mut() else {
            self.tracking = Some(Tracking {
                last_position: position,
                idle_since: at,
                idle_for: Duration::ZERO,
            });
            return IdleSignal::Started;
        };

        if position != tracking.last_position {
            tracking.last_position = position;
            tracking.idle_since = at;
            tracking.idle_for = Duration::ZERO;
            return IdleSignal::Moved;
        }

        tracking.idle_for = at.saturating_duration_since(tracking.idle_since);

        let whole_minutes = tracking.idle_for.as_secs() / 60;
        if whole_minutes >= u64::from(self.threshold.minutes()) {
            IdleSignal::ThresholdReached
        } else {
            IdleSignal::Unchanged
        }
    }

    pub fn stop(&mut self) {
        self.tracking = None;
    }
}
