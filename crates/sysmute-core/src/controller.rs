//! Per-tick mute decision.
//!
//! The controller combines the quiet window, the idle tracker and the
//! current (externally owned) mute flag. It only ever issues a mute
//! command; unmuting is left to the user. A manual unmute inside the
//! window re-arms tracking, so a fresh idle period is needed before the
//! next auto-mute.

use tracing::{debug, info};

use crate::{
    env::{AudioEnvironment, EnvError, PointerEnvironment, Timestamp},
    idle::{IdleSignal, IdleThreshold, IdleTracker},
    time_window::QuietWindow,
};

/// Immutable configuration handed to the controller at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub window: QuietWindow,
    pub idle_threshold: IdleThreshold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// Outside the quiet window.
    Inactive,
    /// Inside the window, audio unmuted, watching the pointer.
    ActiveWatching,
    /// Inside the window, audio muted (by us or by someone else).
    ActiveMuted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub state: ControllerState,
    /// Present when the idle tracker was consulted this tick.
    pub signal: Option<IdleSignal>,
    pub muted: bool,
}

impl TickReport {
    fn new(state: ControllerState) -> Self {
        Self {
            state,
            signal: None,
            muted: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MuteController {
    schedule: Schedule,
    tracker: IdleTracker,
}

impl MuteController {
    pub fn new(schedule: Schedule) -> Self {
        Self {
            schedule,
            tracker: IdleTracker::new(schedule.idle_threshold),
        }
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn tracker(&self) -> &IdleTracker {
        &self.tracker
    }

    /// Runs one decision step.
    ///
    /// The mute flag is read only inside the window and the pointer only
    /// when audio is unmuted there. On any environment error the tick ends
    /// early and the tracker keeps its state, so a failed mute command is
    /// retried on the next tick.
    pub fn tick<A, P>(
        &mut self,
        now: Timestamp,
        audio: &A,
        pointer: &P,
    ) -> Result<TickReport, EnvError>
    where
        A: AudioEnvironment + ?Sized,
        P: PointerEnvironment + ?Sized,
    {
        if !self.schedule.window.contains(now.time_of_day) {
            self.stop_tracker("outside_quiet_window");
            return Ok(TickReport::new(ControllerState::Inactive));
        }

        if audio.master_mute()? {
            self.stop_tracker("already_muted");
            return Ok(TickReport::new(ControllerState::ActiveMuted));
        }

        let position = pointer.position()?;
        let signal = self.tracker.observe(position, now.instant);
        let mut report = TickReport {
            signal: Some(signal),
            ..TickReport::new(ControllerState::ActiveWatching)
        };

        match signal {
            IdleSignal::Started => {
                info!(
                    msg = "idle_timer_started",
                    threshold_min = self.schedule.idle_threshold.minutes(),
                    x = position.x,
                    y = position.y,
                );
            }
            IdleSignal::Moved => {
                info!(
                    msg = "pointer_moved_idle_timer_restarted",
                    x = position.x,
                    y = position.y,
                );
            }
            IdleSignal::Unchanged => {
                debug!(
                    msg = "pointer_still",
                    idle_secs = self.tracker.idle_for().map_or(0, |d| d.as_secs()),
                );
            }
            IdleSignal::ThresholdReached => {
                info!(
                    msg = "user_idle_muting",
                    threshold_min = self.schedule.idle_threshold.minutes(),
                );
                audio.set_master_mute(true)?;
                self.tracker.stop();
                report.state = ControllerState::ActiveMuted;
                report.muted = true;
            }
        }

        Ok(report)
    }

    fn stop_tracker(&mut self, reason: &'static str) {
        if self.tracker.is_running() {
            info!(msg = "idle_timer_stopped", reason = reason);
            self.tracker.stop();
        }
    }
}
