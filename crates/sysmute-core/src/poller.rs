use std::{thread, time::Duration};

use tracing::{debug, warn};

use crate::{
    controller::{MuteController, TickReport},
    env::{AudioEnvironment, Clock, PointerEnvironment},
};

pub const POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Drives the controller once per interval until the process exits.
pub struct PollingLoop<A, P, C> {
    controller: MuteController,
    audio: A,
    pointer: P,
    clock: C,
    interval: Duration,
}

impl<A, P, C> PollingLoop<A, P, C>
where
    A: AudioEnvironment,
    P: PointerEnvironment,
    C: Clock,
{
    pub fn new(controller: MuteController, audio: A, pointer: P, clock: C) -> Self {
        Self {
            controller,
            audio,
            pointer,
            clock,
            interval: POLL_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn controller(&self) -> &MuteController {
        &self.controller
    }

    /// Performs one tick. Environment failures are logged and swallowed.
    pub fn run_once(&mut self) -> Option<TickReport> {
        let now = self.clock.now();
        debug!(msg = "tick", time = %now.time_of_day);

        match self.controller.tick(now, &self.audio, &self.pointer) {
            Ok(report) => {
                debug!(
                    msg = "tick_done",
                    state = ?report.state,
                    signal = ?report.signal,
                    muted = report.muted,
                );
                Some(report)
            }
            Err(e) => {
                warn!(msg = "tick_failed", error = %e);
                None
            }
        }
    }

    pub fn run(mut self) -> ! {
        loop {
            self.run_once();
            thread::sleep(self.interval);
        }
    }
}
