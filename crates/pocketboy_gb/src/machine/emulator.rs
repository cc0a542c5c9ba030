use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use typed_builder::TypedBuilder;

use crate::CLOCK_HZ;

use super::{DebugLink, DebugRequest, EmulatorError, GameBoy, LinkEvent};

/// Driver loop settings.
#[derive(Clone, Debug, TypedBuilder)]
pub struct EmulatorOptions {
    /// Pace the loop to the hardware clock.
    #[builder(default = true)]
    pub throttle: bool,
    /// Stop once this many frames have been completed.
    #[builder(default, setter(strip_option))]
    pub max_frames: Option<u64>,
}

impl Default for EmulatorOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Real-time pacing: after each emulated second, sleep off whatever is left
/// of the wall-clock second. A loop that is behind never sleeps.
#[derive(Debug)]
pub struct Throttle {
    hz: u64,
    cycles: u64,
    started: Instant,
}

impl Throttle {
    pub fn new(hz: u32) -> Self {
        Self {
            hz: hz as u64,
            cycles: 0,
            started: Instant::now(),
        }
    }

    pub fn add(&mut self, cycles: u32) {
        self.cycles += cycles as u64;
        if self.cycles < self.hz {
            return;
        }
        if let Some(rest) = Self::remaining(self.started.elapsed()) {
            log::debug!("throttle: ahead of real time, sleeping {:?}", rest);
            thread::sleep(rest);
        }
        self.cycles -= self.hz;
        self.started = Instant::now();
    }

    /// Time left in the second after `elapsed`, or `None` when there is
    /// nothing to sleep.
    pub fn remaining(elapsed: Duration) -> Option<Duration> {
        Duration::from_secs(1)
            .checked_sub(elapsed)
            .filter(|rest| !rest.is_zero())
    }
}

/// Why [`Emulator::run`] returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// The stop flag was raised.
    Cancelled,
    /// The frame limit was reached.
    FrameLimit,
    /// The debugger sent Stop or went away.
    Debugger,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub reason: StopReason,
    pub steps: u64,
    pub cycles: u64,
    pub frames: u64,
}

/// Runs a [`GameBoy`] until cancelled, stopped by a debugger or out of
/// frames. Errors from the machine end the run and are returned as is.
pub struct Emulator {
    machine: GameBoy,
    options: EmulatorOptions,
    stop: Arc<AtomicBool>,
    debugger: Option<DebugLink>,
}

impl Emulator {
    pub fn new(machine: GameBoy, options: EmulatorOptions) -> Self {
        Self {
            machine,
            options,
            stop: Arc::new(AtomicBool::new(false)),
            debugger: None,
        }
    }

    /// Flag checked between steps; set it from anywhere to end the run.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// From now on every step waits for a request on `link`.
    pub fn attach_debugger(&mut self, link: DebugLink) {
        self.debugger = Some(link);
    }

    pub fn machine(&self) -> &GameBoy {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut GameBoy {
        &mut self.machine
    }

    pub fn run(&mut self) -> Result<RunSummary, EmulatorError> {
        let mut throttle = self.options.throttle.then(|| Throttle::new(CLOCK_HZ));
        let mut steps = 0u64;
        let mut cycles_total = 0u64;
        let first_frame = self.machine.frames();

        log::info!(
            "running '{}' (throttle: {}, frame limit: {:?})",
            self.machine.title(),
            self.options.throttle,
            self.options.max_frames,
        );

        let reason = loop {
            if self.stop.load(Ordering::Relaxed) {
                break StopReason::Cancelled;
            }

            if let Some(link) = &self.debugger {
                match link.wait(&self.stop) {
                    LinkEvent::Request(DebugRequest::Next) => {}
                    LinkEvent::Request(DebugRequest::Stop) => {
                        link.acknowledge();
                        break StopReason::Debugger;
                    }
                    LinkEvent::Cancelled => break StopReason::Cancelled,
                    LinkEvent::Closed => break StopReason::Debugger,
                }
            }

            let cycles = self.machine.step()?;
            steps += 1;
            cycles_total += cycles as u64;

            if let Some(link) = &self.debugger {
                link.acknowledge();
            }
            if let Some(throttle) = throttle.as_mut() {
                throttle.add(cycles);
            }
            if let Some(limit) = self.options.max_frames {
                if self.machine.frames() - first_frame >= limit {
                    break StopReason::FrameLimit;
                }
            }
        };

        let summary = RunSummary {
            reason,
            steps,
            cycles: cycles_total,
            frames: self.machine.frames() - first_frame,
        };
        log::info!(
            "stopped ({:?}) after {} steps, {} cycles, {} frames",
            summary.reason,
            summary.steps,
            summary.cycles,
            summary.frames,
        );
        Ok(summary)
    }
}
