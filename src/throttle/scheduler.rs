use crate::throttle::config::DutyCycleConfig;
use crate::throttle::error::Error;
use crate::throttle::process::{ControlMode, Target};
use crate::throttle::state::RunState;
use log::{debug, trace, warn};
use nix::sys::signal::{kill, Signal};
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use std::thread;
use std::time::Duration;
use strum_macros::Display;

/// Result of a throttling session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Outcome {
    /// Stop was requested by a signal.
    #[strum(serialize = "stopped")]
    Stopped,
    /// Target process no longer exists.
    #[strum(serialize = "target missing")]
    TargetMissing,
    /// Owned child exited normally.
    #[strum(serialize = "child exited")]
    ChildExited,
}

/// Operating system side effects driven by a [`Scheduler`].
pub trait Driver {
    /// Suspend the target.
    fn suspend(&mut self) -> Result<(), Error>;

    /// Resume the target.
    fn resume(&mut self) -> Result<(), Error>;

    /// Non-blocking check of target termination. Return true only if the
    /// target exited normally.
    fn exited(&mut self) -> Result<bool, Error>;

    /// Block current thread.
    fn sleep(&mut self, duration: Duration);
}

/// [`Driver`] implementation which uses `SIGSTOP`/`SIGCONT` and `waitpid`.
pub struct OsDriver {
    target: Target,
}

impl OsDriver {
    pub fn new(target: Target) -> Self {
        Self { target }
    }

    fn send(&self, sig: Signal) -> Result<(), Error> {
        kill(self.target.pid(), sig).map_err(|e| Error::Signal(self.target.pid(), e))
    }
}

impl Driver for OsDriver {
    fn suspend(&mut self) -> Result<(), Error> {
        self.send(Signal::SIGSTOP)
    }

    fn resume(&mut self) -> Result<(), Error> {
        self.send(Signal::SIGCONT)
    }

    fn exited(&mut self) -> Result<bool, Error> {
        let status = waitpid(self.target.pid(), Some(WaitPidFlag::WNOHANG))
            .map_err(|e| Error::Syscall("waitpid", e))?;

        match status {
            WaitStatus::Exited(pid, code) => {
                debug!(target: "slow", "process {pid} exit with code {code}");
                Ok(true)
            }
            WaitStatus::Signaled(pid, sig, _) => {
                debug!(target: "slow", "process {pid} killed by {sig}");
                Ok(false)
            }
            _ => Ok(false),
        }
    }

    fn sleep(&mut self, duration: Duration) {
        thread::sleep(duration)
    }
}

/// Duty-cycle scheduler, alternately suspends and resumes a target.
pub struct Scheduler<D: Driver> {
    driver: D,
    mode: ControlMode,
    state: RunState,
    stop_duration: Duration,
    run_duration: Duration,
}

impl<D: Driver> Scheduler<D> {
    pub fn new(driver: D, mode: ControlMode, config: DutyCycleConfig, state: RunState) -> Self {
        Self {
            driver,
            mode,
            state,
            stop_duration: config.stop_duration(),
            run_duration: config.run_duration(),
        }
    }

    /// Pulse the target until a stop is requested, the target disappears
    /// or, for an owned child, the child exits.
    ///
    /// Stop requests are observed before each cycle and right after the
    /// target is resumed, so the target is never left suspended.
    pub fn run(mut self) -> Outcome {
        loop {
            if self.state.stop_requested() {
                return Outcome::Stopped;
            }

            if let Err(e) = self.driver.suspend() {
                debug!(target: "slow", "suspend: {e:#}");
                return Outcome::TargetMissing;
            }
            trace!(target: "slow", "target suspended for {:?}", self.stop_duration);
            self.pause(self.stop_duration);

            if let Err(e) = self.driver.resume() {
                debug!(target: "slow", "resume: {e:#}");
                return Outcome::TargetMissing;
            }
            if self.state.stop_requested() {
                return Outcome::Stopped;
            }
            trace!(target: "slow", "target resumed for {:?}", self.run_duration);
            self.pause(self.run_duration);

            if self.mode == ControlMode::OwnedChild {
                match self.driver.exited() {
                    Ok(true) => return Outcome::ChildExited,
                    Ok(false) => {}
                    Err(e) => warn!(target: "slow", "child status: {e:#}"),
                }
            }
        }
    }

    fn pause(&mut self, duration: Duration) {
        if !duration.is_zero() {
            self.driver.sleep(duration);
        }
    }
}
