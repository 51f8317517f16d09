//! Process throttling by periodic `SIGSTOP`/`SIGCONT` pulses.

pub mod config;
pub mod error;
pub mod process;
pub mod relay;
pub mod scheduler;
pub mod state;

pub use config::DutyCycleConfig;
pub use error::Error;
pub use process::{ControlMode, Target, TargetSource};
pub use scheduler::Outcome;

use crate::throttle::relay::SignalRelay;
use crate::throttle::scheduler::{OsDriver, Scheduler};
use crate::throttle::state::RunState;
use log::info;

/// Run a throttling session against `target`.
///
/// Installs the signal relay for the target control mode (it stays installed
/// after return) and blocks until the session ends.
pub fn slow(target: Target, config: DutyCycleConfig) -> Result<Outcome, Error> {
    let state = RunState::new();
    let _relay = SignalRelay::install(&target, &state)?;

    info!(
        target: "slow",
        "throttle process {} ({}): duty cycle {}, time slice {:?}",
        target.pid(),
        target.mode(),
        config.duty_cycle(),
        config.time_slice()
    );

    let scheduler = Scheduler::new(OsDriver::new(target), target.mode(), config, state);
    Ok(scheduler.run())
}
