use crate::throttle::error::Error;
use crate::throttle::process::{ControlMode, Target};
use crate::throttle::state::RunState;
use log::debug;
use nix::libc::c_int;
use nix::sys::signal::{kill, raise, Signal};
use nix::unistd::Pid;
use signal_hook::SigId;

/// Signals forwarded verbatim to an owned child.
fn forwarded_signals() -> Vec<Signal> {
    #[allow(unused_mut)]
    let mut signals = vec![
        Signal::SIGHUP,
        Signal::SIGINT,
        Signal::SIGTERM,
        Signal::SIGUSR1,
        Signal::SIGUSR2,
    ];
    #[cfg(any(
        target_os = "macos",
        target_os = "ios",
        target_os = "freebsd",
        target_os = "dragonfly",
        target_os = "netbsd",
        target_os = "openbsd"
    ))]
    signals.push(Signal::SIGINFO);
    signals
}

/// Signals which end an external-watch session.
const STOP_SIGNALS: [Signal; 2] = [Signal::SIGHUP, Signal::SIGINT];

/// Installed signal actions of a throttling session.
///
/// Actions stay registered for the rest of the process lifetime unless
/// [`SignalRelay::uninstall`] is called explicitly.
#[derive(Debug)]
pub struct SignalRelay {
    ids: Vec<SigId>,
}

impl SignalRelay {
    /// Install signal actions suitable for target control mode.
    ///
    /// # Arguments
    ///
    /// * `target`: throttled process
    /// * `state`: session run state, set when an external-watch session must stop
    pub fn install(target: &Target, state: &RunState) -> Result<Self, Error> {
        let ids = match target.mode() {
            ControlMode::OwnedChild => Self::forward_to(target.pid())?,
            ControlMode::ExternalWatch => Self::stop_on(state)?,
        };
        debug!(target: "slow", "{} signal actions installed ({})", ids.len(), target.mode());

        Ok(Self { ids })
    }

    /// Remove all installed actions.
    pub fn uninstall(self) {
        for id in self.ids {
            signal_hook::low_level::unregister(id);
        }
    }

    fn forward_to(pid: Pid) -> Result<Vec<SigId>, Error> {
        let mut ids = vec![];

        for sig in forwarded_signals() {
            // only async-signal-safe calls are allowed inside the action
            let id = unsafe {
                signal_hook::low_level::register(sig as c_int, move || {
                    _ = kill(pid, sig);
                })
            }?;
            ids.push(id);
        }

        // stop the target and then ourselves, so that job control
        // suspends and resumes both processes together
        let id = unsafe {
            signal_hook::low_level::register(Signal::SIGTSTP as c_int, move || {
                _ = kill(pid, Signal::SIGTSTP);
                _ = raise(Signal::SIGSTOP);
            })
        }?;
        ids.push(id);

        Ok(ids)
    }

    fn stop_on(state: &RunState) -> Result<Vec<SigId>, Error> {
        STOP_SIGNALS
            .iter()
            .map(|sig| {
                signal_hook::flag::register(*sig as c_int, state.flag()).map_err(Error::from)
            })
            .collect()
    }
}
