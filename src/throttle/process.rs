use crate::throttle::error::Error;
use log::{debug, info};
use nix::unistd::{fork, ForkResult, Pid};
use std::os::unix::process::CommandExt;
use std::process::Command;
use strum_macros::Display;

/// Exit status of a spawned child which failed to execute its command.
pub const EXEC_FAILURE_CODE: i32 = 127;

/// How the controller relates to the throttled process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ControlMode {
    /// Target was spawned by the controller, job-control signals are forwarded to it
    /// and its exit ends the session.
    #[strum(serialize = "owned child")]
    OwnedChild,
    /// Target was already running, the controller only suspends and resumes it.
    #[strum(serialize = "external watch")]
    ExternalWatch,
}

/// Throttled process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pid: Pid,
    mode: ControlMode,
}

impl Target {
    pub fn new(pid: Pid, mode: ControlMode) -> Self {
        Self { pid, mode }
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn mode(&self) -> ControlMode {
        self.mode
    }
}

/// Source from which the target is acquired.
#[derive(Debug, PartialEq)]
pub enum TargetSource<'a> {
    /// Watch an already running process by its pid.
    Process { pid: Pid },
    /// Spawn a new process running a command line.
    Command { program: &'a str, args: &'a [String] },
}

impl<'a> TargetSource<'a> {
    /// Choose a target source. An explicit pid always wins over a command line.
    ///
    /// # Arguments
    ///
    /// * `pid`: pid of an existing process (already validated by [`parse_pid`])
    /// * `command`: program followed by its arguments, may be empty
    pub fn from_args(pid: Option<Pid>, command: &'a [String]) -> Result<Self, Error> {
        if let Some(pid) = pid {
            return Ok(TargetSource::Process { pid });
        }

        match command.split_first() {
            Some((program, args)) => Ok(TargetSource::Command {
                program: program.as_str(),
                args,
            }),
            None => Err(Error::NoProcess),
        }
    }

    /// Establish the target. For a command line a child process is forked,
    /// an exec failure terminates only the child (with [`EXEC_FAILURE_CODE`]).
    pub fn acquire(self) -> Result<Target, Error> {
        match self {
            TargetSource::Process { pid } => {
                info!(target: "slow", "watch external process {pid}");
                Ok(Target::new(pid, ControlMode::ExternalWatch))
            }
            TargetSource::Command { program, args } => {
                let mut cmd = Command::new(program);
                cmd.args(args);

                match unsafe { fork() }.map_err(|e| Error::Syscall("fork", e))? {
                    ForkResult::Parent { child } => {
                        info!(target: "slow", "spawn {program} as process {child}");
                        Ok(Target::new(child, ControlMode::OwnedChild))
                    }
                    ForkResult::Child => {
                        let err = cmd.exec();
                        eprintln!("slow: cannot execute {program}: {err}");
                        std::process::exit(EXEC_FAILURE_CODE);
                    }
                }
            }
        }
    }
}

/// Parse a pid of an external process, it must be an integer greater than 1.
pub fn parse_pid(s: &str) -> Result<Pid, Error> {
    match s.trim().parse::<i32>() {
        Ok(raw) if raw > 1 => Ok(Pid::from_raw(raw)),
        Ok(raw) => {
            debug!(target: "slow", "reject pid {raw}");
            Err(Error::InvalidPid(s.to_string()))
        }
        Err(_) => Err(Error::InvalidPid(s.to_string())),
    }
}
