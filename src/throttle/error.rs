use nix::unistd::Pid;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    // --------------------------------- validation errors -----------------------------------------
    #[error("invalid pid")]
    InvalidPid(String),
    #[error("dutyCycle must be between 0 and 1")]
    DutyCycle(String),
    #[error("timeSlice must be greater than 0 seconds")]
    TimeSlice(String),

    // --------------------------------- acquisition errors ----------------------------------------
    #[error("no process specified")]
    NoProcess,

    // --------------------------------- syscall errors --------------------------------------------
    #[error("{0} syscall error: {1}")]
    Syscall(&'static str, nix::Error),
    #[error("send signal to {0} fail: {1}")]
    Signal(Pid, nix::Error),
    #[error("install signal handler: {0}")]
    SignalHandler(#[from] std::io::Error),
}
