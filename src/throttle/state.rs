use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation flag of a throttling session.
///
/// Written from signal handlers, read by the scheduler loop. Unset means
/// `Running`, set means `StopRequested`; once set it is never cleared.
#[derive(Clone, Debug, Default)]
pub struct RunState(Arc<AtomicBool>);

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn request_stop(&self) {
        self.0.store(true, Ordering::SeqCst)
    }

    #[inline(always)]
    pub fn stop_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Underlying flag, suitable for `signal_hook::flag::register`.
    pub(super) fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.0)
    }
}
