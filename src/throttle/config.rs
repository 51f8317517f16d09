use crate::throttle::error::Error;
use std::time::Duration;

/// Default fraction of a time slice the target is allowed to run.
pub const DEFAULT_DUTY_CYCLE: f64 = 0.5;
/// Default length of one stop/run cycle.
pub const DEFAULT_TIME_SLICE: Duration = Duration::from_secs(1);

/// Immutable parameters of a throttling session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DutyCycleConfig {
    duty_cycle: f64,
    time_slice: Duration,
}

impl Default for DutyCycleConfig {
    fn default() -> Self {
        Self {
            duty_cycle: DEFAULT_DUTY_CYCLE,
            time_slice: DEFAULT_TIME_SLICE,
        }
    }
}

impl DutyCycleConfig {
    /// Create a config, `duty_cycle` must be in (0, 1] and `time_slice` must be non-zero.
    pub fn new(duty_cycle: f64, time_slice: Duration) -> Result<Self, Error> {
        if !valid_duty_cycle(duty_cycle) {
            return Err(Error::DutyCycle(duty_cycle.to_string()));
        }
        if time_slice.is_zero() {
            return Err(Error::TimeSlice(format!("{time_slice:?}")));
        }
        Ok(Self {
            duty_cycle,
            time_slice,
        })
    }

    pub fn duty_cycle(&self) -> f64 {
        self.duty_cycle
    }

    pub fn time_slice(&self) -> Duration {
        self.time_slice
    }

    /// Time the target spends suspended in each cycle.
    pub fn stop_duration(&self) -> Duration {
        self.time_slice.mul_f64(1.0 - self.duty_cycle)
    }

    /// Time the target spends running in each cycle.
    ///
    /// Computed as the remainder of the time slice, so that stop and run
    /// durations always add up to exactly one slice.
    pub fn run_duration(&self) -> Duration {
        self.time_slice.saturating_sub(self.stop_duration())
    }
}

fn valid_duty_cycle(v: f64) -> bool {
    v > 0.0 && v <= 1.0
}

/// Parse a duty cycle, a fraction in (0, 1].
pub fn parse_duty_cycle(s: &str) -> Result<f64, Error> {
    match s.trim().parse::<f64>() {
        Ok(v) if valid_duty_cycle(v) => Ok(v),
        _ => Err(Error::DutyCycle(s.to_string())),
    }
}

/// Parse a time slice given in (possibly fractional) seconds.
pub fn parse_time_slice(s: &str) -> Result<Duration, Error> {
    let secs = s
        .trim()
        .parse::<f64>()
        .map_err(|_| Error::TimeSlice(s.to_string()))?;
    if secs.is_nan() || secs <= 0.0 {
        return Err(Error::TimeSlice(s.to_string()));
    }

    match Duration::try_from_secs_f64(secs) {
        Ok(d) if !d.is_zero() => Ok(d),
        _ => Err(Error::TimeSlice(s.to_string())),
    }
}
