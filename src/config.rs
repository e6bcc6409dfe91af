//! Run configuration.
//!
//! All simulated times are integral ticks. Inputs expressed in another unit
//! (for example milliseconds with fractional parts) are rescaled with
//! `ticks_per_unit` before the task set is built, so a period of `2.5` with
//! `ticks_per_unit = 10` becomes 25 ticks.

use crate::constants::{MissPolicy, DEFAULT_HORIZON_CAP};
use crate::{SchedulingError, TimeStep};

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Largest hyperperiod the simulator accepts, in ticks.
    pub horizon_cap: TimeStep,
    /// Number of ticks in one input time unit.
    pub ticks_per_unit: u32,
    pub miss_policy: MissPolicy,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            horizon_cap: DEFAULT_HORIZON_CAP,
            ticks_per_unit: 1,
            miss_policy: MissPolicy::Abort,
        }
    }
}

impl SimulationConfig {
    pub fn with_horizon_cap(mut self, horizon_cap: TimeStep) -> Self {
        self.horizon_cap = horizon_cap;
        self
    }

    pub fn with_ticks_per_unit(mut self, ticks_per_unit: u32) -> Self {
        self.ticks_per_unit = ticks_per_unit;
        self
    }

    pub fn with_miss_policy(mut self, miss_policy: MissPolicy) -> Self {
        self.miss_policy = miss_policy;
        self
    }

    /// Converts a raw decimal input value of task `task` into ticks.
    ///
    /// The value is read as `whole[.fraction]` with exact integer arithmetic.
    /// Fails if it is not a plain decimal number, is zero, does not land on a
    /// whole tick once scaled, or does not fit in a `TimeStep`.
    pub fn to_ticks(&self, task: &str, field: &str, raw: &str) -> Result<TimeStep, SchedulingError> {
        let raw = raw.trim();
        let invalid = |reason: String| SchedulingError::invalid_task(task, reason);

        let (whole, fraction) = raw.split_once('.').unwrap_or((raw, ""));
        let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction) {
            return Err(invalid(format!("{} '{}' is not a number", field, raw)));
        }

        let too_large = || invalid(format!("{} {} does not fit in a tick count", field, raw));
        let not_whole = || {
            invalid(format!(
                "{} {} is not a whole number of ticks ({} per unit)",
                field, raw, self.ticks_per_unit
            ))
        };

        let ticks_per_unit = u128::from(self.ticks_per_unit);
        let whole: u128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| too_large())?
        };

        let fraction = fraction.trim_end_matches('0');
        let fraction_ticks = if fraction.is_empty() {
            0
        } else {
            let digits = u32::try_from(fraction.len()).map_err(|_| not_whole())?;
            let scale = 10u128.checked_pow(digits).ok_or_else(not_whole)?;
            let numerator = fraction
                .parse::<u128>()
                .ok()
                .and_then(|f| f.checked_mul(ticks_per_unit))
                .ok_or_else(not_whole)?;
            if numerator % scale != 0 {
                return Err(not_whole());
            }
            numerator / scale
        };

        let ticks = whole
            .checked_mul(ticks_per_unit)
            .and_then(|w| w.checked_add(fraction_ticks))
            .ok_or_else(too_large)?;
        if ticks == 0 {
            return Err(invalid(format!("{} must be positive", field)));
        }

        TimeStep::try_from(ticks).map_err(|_| too_large())
    }
}
