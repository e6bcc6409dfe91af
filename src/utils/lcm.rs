use gcd::Gcd;

use crate::{SchedulingError, TaskSet, TimeStep};

fn lcm(a: TimeStep, b: TimeStep) -> Option<TimeStep> {
    (a / a.gcd(b)).checked_mul(b)
}

/// Least common multiple of all `numbers`, or `None` on `u64` overflow.
pub fn multiple_lcm(numbers: &[TimeStep]) -> Option<TimeStep> {
    numbers.iter().try_fold(1, |acc, &x| lcm(acc, x))
}

/// Computes the hyperperiod of the task set, failing if it exceeds `cap`.
pub fn hyperperiod(task_set: &TaskSet, cap: TimeStep) -> Result<TimeStep, SchedulingError> {
    if task_set.is_empty() {
        return Err(SchedulingError::Configuration("empty task set".to_string()));
    }

    let periods: Vec<TimeStep> = task_set.iter().map(|t| t.period()).collect();
    match multiple_lcm(&periods) {
        Some(h) if h <= cap => Ok(h),
        _ => Err(SchedulingError::Overflow { cap }),
    }
}
