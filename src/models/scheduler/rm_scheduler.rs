use super::scheduler::Scheduler;
use crate::constants::Policy;
use crate::{Job, TimeStep};

/// Static priority: shorter period means higher priority.
pub struct RateMonotonic;

impl Scheduler for RateMonotonic {
    fn policy(&self) -> Policy {
        Policy::Rm
    }

    fn priority_of(&self, job: &Job, _now: TimeStep) -> TimeStep {
        job.task_period()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_period() {
        let first = Job::new(0, 0, 2, 10, 8, 0);
        let second = Job::new(1, 0, 2, 10, 8, 10);
        assert_eq!(RateMonotonic.priority_of(&first, 0), 10);
        assert_eq!(RateMonotonic.priority_of(&second, 15), 10);
    }
}
