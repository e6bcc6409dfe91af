use super::scheduler::Scheduler;
use crate::constants::Policy;
use crate::{Job, TimeStep};

/// Static priority: shorter relative deadline means higher priority.
pub struct DeadlineMonotonic;

impl Scheduler for DeadlineMonotonic {
    fn policy(&self) -> Policy {
        Policy::Dm
    }

    fn priority_of(&self, job: &Job, _now: TimeStep) -> TimeStep {
        job.task_deadline()
    }
}
