use super::scheduler::Scheduler;
use crate::constants::Policy;
use crate::{Job, TimeStep};

/// Dynamic priority: the job with the earliest absolute deadline runs.
pub struct EarliestDeadlineFirst;

impl Scheduler for EarliestDeadlineFirst {
    fn policy(&self) -> Policy {
        Policy::Edf
    }

    fn priority_of(&self, job: &Job, _now: TimeStep) -> TimeStep {
        job.absolute_deadline()
    }
}
