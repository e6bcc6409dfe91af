use crate::TimeStep;

use super::ID;

/// One release of a periodic task.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    id: ID,                      // Sequence number of the release within its task
    task_index: usize,           // Position of the task in the frozen task set
    task_period: TimeStep,
    task_deadline: TimeStep,
    remaining_time: TimeStep,
    release_time: TimeStep,
    absolute_deadline: TimeStep,
    missed: Option<usize>,       // Index of the miss record once the deadline has passed
}

impl Job {
    pub fn new(
        id: ID,
        task_index: usize,
        cost: TimeStep,
        task_period: TimeStep,
        task_deadline: TimeStep,
        release_time: TimeStep,
    ) -> Self {
        Self {
            id,
            task_index,
            task_period,
            task_deadline,
            remaining_time: cost,
            release_time,
            absolute_deadline: release_time.saturating_add(task_deadline),
            missed: None,
        }
    }

    pub fn id(&self) -> ID {
        self.id
    }

    pub fn task_index(&self) -> usize {
        self.task_index
    }

    pub fn task_period(&self) -> TimeStep {
        self.task_period
    }

    pub fn task_deadline(&self) -> TimeStep {
        self.task_deadline
    }

    pub fn remaining_time(&self) -> TimeStep {
        self.remaining_time
    }

    pub fn release_time(&self) -> TimeStep {
        self.release_time
    }

    pub fn absolute_deadline(&self) -> TimeStep {
        self.absolute_deadline
    }

    /// True once the deadline is reached with work left and no miss was recorded yet.
    pub fn deadline_missed(&self, t: TimeStep) -> bool {
        self.remaining_time > 0 && t >= self.absolute_deadline && self.missed.is_none()
    }

    pub fn miss_record(&self) -> Option<usize> {
        self.missed
    }

    pub fn mark_missed(&mut self, record: usize) {
        self.missed = Some(record);
    }

    pub fn is_complete(&self) -> bool {
        self.remaining_time == 0
    }

    /// Instant at which the job would complete if it ran from `now` without preemption.
    /// Saturates at `TimeStep::MAX`.
    pub fn projected_completion(&self, now: TimeStep) -> TimeStep {
        now.saturating_add(self.remaining_time)
    }

    pub fn schedule(&mut self, n_steps: TimeStep) {
        self.remaining_time = self.remaining_time.saturating_sub(n_steps);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_progress() {
        let mut job = Job::new(0, 0, 5, 20, 10, 20);
        assert_eq!(job.absolute_deadline(), 30);
        assert_eq!(job.projected_completion(22), 27);

        job.schedule(3);
        assert_eq!(job.remaining_time(), 2);
        assert!(!job.is_complete());
        assert!(!job.deadline_missed(29));
        assert!(job.deadline_missed(30));

        job.mark_missed(0);
        assert!(!job.deadline_missed(31));
        assert_eq!(job.miss_record(), Some(0));

        job.schedule(2);
        assert!(job.is_complete());
        assert!(!job.deadline_missed(40));
    }

    #[test]
    fn test_job_times_saturate() {
        let job = Job::new(1, 0, u64::MAX, 10, u64::MAX, 10);
        assert_eq!(job.absolute_deadline(), u64::MAX);
        assert!(job.absolute_deadline() >= job.release_time());
        assert_eq!(job.projected_completion(10), u64::MAX);
        assert!(!job.deadline_missed(u64::MAX - 1));
    }
}
