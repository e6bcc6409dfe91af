use std::cmp::Ordering;

use crate::constants::Policy;
use crate::{Job, TaskSet, TimeStep};

use super::{DeadlineMonotonic, EarliestDeadlineFirst, RateMonotonic};

/// Assigns priorities to ready jobs. The job with the smallest key runs.
pub trait Scheduler: Send + Sync {
    fn policy(&self) -> Policy;

    /// Priority key of `job` at instant `now`; smaller is more urgent.
    fn priority_of(&self, job: &Job, now: TimeStep) -> TimeStep;

    /// Total order over jobs: priority key, then lowest task id, then earliest release.
    fn compare(&self, a: &Job, b: &Job, task_set: &TaskSet, now: TimeStep) -> Ordering {
        let task_id = |job: &Job| task_set.get_task(job.task_index()).map(|t| t.id());

        self.priority_of(a, now)
            .cmp(&self.priority_of(b, now))
            .then_with(|| task_id(a).cmp(&task_id(b)))
            .then_with(|| a.release_time().cmp(&b.release_time()))
    }

    /// Index in `queue` of the job to run, or `None` if the queue is empty.
    fn schedule(&self, queue: &[Job], task_set: &TaskSet, now: TimeStep) -> Option<usize> {
        queue
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| self.compare(a, b, task_set, now))
            .map(|(index, _)| index)
    }
}

/// Returns the priority assigner implementing `policy`.
pub fn scheduler_for(policy: Policy) -> Box<dyn Scheduler> {
    match policy {
        Policy::Edf => Box::new(EarliestDeadlineFirst),
        Policy::Rm => Box::new(RateMonotonic),
        Policy::Dm => Box::new(DeadlineMonotonic),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Task;

    fn task_set() -> TaskSet {
        TaskSet::new(vec![
            Task::new("B", 2, 10, 10).unwrap(),
            Task::new("A", 2, 10, 10).unwrap(),
            Task::new("C", 1, 5, 20).unwrap(),
        ])
        .unwrap()
    }

    fn queue(set: &TaskSet) -> Vec<Job> {
        set.iter()
            .enumerate()
            .map(|(index, task)| task.spawn_job(index, 0))
            .collect()
    }

    #[test]
    fn test_empty_queue() {
        let set = task_set();
        for policy in Policy::ALL {
            assert_eq!(scheduler_for(policy).schedule(&[], &set, 0), None);
        }
    }

    #[test]
    fn test_ties_resolve_to_lowest_id() {
        let set = task_set();
        let queue = queue(&set);

        // A and B share period 10; A wins whatever its position in the queue.
        let elected = scheduler_for(Policy::Rm).schedule(&queue, &set, 0);
        assert_eq!(elected, Some(1));

        let reversed: Vec<Job> = queue.iter().rev().cloned().collect();
        let elected = scheduler_for(Policy::Rm).schedule(&reversed, &set, 0);
        assert_eq!(reversed[elected.unwrap()].task_index(), 1);
    }

    #[test]
    fn test_policies_disagree_on_constrained_task() {
        let set = task_set();
        let queue = queue(&set);

        // C has the longest period but the shortest deadline.
        assert_eq!(scheduler_for(Policy::Rm).schedule(&queue, &set, 0), Some(1));
        assert_eq!(scheduler_for(Policy::Dm).schedule(&queue, &set, 0), Some(2));
        assert_eq!(scheduler_for(Policy::Edf).schedule(&queue, &set, 0), Some(2));
    }

    #[test]
    fn test_scheduler_for_policy() {
        for policy in Policy::ALL {
            assert_eq!(scheduler_for(policy).policy(), policy);
        }
    }
}
