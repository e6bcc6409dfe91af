use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::SimulationConfig;
use crate::constants::{CoreState, MissPolicy, Policy};
use crate::scheduler::{scheduler_for, Scheduler};
use crate::{hyperperiod, Job, SchedulingError, TaskSet, TimeStep, ID};

/// A stretch of time during which one task (or nothing) runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    /// `None` when the processor is idle.
    pub task_id: Option<String>,
    pub start: TimeStep,
    pub end: TimeStep,
}

impl Interval {
    pub fn is_idle(&self) -> bool {
        self.task_id.is_none()
    }

    pub fn duration(&self) -> TimeStep {
        self.end - self.start
    }
}

/// A job that reached its absolute deadline with work left.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeadlineMiss {
    pub task_id: String,
    pub release_time: TimeStep,
    pub absolute_deadline: TimeStep,
    /// Only set when missed jobs keep running and finish within the run.
    pub completion_time: Option<TimeStep>,
}

/// Raw result of one simulation run over the hyperperiod.
#[derive(Debug, Clone, PartialEq)]
pub struct Simulation {
    pub policy: Policy,
    pub hyperperiod: TimeStep,
    pub intervals: Vec<Interval>,
    pub misses: Vec<DeadlineMiss>,
    pub preemptions: usize,
    /// Largest observed response time per task, in task-set order.
    pub worst_response: Vec<Option<TimeStep>>,
}

/// A single processor core running the event-driven simulation.
///
/// The core owns a snapshot of the task set taken at construction; time jumps
/// from one event to the next (release, completion, deadline) instead of
/// advancing tick by tick.
pub struct Core {
    task_set: TaskSet,
    scheduler: Box<dyn Scheduler>,
    config: SimulationConfig,
    state: CoreState,
    queue: Vec<Job>,
    current_time: TimeStep,
}

impl Core {
    /// Creates a new `Core` for one simulation run.
    ///
    /// # Arguments
    /// * `task_set` - The task set to simulate; the core keeps its own copy.
    /// * `policy` - The scheduling policy deciding which job runs.
    /// * `config` - Horizon cap and missed-job handling for the run.
    ///
    /// # Returns
    /// An idle `Core` at time 0 with an empty ready queue.
    pub fn new(task_set: &TaskSet, policy: Policy, config: SimulationConfig) -> Self {
        Self {
            task_set: task_set.clone(),
            scheduler: scheduler_for(policy),
            config,
            state: CoreState::Idle,
            queue: Vec::new(),
            current_time: 0,
        }
    }

    /// Returns the processor state: idle, running a job, or terminated once
    /// `simulate` reached the hyperperiod.
    pub fn state(&self) -> CoreState {
        self.state
    }

    /// Returns the instant of the last processed event.
    pub fn current_time(&self) -> TimeStep {
        self.current_time
    }

    fn task_id(&self, state: CoreState) -> Option<String> {
        match state {
            CoreState::Running { task, .. } => {
                self.task_set.get_task(task).map(|t| t.id().to_string())
            }
            _ => None,
        }
    }

    fn position(&self, task: usize, job: ID) -> Option<usize> {
        self.queue
            .iter()
            .position(|j| j.task_index() == task && j.id() == job)
    }

    /// Runs the task set from 0 to its hyperperiod.
    ///
    /// Deadline misses are recorded and the run continues. Times past
    /// `TimeStep::MAX` saturate, so a deadline or completion that far out is
    /// never reached.
    ///
    /// # Returns
    /// The `Simulation` with the intervals covering `[0, hyperperiod)` and every
    /// deadline miss, or `SchedulingError::Configuration` for an empty task set
    /// and `SchedulingError::Overflow` for a hyperperiod above the horizon cap.
    pub fn simulate(&mut self) -> Result<Simulation, SchedulingError> {
        if self.task_set.is_empty() {
            return Err(SchedulingError::Configuration("empty task set".to_string()));
        }
        let hyperperiod = hyperperiod(&self.task_set, self.config.horizon_cap)?;
        let policy = self.scheduler.policy();

        for task in self.task_set.always_missing() {
            warn!(task = task.id(), cost = task.cost(), deadline = task.deadline(),
                "cost exceeds deadline, every job will miss");
        }
        debug!(%policy, hyperperiod, tasks = self.task_set.len(), "starting simulation");

        let n = self.task_set.len();
        let mut next_release: Vec<TimeStep> = vec![0; n];
        let mut released: Vec<ID> = vec![0; n];
        let mut worst_response: Vec<Option<TimeStep>> = vec![None; n];
        let mut intervals: Vec<Interval> = Vec::new();
        let mut misses: Vec<DeadlineMiss> = Vec::new();
        let mut preemptions = 0;

        self.queue.clear();
        self.state = CoreState::Idle;
        self.current_time = 0;
        let mut last_event: TimeStep = 0;
        let mut interval_start: TimeStep = 0;

        loop {
            let now = self.current_time;

            // Credit the running job with the time elapsed since the last event
            if let CoreState::Running { task, job } = self.state {
                if let Some(index) = self.position(task, job) {
                    self.queue[index].schedule(now - last_event);
                }
            }
            last_event = now;

            // Releases come first so that a new urgent job preempts at once
            if now < hyperperiod {
                for (index, task) in self.task_set.iter().enumerate() {
                    while next_release[index] <= now {
                        self.queue.push(task.spawn_job(index, released[index]));
                        released[index] += 1;
                        next_release[index] = next_release[index].saturating_add(task.period());
                    }
                }
            }

            // Completions
            self.queue.retain(|job| {
                if !job.is_complete() {
                    return true;
                }
                let response = now - job.release_time();
                let worst = &mut worst_response[job.task_index()];
                *worst = Some(worst.map_or(response, |w| w.max(response)));
                if let Some(record) = job.miss_record() {
                    misses[record].completion_time = Some(now);
                }
                false
            });

            // Deadlines
            for job in self.queue.iter_mut() {
                if !job.deadline_missed(now) {
                    continue;
                }
                let task_id = self
                    .task_set
                    .get_task(job.task_index())
                    .map(|t| t.id().to_string())
                    .unwrap_or_default();
                debug!(task = %task_id, release = job.release_time(),
                    deadline = job.absolute_deadline(), "deadline missed");

                misses.push(DeadlineMiss {
                    task_id,
                    release_time: job.release_time(),
                    absolute_deadline: job.absolute_deadline(),
                    completion_time: None,
                });
                job.mark_missed(misses.len() - 1);
            }
            if self.config.miss_policy == MissPolicy::Abort {
                self.queue.retain(|job| job.miss_record().is_none());
            }

            if now >= hyperperiod {
                break;
            }

            // Dispatch
            let next_state = match self.scheduler.schedule(&self.queue, &self.task_set, now) {
                Some(index) => CoreState::Running {
                    task: self.queue[index].task_index(),
                    job: self.queue[index].id(),
                },
                None => CoreState::Idle,
            };

            if next_state != self.state {
                if let CoreState::Running { task, job } = self.state {
                    if self.position(task, job).is_some() {
                        preemptions += 1;
                    }
                }
                if now > interval_start {
                    intervals.push(Interval {
                        task_id: self.task_id(self.state),
                        start: interval_start,
                        end: now,
                    });
                }
                interval_start = now;
                self.state = next_state;
            }

            // Next event
            let mut next = hyperperiod;
            if let Some(&release) = next_release.iter().min() {
                next = next.min(release);
            }
            if let CoreState::Running { task, job } = self.state {
                if let Some(index) = self.position(task, job) {
                    next = next.min(self.queue[index].projected_completion(now));
                }
            }
            for job in self.queue.iter().filter(|j| j.miss_record().is_none()) {
                next = next.min(job.absolute_deadline());
            }

            self.current_time = next;
        }

        if hyperperiod > interval_start {
            intervals.push(Interval {
                task_id: self.task_id(self.state),
                start: interval_start,
                end: hyperperiod,
            });
        }
        self.state = CoreState::Terminated;

        info!(%policy, hyperperiod, jobs = released.iter().sum::<ID>(),
            misses = misses.len(), preemptions, "simulation finished");

        Ok(Simulation {
            policy,
            hyperperiod,
            intervals,
            misses,
            preemptions,
            worst_response,
        })
    }
}
