use std::thread;

use tracing::{info, warn};

use crate::config::SimulationConfig;
use crate::constants::{Feasibility, Policy};
use crate::report::{build_report, Report};
use crate::scheduler::{check, response_time_analysis, Core};
use crate::{SchedulingError, TaskSet};

/// One "Run" request: a frozen task set, a policy and the run configuration.
#[derive(Debug, Clone)]
pub struct RunRequest {
    task_set: TaskSet,
    policy: Policy,
    config: SimulationConfig,
}

impl RunRequest {
    /// Takes a snapshot of `task_set`; later changes to the caller's copy do not affect the run.
    pub fn new(task_set: &TaskSet, policy: Policy) -> Self {
        Self {
            task_set: task_set.clone(),
            policy,
            config: SimulationConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SimulationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    pub fn task_set(&self) -> &TaskSet {
        &self.task_set
    }
}

/// Pre-checks, simulates and reports one request.
pub fn run(request: &RunRequest) -> Result<Report, SchedulingError> {
    let task_set = &request.task_set;
    if task_set.is_empty() {
        return Err(SchedulingError::Configuration("empty task set".to_string()));
    }

    let feasibility = check(task_set, request.policy);
    match feasibility {
        Feasibility::Feasible => info!(policy = %request.policy, utilisation = task_set.utilisation(),
            "task set passes the utilisation test"),
        Feasibility::PossiblyInfeasible => info!(policy = %request.policy,
            "utilisation test inconclusive, relying on simulation"),
        Feasibility::Infeasible => warn!(policy = %request.policy, utilisation = task_set.utilisation(),
            "task set is not schedulable"),
    }

    let simulation = Core::new(task_set, request.policy, request.config.clone()).simulate()?;
    let response_times = response_time_analysis(task_set, request.policy);

    Ok(build_report(task_set, &simulation, feasibility, response_times))
}

/// Runs EDF, RM and DM on the same snapshot in parallel, results in that order.
pub fn run_all(
    task_set: &TaskSet,
    config: &SimulationConfig,
) -> Vec<(Policy, Result<Report, SchedulingError>)> {
    let snapshot = task_set.clone();

    thread::scope(|scope| {
        let handles: Vec<_> = Policy::ALL
            .iter()
            .map(|&policy| {
                let request = RunRequest::new(&snapshot, policy).with_config(config.clone());
                (policy, scope.spawn(move || run(&request)))
            })
            .collect();

        handles
            .into_iter()
            .map(|(policy, handle)| {
                let result = handle.join().unwrap_or_else(|_| {
                    Err(SchedulingError::Configuration(format!(
                        "{} simulation thread panicked",
                        policy
                    )))
                });
                (policy, result)
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Task, TimeStep};

    fn set(tasks: &[(&str, TimeStep, TimeStep, TimeStep)]) -> TaskSet {
        TaskSet::new(
            tasks
                .iter()
                .map(|&(id, c, d, p)| Task::new(id, c, d, p).unwrap())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_run_single_policy() {
        let task_set = set(&[("A", 10, 20, 20)]);
        let report = run(&RunRequest::new(&task_set, Policy::Edf)).unwrap();

        assert_eq!(report.feasibility, Feasibility::Feasible);
        assert_eq!(report.hyperperiod, 20);
        assert_eq!(report.segments.len(), 1);
        assert_eq!(report.segments[0].duration, 10);
        assert!(report.misses.is_empty());
        assert!(report.response_times.is_none());
    }

    #[test]
    fn test_run_is_idempotent() {
        let task_set = set(&[("A", 3, 5, 7), ("B", 4, 9, 11), ("C", 2, 2, 13)]);
        let request = RunRequest::new(&task_set, Policy::Dm);
        let first = serde_json::to_string(&run(&request).unwrap()).unwrap();
        let second = serde_json::to_string(&run(&request).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_request_is_a_snapshot() {
        let mut task_set = set(&[("A", 10, 20, 20)]);
        let request = RunRequest::new(&task_set, Policy::Rm);
        task_set = set(&[("A", 10, 20, 20), ("B", 5, 30, 30)]);

        assert_eq!(request.task_set().len(), 1);
        assert_eq!(run(&request).unwrap().hyperperiod, 20);
        assert_eq!(task_set.len(), 2);
    }

    #[test]
    fn test_run_errors() {
        let empty = RunRequest::new(&TaskSet::new_empty(), Policy::Edf);
        assert!(matches!(run(&empty), Err(SchedulingError::Configuration(_))));

        let task_set = set(&[("A", 1, 4001, 4001), ("B", 1, 4003, 4003)]);
        let request = RunRequest::new(&task_set, Policy::Rm);
        assert!(matches!(run(&request), Err(SchedulingError::Overflow { .. })));

        let raised = request.with_config(SimulationConfig::default().with_horizon_cap(20_000_000));
        assert!(run(&raised).is_ok());
    }

    #[test]
    fn test_run_all_compares_policies() {
        let task_set = set(&[("A", 2, 4, 4), ("B", 3, 6, 6)]);
        let results = run_all(&task_set, &SimulationConfig::default());

        let policies: Vec<Policy> = results.iter().map(|(p, _)| *p).collect();
        assert_eq!(policies, Policy::ALL.to_vec());

        let edf = results[0].1.as_ref().unwrap();
        let rm = results[1].1.as_ref().unwrap();
        assert!(edf.is_schedulable());
        assert!(!rm.is_schedulable());
        assert_eq!(rm.feasibility, Feasibility::PossiblyInfeasible);
        assert_eq!(
            rm.response_times.as_ref().map(|r| r[1].response_time),
            Some(None)
        );
    }
}
