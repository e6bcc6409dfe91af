//! Schedulability tests run before a simulation.
//!
//! The closed-form tests only apply to implicit-deadline task sets:
//!
//! - EDF: `U <= 1` is necessary and sufficient.
//! - RM/DM: `U <= n(2^(1/n) - 1)` (Liu & Layland) is sufficient only, so a
//!   set above the bound is reported as possibly infeasible and left to the
//!   simulator.
//!
//! Response-time analysis gives the exact worst-case response time of every
//! task under a fixed-priority policy when all deadlines are constrained.

use serde::Serialize;

use crate::constants::{Feasibility, Policy, UTILISATION_EPSILON};
use crate::{Task, TaskSet, TimeStep};

/// Liu & Layland utilisation bound for `n` tasks, `0.0` for an empty set.
pub fn liu_layland_bound(n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let nf = n as f64;
    nf * (2.0_f64.powf(1.0 / nf) - 1.0)
}

/// Early diagnostic on the task set. Never replaces the simulation.
pub fn check(task_set: &TaskSet, policy: Policy) -> Feasibility {
    if !task_set.is_implicit() {
        return Feasibility::PossiblyInfeasible;
    }

    let u = task_set.utilisation();
    match policy {
        Policy::Edf => {
            if u <= 1.0 + UTILISATION_EPSILON {
                Feasibility::Feasible
            } else {
                Feasibility::Infeasible
            }
        }
        Policy::Rm | Policy::Dm => {
            if u <= liu_layland_bound(task_set.len()) + UTILISATION_EPSILON {
                Feasibility::Feasible
            } else {
                Feasibility::PossiblyInfeasible
            }
        }
    }
}

/// Worst-case response time of one task; `None` when it exceeds the deadline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseTime {
    pub task_id: String,
    pub response_time: Option<TimeStep>,
}

/// Response-time analysis for RM and DM, in task-set order.
///
/// Returns `None` for EDF or when some task has a deadline beyond its period.
pub fn response_time_analysis(task_set: &TaskSet, policy: Policy) -> Option<Vec<ResponseTime>> {
    let key: fn(&Task) -> TimeStep = match policy {
        Policy::Rm => Task::period,
        Policy::Dm => Task::deadline,
        Policy::Edf => return None,
    };
    if !task_set.is_constrained() {
        return None;
    }

    let mut by_priority: Vec<&Task> = task_set.iter().collect();
    by_priority.sort_by(|a, b| key(a).cmp(&key(b)).then_with(|| a.id().cmp(b.id())));

    let results = task_set
        .iter()
        .map(|task| {
            let rank = by_priority
                .iter()
                .position(|t| t.id() == task.id())
                .unwrap_or(0);
            ResponseTime {
                task_id: task.id().to_string(),
                response_time: response_time(task, &by_priority[..rank]),
            }
        })
        .collect();

    Some(results)
}

/// Fixed-point iteration `R = C + sum(ceil(R / T_j) * C_j)` over higher-priority tasks.
///
/// A demand overflowing `TimeStep` is past any deadline and yields `None`.
fn response_time(task: &Task, higher_priority: &[&Task]) -> Option<TimeStep> {
    let mut w_k = task.cost();

    loop {
        if w_k > task.deadline() {
            return None;
        }

        let w_k_next = higher_priority.iter().try_fold(task.cost(), |acc, hp| {
            w_k.div_ceil(hp.period())
                .checked_mul(hp.cost())
                .and_then(|demand| acc.checked_add(demand))
        })?;

        if w_k_next == w_k {
            return Some(w_k);
        }
        w_k = w_k_next;
    }
}
