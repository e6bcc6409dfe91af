use serde::Serialize;

use super::{job::Job, TimeStep, ID};
use crate::SchedulingError;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Task {
    id: String,
    cost: TimeStep,     // C_i : Worst-case execution time.
    deadline: TimeStep, // D_i : Relative deadline.
    period: TimeStep,   // T_i : Period.
}

impl Task {
    /// Builds a task, rejecting an empty id or any zero time value.
    pub fn new(
        id: impl Into<String>,
        cost: TimeStep,
        deadline: TimeStep,
        period: TimeStep,
    ) -> Result<Self, SchedulingError> {
        let id = id.into().trim().to_string();

        if id.is_empty() {
            return Err(SchedulingError::invalid_task(id, "id must not be empty"));
        }
        for (name, value) in [("cost", cost), ("deadline", deadline), ("period", period)] {
            if value == 0 {
                return Err(SchedulingError::invalid_task(
                    id,
                    format!("{} must be positive", name),
                ));
            }
        }

        Ok(Self {
            id,
            cost,
            deadline,
            period,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn cost(&self) -> TimeStep {
        self.cost
    }

    pub fn deadline(&self) -> TimeStep {
        self.deadline
    }

    pub fn period(&self) -> TimeStep {
        self.period
    }

    pub fn utilisation(&self) -> f64 {
        self.cost as f64 / self.period as f64
    }

    pub fn is_implicit(&self) -> bool {
        self.deadline == self.period
    }

    pub fn is_constrained(&self) -> bool {
        self.deadline <= self.period
    }

    /// A job needing more time than its deadline allows can never finish in time.
    pub fn always_misses(&self) -> bool {
        self.cost > self.deadline
    }

    /// Releases the `k`-th job (0-based) of the task, `index` being the
    /// task's position in its task set.
    pub fn spawn_job(&self, index: usize, k: ID) -> Job {
        let release = k.saturating_mul(self.period);
        Job::new(k, index, self.cost, self.period, self.deadline, release)
    }
}
