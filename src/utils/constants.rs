use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::{SchedulingError, TimeStep, ID};

/// Default simulation horizon cap, in ticks.
pub const DEFAULT_HORIZON_CAP: TimeStep = 10_000_000;

/// Tolerance used when comparing utilisations against a bound.
pub const UTILISATION_EPSILON: f64 = 1e-9;

/// State of the simulated processor. `job` is the sequence number of the running job.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoreState {
    Idle,
    Running { task: usize, job: ID },
    Terminated,
}

/// Outcome of the schedulability pre-check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Feasibility {
    Feasible,
    PossiblyInfeasible,
    Infeasible,
}

/// Uniprocessor scheduling policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Policy {
    #[serde(rename = "EDF")]
    Edf,
    #[serde(rename = "RM")]
    Rm,
    #[serde(rename = "DM")]
    Dm,
}

impl Policy {
    pub const ALL: [Policy; 3] = [Policy::Edf, Policy::Rm, Policy::Dm];

    /// Fixed-priority policies assign one key per task for the whole run.
    pub fn is_static(&self) -> bool {
        !matches!(self, Policy::Edf)
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Policy::Edf => "EDF",
            Policy::Rm => "RM",
            Policy::Dm => "DM",
        };
        f.write_str(name)
    }
}

impl FromStr for Policy {
    type Err = SchedulingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "edf" => Ok(Policy::Edf),
            "rm" => Ok(Policy::Rm),
            "dm" => Ok(Policy::Dm),
            other => Err(SchedulingError::Configuration(format!(
                "unknown policy '{}', expected edf, rm or dm",
                other
            ))),
        }
    }
}

/// What happens to a job that reaches its absolute deadline unfinished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissPolicy {
    /// The job is dropped from the ready queue at its deadline.
    #[default]
    Abort,
    /// The job keeps competing for the processor until it completes.
    Continue,
}
