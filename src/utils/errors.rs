use std::error::Error;
use std::fmt;

use crate::TimeStep;

#[derive(Debug, Clone, PartialEq)]
pub enum SchedulingError {
    /// A task field is out of range, or its id is empty or duplicated.
    InvalidTask { task: String, reason: String },
    /// The hyperperiod exceeds the configured horizon cap.
    Overflow { cap: TimeStep },
    /// Empty task set, unknown policy or another unusable run request.
    Configuration(String),
}

impl SchedulingError {
    pub fn invalid_task(task: impl Into<String>, reason: impl Into<String>) -> Self {
        SchedulingError::InvalidTask {
            task: task.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SchedulingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulingError::InvalidTask { task, reason } => {
                write!(f, "invalid task '{}': {}", task, reason)
            }
            SchedulingError::Overflow { cap } => {
                write!(f, "hyperperiod exceeds the horizon cap of {} ticks", cap)
            }
            SchedulingError::Configuration(msg) => write!(f, "configuration error: {}", msg),
        }
    }
}

impl Error for SchedulingError {}
