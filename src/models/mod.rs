mod job;
pub mod task;
pub mod taskset;
pub mod scheduler;

pub use job::Job;
pub use task::Task;
pub use taskset::TaskSet;

/// Simulated time, in integral ticks.
pub type TimeStep = u64;

/// Sequence number of a job within its task.
pub type ID = u64;
