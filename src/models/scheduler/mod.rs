pub mod core;
pub mod scheduler;
pub mod edf_scheduler;
pub mod rm_scheduler;
pub mod dm_scheduler;
pub mod feasibility;

pub use self::core::{Core, DeadlineMiss, Interval, Simulation};
pub use scheduler::{scheduler_for, Scheduler};
pub use edf_scheduler::EarliestDeadlineFirst;
pub use rm_scheduler::RateMonotonic;
pub use dm_scheduler::DeadlineMonotonic;
pub use feasibility::{check, liu_layland_bound, response_time_analysis, ResponseTime};
