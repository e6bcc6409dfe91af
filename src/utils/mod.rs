pub mod constants;
pub mod errors;
pub mod lcm;

pub use constants::{CoreState, Feasibility, MissPolicy, Policy};
pub use errors::SchedulingError;
pub use lcm::{hyperperiod, multiple_lcm};
