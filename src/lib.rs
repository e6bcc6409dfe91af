//! Uniprocessor periodic task scheduling simulator.
//!
//! Simulates EDF, RM and DM over the hyperperiod of a task set and reports
//! the execution timeline, period boundary markers and deadline misses.

pub mod config;
pub mod runner;
pub mod models;
pub mod report;
pub mod utils;

pub use models::{scheduler, Job, Task, TaskSet, TimeStep, ID};
pub use utils::{constants, errors, hyperperiod, multiple_lcm, Feasibility, Policy, SchedulingError};
