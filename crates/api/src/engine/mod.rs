//! Coverage engine.
//!
//! Every write loads and row-locks what it checks, runs the pure planner
//! from `coverage_core`, and persists the plan in the same transaction.
//! Handlers stay thin and call into here.

pub mod occupancy;
pub mod vacancy;
