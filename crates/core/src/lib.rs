//! Domain logic for post coverage and occupancy scheduling.
//!
//! This crate has no database or HTTP dependencies. Everything here works on
//! values loaded by the caller, which keeps the rules unit-testable and lets
//! the API and the worker share them.

pub mod booking;
pub mod conflict;
pub mod error;
pub mod headcount;
pub mod movement;
pub mod occupancy;
pub mod post_status;
pub mod reason;
pub mod status;
pub mod types;
pub mod vacancy;
pub mod work_day;
