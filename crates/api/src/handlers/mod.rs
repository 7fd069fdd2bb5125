//! Request handlers.
//!
//! Each submodule groups the handlers for one resource. Handlers extract the
//! actor and inputs, delegate to [`crate::engine`] or a repository, and wrap
//! results in [`crate::response::DataResponse`].

pub mod bookings;
pub mod collaborators;
pub mod coverage;
pub mod movements;
pub mod posts;
pub mod work_days;
