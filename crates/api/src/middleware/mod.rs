//! Request extractors.
//!
//! - [`auth::AuthUser`] -- The acting user, from a JWT Bearer token.

pub mod auth;
