//! Coverage API server library.
//!
//! Exposes config, state, error handling, the occupancy engine and the
//! routes so integration tests and the binary entrypoint can both use them.

pub mod auth;
pub mod config;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
