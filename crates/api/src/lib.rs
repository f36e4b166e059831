//! jobd API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes, the
//! demo job) so integration tests and the binary entrypoint can both access
//! them.

pub mod config;
pub mod error;
pub mod jobs;
pub mod routes;
pub mod state;
