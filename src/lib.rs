//! Load testing client for the GlucoCare HTTP API.
//!
//! Authenticates once, then drives virtual users that repeatedly fetch an
//! authenticated resource, refreshing the access token once on 401/403.

pub mod api;
pub mod cli;
pub mod config;
pub mod metrics;
pub mod scenarios;
pub mod vu;
