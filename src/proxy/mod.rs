//! Upstream fetching for relayed routes
//!
//! This module connects to an upstream HTTP server and streams its response
//! body back to the caller piece by piece.

pub mod upstream;

pub use upstream::{Upstream, UpstreamResponse};
