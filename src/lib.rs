//! Pennant - incremental HTTP/1.1 framing
//!
//! Core library for request parsing, response writing and the accept loop.

pub mod config;
pub mod http;
pub mod proxy;
pub mod routes;
pub mod server;
