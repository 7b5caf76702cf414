//! TCP accept loop and shutdown handling.

pub mod listener;

pub use listener::{Server, ServerError};
