//! tohls-core: shared error type and configuration.
//!
//! This crate is the foundational dependency for the other tohls crates,
//! providing the unified [`Error`] type and the JSON-backed [`config::Config`].

pub mod config;
pub mod error;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
