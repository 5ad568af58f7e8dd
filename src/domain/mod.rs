//! Domain layer for the majorbracket client
//!
//! This module contains the wire-level models, the error taxonomy and the
//! port traits the services depend on.

pub mod errors;
pub mod models;
pub mod ports;

// Re-export error types for convenient access
pub use errors::{ClientError, ClientResult};
