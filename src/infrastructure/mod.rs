//! Infrastructure layer module
//!
//! This module contains all infrastructure adapters and external integrations:
//! - HTTP client for the major-choice backend
//! - Configuration management
//! - Logging infrastructure
//! - Credentials persistence
//!
//! Infrastructure implementations satisfy the port traits defined in the domain layer.

pub mod api;
pub mod config;
pub mod credentials;
pub mod logging;
