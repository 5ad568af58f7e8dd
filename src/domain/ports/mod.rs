//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines the interfaces that infrastructure adapters must implement:
//! - MajorApi: typed calls to the major-choice backend
//! - CredentialStore: persistence of the access token and user info
//!
//! These traits keep the tournament services independent of HTTP and of the
//! filesystem.

pub mod credential_store;
pub mod major_api;

pub use credential_store::{CredentialStore, StoredCredentials};
pub use major_api::{DecidedPair, MajorApi};
