//! Credentials management infrastructure
//!
//! Persists the access token and user info between CLI invocations:
//! - JSON file store (default `.majorbracket/credentials.json`)
//! - In-memory store for tests
//! - `AuthContext`, the single owner of the logged-in state

pub mod context;
pub mod store;

pub use context::AuthContext;
pub use store::{FileCredentialStore, InMemoryCredentialStore};
