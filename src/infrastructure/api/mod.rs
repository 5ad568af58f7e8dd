pub mod client;
pub mod errors;

pub use client::HttpMajorApi;
pub use errors::{classify_status, Endpoint};
