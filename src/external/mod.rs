//! Outbound HTTP plumbing shared by push providers.

pub mod client;

pub use client::build_http_client;
