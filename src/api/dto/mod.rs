//! Data Transfer Objects for API responses.

mod notify;

pub use notify::{NotifyResponse, RelayResult};
