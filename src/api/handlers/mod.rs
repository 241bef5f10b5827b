//! HTTP request handlers.

pub mod notify;

pub use notify::notify;
