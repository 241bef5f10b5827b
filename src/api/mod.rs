//! HTTP surface of the relay.
//!
//! There is one handler. It is installed as the router fallback so every
//! method on every path reaches it and receives the same response shape.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
