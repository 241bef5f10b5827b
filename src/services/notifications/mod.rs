//! Push delivery with pluggable providers.
//!
//! The relay core talks to `PushProvider`; `PushoverProvider` is the
//! production implementation.

mod provider;
mod pushover_provider;

pub use provider::{PushMessage, PushProvider, PushResult};
pub use pushover_provider::PushoverProvider;
