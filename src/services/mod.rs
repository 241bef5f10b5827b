//! Service layer: the relay core and the push providers it forwards to.

pub mod notifications;
pub mod relay;

pub use notifications::{PushProvider, PushoverProvider};
pub use relay::{Delivery, RelayOutcome, RelayService, Rejection, RequestValidator};
