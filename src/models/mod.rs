mod notify;

pub use notify::{NotifyPayload, NotifyRequest};
