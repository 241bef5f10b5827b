//! Notify response DTO and the outcome-to-response mapping.

use serde::{Deserialize, Serialize};

use crate::services::relay::{Delivery, RelayOutcome};

/// Coarse result reported to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelayResult {
    Success,
    Fail,
}

/// Body of every relay response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifyResponse {
    /// Always `true`; callers cannot tell a rejection from a delivery
    pub success: bool,
    pub result: RelayResult,
}

impl NotifyResponse {
    /// Map an outcome onto the uniform response.
    ///
    /// Every rejection looks like a successful delivery. Only an
    /// authenticated request whose delivery failed reports `fail`.
    pub fn for_outcome(outcome: &RelayOutcome) -> Self {
        let result = match outcome {
            RelayOutcome::Forwarded(Delivery::Failed) => RelayResult::Fail,
            RelayOutcome::Forwarded(Delivery::Delivered) | RelayOutcome::Rejected(_) => {
                RelayResult::Success
            }
        };

        Self {
            success: true,
            result,
        }
    }
}
