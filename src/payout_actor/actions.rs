use chrono::{DateTime, Utc};

use crate::error::PayoutError;

/// Admin decision on a pending payout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayoutDecision {
    Approve,
    Reject,
}

impl PayoutDecision {
    /// Accepts exactly `"approve"` or `"reject"`.
    pub fn parse(action: &str) -> Result<Self, PayoutError> {
        match action {
            "approve" => Ok(Self::Approve),
            "reject" => Ok(Self::Reject),
            other => Err(PayoutError::InvalidAction(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub enum PayoutAction {
    Decide {
        decision: PayoutDecision,
        at: DateTime<Utc>,
    },
}
