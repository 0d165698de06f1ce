use chrono::{DateTime, Utc};

use crate::error::VendorError;

/// Admin moderation outcome for a vendor application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    Approve,
    Reject,
}

impl ReviewDecision {
    pub fn parse(action: &str) -> Result<Self, VendorError> {
        match action {
            "approve" => Ok(Self::Approve),
            "reject" => Ok(Self::Reject),
            other => Err(VendorError::InvalidAction(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub enum VendorAction {
    /// Moves a PENDING vendor to APPROVED or REJECTED.
    Review {
        decision: ReviewDecision,
        at: DateTime<Utc>,
    },
}
