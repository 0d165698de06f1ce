use chrono::Utc;
use rust_decimal::Decimal;

use super::actions::{PayoutAction, PayoutDecision};
use crate::actor_framework::Entity;
use crate::domain::{Payout, PayoutCreate, PayoutStatus};
use crate::error::PayoutError;

impl Entity for Payout {
    type Id = String;
    type CreatePayload = PayoutCreate;
    type Patch = ();
    type Action = PayoutAction;
    type ActionResult = Payout;
    type Error = PayoutError;

    fn id(&self) -> &String {
        &self.id
    }

    fn from_create(id: String, payload: PayoutCreate) -> Result<Self, PayoutError> {
        if payload.amount <= Decimal::ZERO {
            return Err(PayoutError::InvalidAmount(format!(
                "amount must be positive, got {}",
                payload.amount
            )));
        }
        Ok(Self {
            id,
            vendor_id: payload.vendor_id,
            amount: payload.amount,
            status: PayoutStatus::Pending,
            requested_at: Utc::now(),
            processed_at: None,
            completed_at: None,
        })
    }

    /// Payouts only change through [`PayoutAction`].
    fn on_update(&mut self, _patch: ()) -> Result<(), PayoutError> {
        Ok(())
    }

    /// `PENDING --approve--> COMPLETED`, `PENDING --reject--> REJECTED`.
    fn handle_action(&mut self, action: PayoutAction) -> Result<Payout, PayoutError> {
        match action {
            PayoutAction::Decide { decision, at } => {
                if self.status != PayoutStatus::Pending {
                    return Err(PayoutError::AlreadyProcessed(self.status));
                }
                match decision {
                    PayoutDecision::Approve => {
                        self.status = PayoutStatus::Completed;
                        self.processed_at = Some(at);
                        self.completed_at = Some(at);
                    }
                    PayoutDecision::Reject => {
                        self.status = PayoutStatus::Rejected;
                        self.processed_at = Some(at);
                    }
                }
                Ok(self.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn pending() -> Payout {
        Payout::from_create(
            "payout_1".into(),
            PayoutCreate {
                vendor_id: "vendor_1".into(),
                amount: dec!(250),
            },
        )
        .unwrap()
    }

    #[test]
    fn test_approve_stamps_both_timestamps() {
        let mut payout = pending();
        let at = Utc::now();
        let done = payout
            .handle_action(PayoutAction::Decide {
                decision: PayoutDecision::Approve,
                at,
            })
            .unwrap();
        assert_eq!(done.status, PayoutStatus::Completed);
        assert_eq!(done.processed_at, Some(at));
        assert_eq!(done.completed_at, Some(at));
    }

    #[test]
    fn test_reject_leaves_completed_at_empty() {
        let mut payout = pending();
        let done = payout
            .handle_action(PayoutAction::Decide {
                decision: PayoutDecision::Reject,
                at: Utc::now(),
            })
            .unwrap();
        assert_eq!(done.status, PayoutStatus::Rejected);
        assert!(done.processed_at.is_some());
        assert!(done.completed_at.is_none());
    }

    #[test]
    fn test_terminal_states_refuse_further_decisions() {
        for first in [PayoutDecision::Approve, PayoutDecision::Reject] {
            let mut payout = pending();
            payout
                .handle_action(PayoutAction::Decide {
                    decision: first,
                    at: Utc::now(),
                })
                .unwrap();
            let snapshot = payout.clone();

            for second in [PayoutDecision::Approve, PayoutDecision::Reject] {
                let result = payout.handle_action(PayoutAction::Decide {
                    decision: second,
                    at: Utc::now(),
                });
                assert!(matches!(result, Err(PayoutError::AlreadyProcessed(_))));
                assert_eq!(payout, snapshot);
            }
        }
    }

    #[test]
    fn test_decision_parsing() {
        assert_eq!(PayoutDecision::parse("approve"), Ok(PayoutDecision::Approve));
        assert_eq!(PayoutDecision::parse("reject"), Ok(PayoutDecision::Reject));
        assert_eq!(
            PayoutDecision::parse("cancel"),
            Err(PayoutError::InvalidAction("cancel".into()))
        );
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        let result = Payout::from_create(
            "payout_2".into(),
            PayoutCreate {
                vendor_id: "vendor_1".into(),
                amount: dec!(0),
            },
        );
        assert!(matches!(result, Err(PayoutError::InvalidAmount(_))));
    }
}
