use rust_decimal::Decimal;

use super::actions::{ReviewDecision, VendorAction};
use crate::actor_framework::Entity;
use crate::domain::{Vendor, VendorCreate, VendorPatch, VendorStatus};
use crate::error::VendorError;

fn ensure_commission(rate: Decimal) -> Result<(), VendorError> {
    if rate < Decimal::ZERO || rate > Decimal::ONE_HUNDRED {
        return Err(VendorError::InvalidCommission(rate));
    }
    Ok(())
}

impl Entity for Vendor {
    type Id = String;
    type CreatePayload = VendorCreate;
    type Patch = VendorPatch;
    type Action = VendorAction;
    type ActionResult = Vendor;
    type Error = VendorError;

    fn id(&self) -> &String {
        &self.id
    }

    /// New vendors start PENDING until an admin reviews them.
    fn from_create(id: String, payload: VendorCreate) -> Result<Self, VendorError> {
        ensure_commission(payload.commission_rate)?;
        if payload.business_name.trim().is_empty() {
            return Err(VendorError::ValidationError("business name is required".into()));
        }
        Ok(Self {
            id,
            user_id: payload.user_id,
            business_name: payload.business_name,
            commission_rate: payload.commission_rate,
            status: VendorStatus::Pending,
            bank_details: payload.bank_details,
            rating: Decimal::ZERO,
            reviewed_at: None,
        })
    }

    fn on_update(&mut self, patch: VendorPatch) -> Result<(), VendorError> {
        if let Some(name) = patch.business_name {
            self.business_name = name;
        }
        if let Some(rate) = patch.commission_rate {
            ensure_commission(rate)?;
            self.commission_rate = rate;
        }
        if let Some(bank) = patch.bank_details {
            self.bank_details = Some(bank);
        }
        Ok(())
    }

    fn handle_action(&mut self, action: VendorAction) -> Result<Vendor, VendorError> {
        match action {
            VendorAction::Review { decision, at } => {
                if self.status != VendorStatus::Pending {
                    return Err(VendorError::AlreadyReviewed(self.status));
                }
                self.status = match decision {
                    ReviewDecision::Approve => VendorStatus::Approved,
                    ReviewDecision::Reject => VendorStatus::Rejected,
                };
                self.reviewed_at = Some(at);
                Ok(self.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn vendor() -> Vendor {
        Vendor::from_create(
            "vendor_1".into(),
            VendorCreate {
                user_id: "user_2".into(),
                business_name: "Closet Co".into(),
                commission_rate: dec!(15),
                bank_details: None,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_review_only_once() {
        let mut v = vendor();
        let at = Utc::now();
        let reviewed = v
            .handle_action(VendorAction::Review {
                decision: ReviewDecision::Approve,
                at,
            })
            .unwrap();
        assert_eq!(reviewed.status, VendorStatus::Approved);
        assert_eq!(reviewed.reviewed_at, Some(at));

        let again = v.handle_action(VendorAction::Review {
            decision: ReviewDecision::Reject,
            at,
        });
        assert_eq!(again, Err(VendorError::AlreadyReviewed(VendorStatus::Approved)));
    }

    #[test]
    fn test_commission_bounds() {
        let mut v = vendor();
        let patch = VendorPatch {
            commission_rate: Some(dec!(120)),
            ..Default::default()
        };
        assert_eq!(
            v.on_update(patch),
            Err(VendorError::InvalidCommission(dec!(120)))
        );
    }
}
