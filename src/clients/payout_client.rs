use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::actor_framework::{Filter, ResourceClient};
use crate::clients::{NotificationClient, RentalClient, VendorClient};
use crate::domain::{NotificationKind, Payout, PayoutCreate, PayoutStatus};
use crate::error::PayoutError;
use crate::finance::{self, VendorEarnings};
use crate::payout_actor::{PayoutAction, PayoutDecision};
use crate::rental_actor::RentalFilter;

/// Payout requests and the admin approval workflow.
#[derive(Clone)]
pub struct PayoutClient {
    inner: ResourceClient<Payout>,
    rental_client: RentalClient,
    vendor_client: VendorClient,
    notifications: NotificationClient,
    /// One lock per vendor, held from the balance read until the payout is
    /// stored. Shared by every clone of this client.
    request_locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl_client_methods!(PayoutClient, Payout, PayoutCreate, PayoutError, payout);

impl PayoutClient {
    pub fn new(
        inner: ResourceClient<Payout>,
        rental_client: RentalClient,
        vendor_client: VendorClient,
        notifications: NotificationClient,
    ) -> Self {
        Self {
            inner,
            rental_client,
            vendor_client,
            notifications,
            request_locks: Arc::default(),
        }
    }

    async fn request_lock(&self, vendor_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.request_locks.lock().await;
        locks.entry(vendor_id.to_string()).or_default().clone()
    }

    /// Newest first.
    #[instrument(skip(self))]
    pub async fn list_for_vendor(&self, vendor_id: String) -> Result<Vec<Payout>, PayoutError> {
        debug!("Sending request");
        let mut payouts = self
            .inner
            .list(Filter::new(move |p: &Payout| p.vendor_id == vendor_id))
            .await?;
        payouts.sort_by(|a, b| b.requested_at.cmp(&a.requested_at));
        Ok(payouts)
    }

    #[instrument(skip(self))]
    pub async fn list_payouts(&self, status: Option<PayoutStatus>) -> Result<Vec<Payout>, PayoutError> {
        debug!("Sending request");
        let mut payouts = self
            .inner
            .list(Filter::new(move |p: &Payout| status.map_or(true, |s| p.status == s)))
            .await?;
        payouts.sort_by(|a, b| b.requested_at.cmp(&a.requested_at));
        Ok(payouts)
    }

    /// Recomputed from the full rental and payout history of the vendor.
    #[instrument(skip(self))]
    pub async fn earnings(&self, vendor_id: String) -> Result<VendorEarnings, PayoutError> {
        let rentals = self
            .rental_client
            .list_rentals(RentalFilter::Vendor(vendor_id.clone()))
            .await
            .map_err(|e| PayoutError::ActorCommunicationError(e.to_string()))?;
        let payouts = self.list_for_vendor(vendor_id).await?;
        Ok(finance::vendor_earnings(&rentals, &payouts))
    }

    #[instrument(skip(self), fields(amount = %amount))]
    pub async fn request_payout(&self, vendor_id: String, amount: Decimal) -> Result<Payout, PayoutError> {
        let lock = self.request_lock(&vendor_id).await;
        let _guard = lock.lock().await;

        let earnings = self.earnings(vendor_id.clone()).await?;
        finance::check_payout_eligibility(&earnings, amount)?;

        let payout = self.inner.create(PayoutCreate { vendor_id, amount }).await?;
        info!(payout_id = %payout.id, "Payout requested");
        Ok(payout)
    }

    /// Applies an admin decision to a PENDING payout and notifies the
    /// vendor's user. A failed notification is logged and the decision
    /// stands.
    #[instrument(skip(self))]
    pub async fn process(&self, payout_id: String, action: &str) -> Result<Payout, PayoutError> {
        let decision = PayoutDecision::parse(action)?;
        let payout = self
            .inner
            .perform_action(
                payout_id,
                PayoutAction::Decide {
                    decision,
                    at: Utc::now(),
                },
            )
            .await?;
        info!(status = ?payout.status, "Payout processed");

        self.notify_vendor(&payout).await;
        Ok(payout)
    }

    async fn notify_vendor(&self, payout: &Payout) {
        let user_id = match self.vendor_client.get_vendor(payout.vendor_id.clone()).await {
            Ok(Some(vendor)) => vendor.user_id,
            Ok(None) => {
                warn!(vendor_id = %payout.vendor_id, "Payout vendor missing, notification skipped");
                return;
            }
            Err(e) => {
                warn!(error = %e, "Vendor lookup failed, notification skipped");
                return;
            }
        };

        let (title, message) = match payout.status {
            PayoutStatus::Completed => (
                "Payout approved",
                format!("Your payout of {} has been approved.", payout.amount),
            ),
            _ => (
                "Payout rejected",
                "Your payout request was rejected.".to_string(),
            ),
        };

        if let Err(e) = self
            .notifications
            .notify(user_id, NotificationKind::Payout, title.to_string(), message)
            .await
        {
            warn!(error = %e, payout_id = %payout.id, "Payout notification failed");
        }
    }
}
