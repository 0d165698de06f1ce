use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use crate::actor_framework::{Filter, ResourceClient};
use crate::clients::NotificationClient;
use crate::domain::{NotificationKind, Vendor, VendorCreate, VendorPatch, VendorStatus};
use crate::error::VendorError;
use crate::vendor_actor::{ReviewDecision, VendorAction};

/// Client for the Vendor actor, including KYC moderation.
#[derive(Clone)]
pub struct VendorClient {
    inner: ResourceClient<Vendor>,
    notifications: NotificationClient,
}

impl_client_methods!(VendorClient, Vendor, VendorCreate, VendorError, vendor);

impl VendorClient {
    pub fn new(inner: ResourceClient<Vendor>, notifications: NotificationClient) -> Self {
        Self {
            inner,
            notifications,
        }
    }

    #[instrument(skip(self))]
    pub async fn update_vendor(&self, id: String, patch: VendorPatch) -> Result<Vendor, VendorError> {
        debug!("Sending request");
        Ok(self.inner.update(id, patch).await?)
    }

    /// Vendor profile owned by a user, if any.
    #[instrument(skip(self))]
    pub async fn find_by_user(&self, user_id: String) -> Result<Option<Vendor>, VendorError> {
        debug!("Sending request");
        let vendors = self
            .inner
            .list(Filter::new(move |v: &Vendor| v.user_id == user_id))
            .await?;
        Ok(vendors.into_iter().next())
    }

    /// Approves or rejects a PENDING vendor, then tells the vendor's user.
    /// The notification is best-effort and never undoes the review.
    #[instrument(skip(self))]
    pub async fn review(&self, vendor_id: String, action: &str) -> Result<Vendor, VendorError> {
        let decision = ReviewDecision::parse(action)?;
        let vendor = self
            .inner
            .perform_action(
                vendor_id,
                VendorAction::Review {
                    decision,
                    at: Utc::now(),
                },
            )
            .await?;
        info!(status = ?vendor.status, "Vendor reviewed");

        let message = match vendor.status {
            VendorStatus::Approved => format!(
                "{} has been approved. You can now list products.",
                vendor.business_name
            ),
            _ => format!("{} was not approved.", vendor.business_name),
        };
        if let Err(e) = self
            .notifications
            .notify(
                vendor.user_id.clone(),
                NotificationKind::VendorReview,
                "Vendor application reviewed".to_string(),
                message,
            )
            .await
        {
            warn!(error = %e, "Vendor review notification failed");
        }

        Ok(vendor)
    }
}
