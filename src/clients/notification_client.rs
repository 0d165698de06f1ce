use tracing::{debug, instrument};

use crate::actor_framework::{Filter, ResourceClient};
use crate::domain::{Notification, NotificationCreate, NotificationKind};
use crate::error::NotificationError;
use crate::notification_actor::NotificationAction;

#[derive(Clone)]
pub struct NotificationClient {
    inner: ResourceClient<Notification>,
}

impl_client_new!(NotificationClient, Notification);

impl NotificationClient {
    #[instrument(skip(self, title, message))]
    pub async fn notify(
        &self,
        user_id: String,
        kind: NotificationKind,
        title: String,
        message: String,
    ) -> Result<Notification, NotificationError> {
        debug!("Sending request");
        let payload = NotificationCreate {
            user_id,
            kind,
            title,
            message,
        };
        Ok(self.inner.create(payload).await?)
    }

    /// Newest first.
    #[instrument(skip(self))]
    pub async fn list_for_user(&self, user_id: String) -> Result<Vec<Notification>, NotificationError> {
        debug!("Sending request");
        let mut notifications = self
            .inner
            .list(Filter::new(move |n: &Notification| n.user_id == user_id))
            .await?;
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notifications)
    }

    /// Notifications of other users are reported as missing.
    #[instrument(skip(self))]
    pub async fn mark_read(&self, user_id: String, id: String) -> Result<Notification, NotificationError> {
        debug!("Sending request");
        self.inner
            .get(id.clone())
            .await?
            .filter(|n| n.user_id == user_id)
            .ok_or_else(|| NotificationError::NotFound(id.clone()))?;
        Ok(self.inner.perform_action(id, NotificationAction::MarkRead).await?)
    }
}
