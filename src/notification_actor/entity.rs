use chrono::Utc;

use crate::actor_framework::Entity;
use crate::domain::{Notification, NotificationCreate};
use crate::error::NotificationError;

#[derive(Debug, Clone, Copy)]
pub enum NotificationAction {
    MarkRead,
}

impl Entity for Notification {
    type Id = String;
    type CreatePayload = NotificationCreate;
    type Patch = ();
    type Action = NotificationAction;
    type ActionResult = Notification;
    type Error = NotificationError;

    fn id(&self) -> &String {
        &self.id
    }

    fn from_create(id: String, payload: NotificationCreate) -> Result<Self, NotificationError> {
        Ok(Self {
            id,
            user_id: payload.user_id,
            kind: payload.kind,
            title: payload.title,
            message: payload.message,
            is_read: false,
            created_at: Utc::now(),
        })
    }

    fn on_update(&mut self, _patch: ()) -> Result<(), NotificationError> {
        Ok(())
    }

    fn handle_action(
        &mut self,
        action: NotificationAction,
    ) -> Result<Notification, NotificationError> {
        match action {
            NotificationAction::MarkRead => {
                self.is_read = true;
                Ok(self.clone())
            }
        }
    }
}
