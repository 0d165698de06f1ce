//! # Mock Framework
//!
//! Utilities for testing clients in isolation.
//!
//! Use [`create_mock_client`] to get a client and a receiver.
//! Then use helpers like [`expect_create`] or [`expect_action`] to assert behavior.

use crate::actor_framework::{Entity, Filter, ResourceClient, ResourceRequest, Response};
use tokio::sync::mpsc;

/// Creates a mock client and a receiver for asserting requests.
///
/// The client sends to a channel the test controls instead of a running
/// `ResourceActor`, so a test can inspect each request and answer it with
/// whatever success or failure the scenario needs.
pub fn create_mock_client<T: Entity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::CreatePayload, Response<T, T::Error>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create {
            payload,
            respond_to,
        }) => Some((payload, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, Response<Option<T>, T::Error>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Update request
pub async fn expect_update<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Patch, Response<T, T::Error>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Update {
            id,
            patch,
            respond_to,
        }) => Some((id, patch, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a List request
pub async fn expect_list<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(Filter<T>, Response<Vec<T>, T::Error>)> {
    match receiver.recv().await {
        Some(ResourceRequest::List { filter, respond_to }) => Some((filter, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Action request
pub async fn expect_action<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Action, Response<T::ActionResult, T::Error>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action {
            id,
            action,
            respond_to,
        }) => Some((id, action, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor_framework::FrameworkError;
    use crate::clients::UserClient;
    use crate::domain::{Notification, NotificationKind, User, UserPatch};
    use crate::error::UserError;
    use crate::notification_actor::NotificationAction;
    use chrono::Utc;

    fn notification(user_id: &str, is_read: bool) -> Notification {
        Notification {
            id: "notification_1".into(),
            user_id: user_id.into(),
            kind: NotificationKind::Rental,
            title: "Shipped".into(),
            message: "Your rental is on its way".into(),
            is_read,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client::<Notification>(10);

        let task = tokio::spawn(async move {
            client
                .perform_action("notification_1".to_string(), NotificationAction::MarkRead)
                .await
        });

        let (id, action, responder) = expect_action(&mut receiver)
            .await
            .expect("Expected Action request");
        assert_eq!(id, "notification_1");
        assert!(matches!(action, NotificationAction::MarkRead));
        responder.send(Ok(notification("user_1", true))).unwrap();

        let result = task.await.unwrap().unwrap();
        assert!(result.is_read);
    }

    #[tokio::test]
    async fn test_update_errors_reach_the_caller() {
        let (inner, mut receiver) = create_mock_client::<User>(10);
        let client = UserClient::new(inner);

        let task = tokio::spawn(async move {
            client
                .update_user(
                    "user_1".to_string(),
                    UserPatch {
                        email: Some("not-an-email".into()),
                        ..Default::default()
                    },
                )
                .await
        });

        let (id, patch, responder) = expect_update(&mut receiver)
            .await
            .expect("Expected Update request");
        assert_eq!(id, "user_1");
        assert_eq!(patch.email.as_deref(), Some("not-an-email"));
        responder
            .send(Err(FrameworkError::Entity(UserError::ValidationError(
                "invalid email".into(),
            ))))
            .unwrap();

        assert_eq!(
            task.await.unwrap(),
            Err(UserError::ValidationError("invalid email".into()))
        );
    }

    #[tokio::test]
    async fn test_list_filter_is_inspectable() {
        let (client, mut receiver) = create_mock_client::<Notification>(10);

        let task = tokio::spawn(async move {
            client
                .list(Filter::new(|n: &Notification| n.user_id == "user_1"))
                .await
        });

        let (filter, responder) = expect_list(&mut receiver).await.expect("Expected List");
        assert!(filter.matches(&notification("user_1", false)));
        assert!(!filter.matches(&notification("user_2", false)));
        responder.send(Ok(vec![])).unwrap();

        assert_eq!(task.await.unwrap(), Ok(vec![]));
    }
}
