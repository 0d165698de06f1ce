//! Caller identity.
//!
//! Sign-in happens upstream; requests arrive with the authenticated user in
//! the `x-user-id` and `x-user-role` headers. Both are checked against the
//! user store.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tracing::warn;

use super::error::AppError;
use super::AppState;
use crate::domain::{Role, Session, Vendor};

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

#[derive(Debug, Clone)]
pub struct AuthSession(pub Session);

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn read_session(parts: &Parts) -> Result<Session, AppError> {
    let user_id = header(parts, USER_ID_HEADER).ok_or_else(AppError::unauthorized)?;
    let role = header(parts, USER_ROLE_HEADER)
        .and_then(Role::parse)
        .ok_or_else(AppError::unauthorized)?;
    Ok(Session::new(user_id, role))
}

/// The claimed role must be the one stored for the user.
impl FromRequestParts<AppState> for AuthSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = read_session(parts)?;
        let user = state
            .user_client
            .get_user(session.user_id.clone())
            .await?
            .ok_or_else(AppError::unauthorized)?;
        if user.role != session.role {
            warn!(user_id = %session.user_id, claimed = ?session.role, stored = ?user.role, "Session role mismatch");
            return Err(AppError::unauthorized());
        }
        Ok(AuthSession(session))
    }
}

impl AuthSession {
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.0.is_admin() {
            Ok(())
        } else {
            Err(AppError::Unauthorized("Admin access required".into()))
        }
    }

    /// Vendor profile of the caller; vendor routes require one.
    pub async fn vendor(&self, state: &AppState) -> Result<Vendor, AppError> {
        if self.0.role != Role::Vendor {
            return Err(AppError::Unauthorized("Vendor access required".into()));
        }
        state
            .vendor_client
            .find_by_user(self.0.user_id.clone())
            .await?
            .ok_or_else(|| AppError::Unauthorized("No vendor profile for this account".into()))
    }

    /// Customer profile id of the caller.
    pub async fn customer_id(&self, state: &AppState) -> Result<String, AppError> {
        state
            .user_client
            .get_user(self.0.user_id.clone())
            .await?
            .and_then(|u| u.customer_id)
            .ok_or_else(|| AppError::Unauthorized("A customer profile is required".into()))
    }
}
