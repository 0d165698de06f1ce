use crate::actor_framework::Entity;
use crate::domain::{User, UserCreate, UserPatch};
use crate::error::UserError;

impl Entity for User {
    type Id = String;
    type CreatePayload = UserCreate;
    type Patch = UserPatch;
    type Action = ();
    type ActionResult = ();
    type Error = UserError;

    fn id(&self) -> &String {
        &self.id
    }

    /// Creates a new User. The customer profile id is derived from the user id.
    fn from_create(id: String, payload: UserCreate) -> Result<Self, UserError> {
        if !payload.email.contains('@') {
            return Err(UserError::ValidationError(format!(
                "invalid email: {}",
                payload.email
            )));
        }
        let customer_id = payload
            .with_customer_profile
            .then(|| format!("customer_{}", id.trim_start_matches("user_")));
        Ok(Self {
            id,
            name: payload.name,
            email: payload.email,
            role: payload.role,
            customer_id,
        })
    }

    fn on_update(&mut self, patch: UserPatch) -> Result<(), UserError> {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            if !email.contains('@') {
                return Err(UserError::ValidationError(format!("invalid email: {}", email)));
            }
            self.email = email;
        }
        Ok(())
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), UserError> {
        Ok(())
    }
}
