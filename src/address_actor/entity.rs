use crate::actor_framework::Entity;
use crate::domain::{Address, AddressCreate, AddressPatch};
use crate::error::AddressError;

impl Entity for Address {
    type Id = String;
    type CreatePayload = AddressCreate;
    type Patch = AddressPatch;
    type Action = ();
    type ActionResult = ();
    type Error = AddressError;

    fn id(&self) -> &String {
        &self.id
    }

    fn from_create(id: String, payload: AddressCreate) -> Result<Self, AddressError> {
        let required = [
            ("fullName", &payload.full_name),
            ("line1", &payload.line1),
            ("city", &payload.city),
            ("postalCode", &payload.postal_code),
            ("country", &payload.country),
        ];
        if let Some((field, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(AddressError::ValidationError(format!("{} is required", field)));
        }

        Ok(Self {
            id,
            user_id: payload.user_id,
            full_name: payload.full_name,
            line1: payload.line1,
            line2: payload.line2,
            city: payload.city,
            postal_code: payload.postal_code,
            country: payload.country,
            phone: payload.phone,
            is_default: payload.is_default,
        })
    }

    fn on_update(&mut self, patch: AddressPatch) -> Result<(), AddressError> {
        if let Some(is_default) = patch.is_default {
            self.is_default = is_default;
        }
        if let Some(line1) = patch.line1 {
            self.line1 = line1;
        }
        if let Some(line2) = patch.line2 {
            self.line2 = line2;
        }
        if let Some(city) = patch.city {
            self.city = city;
        }
        if let Some(postal_code) = patch.postal_code {
            self.postal_code = postal_code;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        Ok(())
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), AddressError> {
        Ok(())
    }
}
