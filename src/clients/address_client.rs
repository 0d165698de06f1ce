use tracing::{debug, info, instrument};

use crate::actor_framework::{Filter, ResourceClient};
use crate::domain::{Address, AddressCreate, AddressPatch};
use crate::error::AddressError;

/// Client for the Address actor. Also the address resolver used at checkout.
#[derive(Clone)]
pub struct AddressClient {
    inner: ResourceClient<Address>,
}

impl_client_new!(AddressClient, Address);

impl AddressClient {
    /// A user's first address becomes the default regardless of the flag.
    #[instrument(skip(self, payload))]
    pub async fn create_address(
        &self,
        user_id: String,
        mut payload: AddressCreate,
    ) -> Result<Address, AddressError> {
        debug!("Sending request");
        let existing = self.list_for_user(user_id.clone()).await?;
        let make_default = payload.is_default || existing.is_empty();

        payload.user_id = user_id.clone();
        payload.is_default = false;
        let address = self.inner.create(payload).await?;

        if make_default {
            return self.set_default(user_id, address.id).await;
        }
        Ok(address)
    }

    #[instrument(skip(self))]
    pub async fn list_for_user(&self, user_id: String) -> Result<Vec<Address>, AddressError> {
        debug!("Sending request");
        let mut addresses = self
            .inner
            .list(Filter::new(move |a: &Address| a.user_id == user_id))
            .await?;
        addresses.sort_by(|a, b| b.is_default.cmp(&a.is_default).then(a.id.cmp(&b.id)));
        Ok(addresses)
    }

    /// Looks up an address on behalf of `user_id`. Someone else's address
    /// is indistinguishable from a missing one.
    #[instrument(skip(self))]
    pub async fn resolve(&self, user_id: &str, address_id: &str) -> Result<Address, AddressError> {
        debug!("Sending request");
        self.inner
            .get(address_id.to_string())
            .await?
            .filter(|a| a.user_id == user_id)
            .ok_or_else(|| AddressError::NotFound(address_id.to_string()))
    }

    /// Clears the flag on the user's other addresses before setting it here.
    #[instrument(skip(self))]
    pub async fn set_default(&self, user_id: String, address_id: String) -> Result<Address, AddressError> {
        debug!("Sending request");
        self.resolve(&user_id, &address_id).await?;

        for other in self.list_for_user(user_id).await? {
            if other.is_default && other.id != address_id {
                self.inner
                    .update(other.id, AddressPatch {
                        is_default: Some(false),
                        ..Default::default()
                    })
                    .await?;
            }
        }

        let address = self
            .inner
            .update(address_id, AddressPatch {
                is_default: Some(true),
                ..Default::default()
            })
            .await?;
        info!(address_id = %address.id, "Default address updated");
        Ok(address)
    }
}
