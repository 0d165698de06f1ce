use tracing::{error, info};

use crate::actor_framework::{sequential_ids, ResourceActor};
use crate::clients::{
    AddressClient, NotificationClient, PayoutClient, ProductClient, RentalClient, UserClient,
    VendorClient,
};
use crate::config::Config;
use crate::domain::{Address, Notification, Payout, Product, User, Vendor};
use crate::rental_actor::{BookingDeps, RentalService};

/// The main application system that orchestrates all actors.
///
/// Responsible for starting up actors, wiring them together, and handling shutdown.
pub struct RentalSystem {
    pub rental_client: RentalClient,
    pub user_client: UserClient,
    pub vendor_client: VendorClient,
    pub product_client: ProductClient,
    pub address_client: AddressClient,
    pub payout_client: PayoutClient,
    pub notification_client: NotificationClient,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl RentalSystem {
    pub fn new(config: &Config) -> Self {
        let buffer = config.actor_buffer_size;

        // 1. Leaf resources
        let (notification_actor, notification_resource_client) =
            ResourceActor::<Notification>::new(buffer, sequential_ids("notification"));
        let notification_client = NotificationClient::new(notification_resource_client);
        let notification_handle = tokio::spawn(notification_actor.run());

        let (user_actor, user_resource_client) =
            ResourceActor::<User>::new(buffer, sequential_ids("user"));
        let user_client = UserClient::new(user_resource_client);
        let user_handle = tokio::spawn(user_actor.run());

        let (product_actor, product_resource_client) =
            ResourceActor::<Product>::new(buffer, sequential_ids("product"));
        let product_client = ProductClient::new(product_resource_client);
        let product_handle = tokio::spawn(product_actor.run());

        let (address_actor, address_resource_client) =
            ResourceActor::<Address>::new(buffer, sequential_ids("address"));
        let address_client = AddressClient::new(address_resource_client);
        let address_handle = tokio::spawn(address_actor.run());

        // 2. Vendors notify their users on review
        let (vendor_actor, vendor_resource_client) =
            ResourceActor::<Vendor>::new(buffer, sequential_ids("vendor"));
        let vendor_client = VendorClient::new(vendor_resource_client, notification_client.clone());
        let vendor_handle = tokio::spawn(vendor_actor.run());

        // 3. Booking root actor
        let deps = BookingDeps {
            user_client: user_client.clone(),
            product_client: product_client.clone(),
            vendor_client: vendor_client.clone(),
            address_client: address_client.clone(),
        };
        let (rental_service, rental_client) =
            RentalService::new(buffer, deps, config.currency.clone());
        let rental_handle = tokio::spawn(rental_service.run());

        // 4. Payouts read earnings from the rental service
        let (payout_actor, payout_resource_client) =
            ResourceActor::<Payout>::new(buffer, sequential_ids("payout"));
        let payout_client = PayoutClient::new(
            payout_resource_client,
            rental_client.clone(),
            vendor_client.clone(),
            notification_client.clone(),
        );
        let payout_handle = tokio::spawn(payout_actor.run());

        info!("Rental system started");

        Self {
            rental_client,
            user_client,
            vendor_client,
            product_client,
            address_client,
            payout_client,
            notification_client,
            handles: vec![
                rental_handle,
                payout_handle,
                vendor_handle,
                address_handle,
                product_handle,
                user_handle,
                notification_handle,
            ],
        }
    }

    /// Stops the rental service, then lets every resource actor drain once
    /// the last client handle is gone. Clones handed out elsewhere must be
    /// dropped first.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");

        self.rental_client.shutdown().await;

        drop(self.rental_client);
        drop(self.payout_client);
        drop(self.vendor_client);
        drop(self.address_client);
        drop(self.product_client);
        drop(self.user_client);
        drop(self.notification_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
