//! Typed handles for every actor. Cheap to clone; each call is one
//! request/reply round trip.

#[macro_use]
mod macros;

pub mod address_client;
pub mod notification_client;
pub mod payout_client;
pub mod product_client;
pub mod rental_client;
pub mod user_client;
pub mod vendor_client;

pub use address_client::AddressClient;
pub use notification_client::NotificationClient;
pub use payout_client::PayoutClient;
pub use product_client::ProductClient;
pub use rental_client::RentalClient;
pub use user_client::UserClient;
pub use vendor_client::VendorClient;
