//! HTTP boundary. Handlers translate requests into client calls and every
//! failure into an [`AppError`].

pub mod account;
pub mod admin;
pub mod error;
pub mod rentals;
pub mod session;
pub mod vendor;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::app_system::RentalSystem;
use crate::clients::{
    AddressClient, NotificationClient, PayoutClient, ProductClient, RentalClient, UserClient,
    VendorClient,
};

pub use error::AppError;
pub use session::AuthSession;

/// Client handles shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub rental_client: RentalClient,
    pub user_client: UserClient,
    pub vendor_client: VendorClient,
    pub product_client: ProductClient,
    pub address_client: AddressClient,
    pub payout_client: PayoutClient,
    pub notification_client: NotificationClient,
}

impl AppState {
    pub fn from_system(system: &RentalSystem) -> Self {
        Self {
            rental_client: system.rental_client.clone(),
            user_client: system.user_client.clone(),
            vendor_client: system.vendor_client.clone(),
            product_client: system.product_client.clone(),
            address_client: system.address_client.clone(),
            payout_client: system.payout_client.clone(),
            notification_client: system.notification_client.clone(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/rentals",
            post(rentals::create_rental).get(rentals::list_rentals),
        )
        .route("/api/rentals/{id}", get(rentals::get_rental))
        .route("/api/rentals/{id}/cancel", post(rentals::cancel_rental))
        .route("/api/availability", get(rentals::check_availability))
        .route("/api/pricing/quote", post(rentals::quote))
        .route(
            "/api/vendor/rentals/{id}",
            patch(vendor::update_rental_status),
        )
        .route("/api/vendor/earnings", get(vendor::earnings))
        .route(
            "/api/vendor/payouts",
            get(vendor::list_payouts).post(vendor::request_payout),
        )
        .route("/api/admin/finance", get(admin::finance_overview))
        .route("/api/admin/payouts", get(admin::list_payouts))
        .route("/api/admin/payouts/{id}", patch(admin::process_payout))
        .route("/api/admin/vendors/{id}", patch(admin::review_vendor))
        .route(
            "/api/admin/rentals/{id}/payment",
            patch(admin::record_payment),
        )
        .route(
            "/api/addresses",
            get(account::list_addresses).post(account::create_address),
        )
        .route(
            "/api/addresses/{id}/default",
            patch(account::set_default_address),
        )
        .route("/api/notifications", get(account::list_notifications))
        .route(
            "/api/notifications/{id}/read",
            patch(account::mark_notification_read),
        )
        .with_state(state)
}
