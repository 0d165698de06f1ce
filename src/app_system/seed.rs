use anyhow::Context;
use rust_decimal::Decimal;
use tracing::info;

use super::RentalSystem;
use crate::domain::{
    AddressCreate, ProductCreate, ProductStatus, Role, UserCreate, VariantInput, VendorCreate,
};

/// Ids of the records created by [`seed_demo_data`].
#[derive(Debug, Clone)]
pub struct DemoData {
    pub admin_id: String,
    pub vendor_user_id: String,
    pub vendor_id: String,
    pub customer_user_id: String,
    pub address_id: String,
    pub product_id: String,
}

fn user(name: &str, email: &str, role: Role, with_customer_profile: bool) -> UserCreate {
    UserCreate {
        name: name.into(),
        email: email.into(),
        role,
        with_customer_profile,
    }
}

/// An admin, an approved vendor with one active product, and a customer with
/// a default address.
pub async fn seed_demo_data(system: &RentalSystem) -> anyhow::Result<DemoData> {
    let admin = system
        .user_client
        .create_user(user("Avery Admin", "admin@rentsquare.test", Role::Admin, false))
        .await
        .context("creating admin")?;

    let vendor_user = system
        .user_client
        .create_user(user("Vera Vendor", "vendor@rentsquare.test", Role::Vendor, false))
        .await
        .context("creating vendor user")?;
    let vendor = system
        .vendor_client
        .create_vendor(VendorCreate {
            user_id: vendor_user.id.clone(),
            business_name: "Gown Gallery".into(),
            commission_rate: Decimal::from(10),
            bank_details: None,
        })
        .await
        .context("creating vendor")?;
    system
        .vendor_client
        .review(vendor.id.clone(), "approve")
        .await
        .context("approving vendor")?;

    let customer = system
        .user_client
        .create_user(user("Casey Customer", "casey@rentsquare.test", Role::Customer, true))
        .await
        .context("creating customer")?;
    let address = system
        .address_client
        .create_address(
            customer.id.clone(),
            AddressCreate {
                user_id: String::new(),
                full_name: "Casey Customer".into(),
                line1: "12 Market Street".into(),
                line2: None,
                city: "Springfield".into(),
                postal_code: "12345".into(),
                country: "US".into(),
                phone: None,
                is_default: true,
            },
        )
        .await
        .context("creating address")?;

    let variant = |size: &str| VariantInput {
        size: Some(size.into()),
        color: Some("Emerald".into()),
        inventory: 1,
        is_available: true,
    };
    let product = system
        .product_client
        .create_product(ProductCreate {
            vendor_id: vendor.id.clone(),
            name: "Emerald Evening Gown".into(),
            images: vec!["/images/emerald-gown.jpg".into()],
            status: ProductStatus::Active,
            daily_price: Decimal::new(4500, 2),
            weekly_price: Some(Decimal::new(25000, 2)),
            deposit_amount: Decimal::from(100),
            variants: vec![variant("S"), variant("M"), variant("L")],
        })
        .await
        .context("creating product")?;

    let demo = DemoData {
        admin_id: admin.id,
        vendor_user_id: vendor_user.id,
        vendor_id: vendor.id,
        customer_user_id: customer.id,
        address_id: address.id,
        product_id: product.id,
    };
    info!(?demo, "Demo data seeded");
    Ok(demo)
}
