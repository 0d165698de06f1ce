use rust_decimal::Decimal;

use crate::actor_framework::Entity;
use crate::domain::{Product, ProductCreate, ProductPatch, ProductVariant};
use crate::error::ProductError;

fn ensure_price(value: Decimal, field: &str) -> Result<(), ProductError> {
    if value < Decimal::ZERO {
        return Err(ProductError::ValidationError(format!(
            "{} must not be negative",
            field
        )));
    }
    Ok(())
}

impl Entity for Product {
    type Id = String;
    type CreatePayload = ProductCreate;
    type Patch = ProductPatch;
    type Action = ();
    type ActionResult = ();
    type Error = ProductError;

    fn id(&self) -> &String {
        &self.id
    }

    /// Variant ids are `"{product_id}_v{n}"`, numbered from 1 in input order.
    fn from_create(id: String, payload: ProductCreate) -> Result<Self, ProductError> {
        if payload.name.trim().is_empty() {
            return Err(ProductError::ValidationError("name is required".into()));
        }
        ensure_price(payload.daily_price, "daily price")?;
        ensure_price(payload.deposit_amount, "deposit")?;
        if let Some(weekly) = payload.weekly_price {
            ensure_price(weekly, "weekly price")?;
        }

        let variants = payload
            .variants
            .into_iter()
            .enumerate()
            .map(|(i, v)| ProductVariant {
                id: format!("{}_v{}", id, i + 1),
                size: v.size,
                color: v.color,
                inventory: v.inventory,
                is_available: v.is_available,
            })
            .collect();

        Ok(Self {
            id,
            vendor_id: payload.vendor_id,
            name: payload.name,
            images: payload.images,
            status: payload.status,
            daily_price: payload.daily_price,
            weekly_price: payload.weekly_price,
            deposit_amount: payload.deposit_amount,
            variants,
        })
    }

    fn on_update(&mut self, patch: ProductPatch) -> Result<(), ProductError> {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(price) = patch.daily_price {
            ensure_price(price, "daily price")?;
            self.daily_price = price;
        }
        if let Some(weekly) = patch.weekly_price {
            if let Some(price) = weekly {
                ensure_price(price, "weekly price")?;
            }
            self.weekly_price = weekly;
        }
        if let Some(images) = patch.images {
            self.images = images;
        }
        Ok(())
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), ProductError> {
        Ok(())
    }
}
