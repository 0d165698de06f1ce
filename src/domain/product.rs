use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductStatus {
    Draft,
    Active,
    Inactive,
}

/// A specific size/color instance of a product. The inventory count and the
/// availability flag are static catalog data; bookings never decrement them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    pub id: String,
    pub size: Option<String>,
    pub color: Option<String>,
    pub inventory: u32,
    pub is_available: bool,
}

impl ProductVariant {
    pub fn is_rentable(&self) -> bool {
        self.is_available && self.inventory >= 1
    }
}

/// Represents a product in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub vendor_id: String,
    pub name: String,
    pub images: Vec<String>,
    pub status: ProductStatus,
    pub daily_price: Decimal,
    pub weekly_price: Option<Decimal>,
    pub deposit_amount: Decimal,
    pub variants: Vec<ProductVariant>,
}

impl Product {
    pub fn variant(&self, variant_id: &str) -> Option<&ProductVariant> {
        self.variants.iter().find(|v| v.id == variant_id)
    }

    pub fn first_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// Variant as supplied when listing a product; ids are derived from the product id.
#[derive(Debug, Clone)]
pub struct VariantInput {
    pub size: Option<String>,
    pub color: Option<String>,
    pub inventory: u32,
    pub is_available: bool,
}

#[derive(Debug, Clone)]
pub struct ProductCreate {
    pub vendor_id: String,
    pub name: String,
    pub images: Vec<String>,
    pub status: ProductStatus,
    pub daily_price: Decimal,
    pub weekly_price: Option<Decimal>,
    pub deposit_amount: Decimal,
    pub variants: Vec<VariantInput>,
}

#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub status: Option<ProductStatus>,
    pub daily_price: Option<Decimal>,
    pub weekly_price: Option<Option<Decimal>>,
    pub images: Option<Vec<String>>,
}
