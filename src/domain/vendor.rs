use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// KYC / moderation state of a seller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VendorStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankDetails {
    pub account_holder: String,
    pub account_number: String,
    pub bank_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    pub id: String,
    /// Owning user; receives vendor notifications.
    pub user_id: String,
    pub business_name: String,
    /// Platform cut of each rental subtotal, in percent (0-100).
    pub commission_rate: Decimal,
    pub status: VendorStatus,
    pub bank_details: Option<BankDetails>,
    pub rating: Decimal,
    pub reviewed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct VendorCreate {
    pub user_id: String,
    pub business_name: String,
    pub commission_rate: Decimal,
    pub bank_details: Option<BankDetails>,
}

#[derive(Debug, Clone, Default)]
pub struct VendorPatch {
    pub business_name: Option<String>,
    pub commission_rate: Option<Decimal>,
    pub bank_details: Option<BankDetails>,
}
