//! Vendor profiles and KYC moderation.

mod actions;
pub mod entity;

pub use actions::*;
