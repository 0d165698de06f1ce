//! RentSquare booking core: a multi-vendor fashion-rental marketplace backend
//! built from single-owner actors.

pub mod actor_framework;
pub mod api;
pub mod app_system;
pub mod cart;
pub mod clients;
pub mod config;
pub mod domain;
pub mod error;
pub mod finance;
pub mod messages;
pub mod pricing;

pub mod address_actor;
pub mod notification_actor;
pub mod payout_actor;
pub mod product_actor;
pub mod rental_actor;
pub mod user_actor;
pub mod vendor_actor;

#[cfg(test)]
mod mock_framework;
