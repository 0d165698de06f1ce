//! Booking workflow: availability, the transactional rental store, and the
//! single-writer actor that serializes every booking.

pub mod availability;
pub mod service;
pub mod store;

pub use availability::*;
pub use service::*;
pub use store::*;
