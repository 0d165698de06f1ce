//! Payout requests and the admin approval state machine.

mod actions;
pub mod entity;

pub use actions::*;
