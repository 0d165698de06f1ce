//! Users and their customer profiles.

pub mod entity;
