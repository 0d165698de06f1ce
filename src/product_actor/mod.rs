//! Catalog entries and their variants.

pub mod entity;
