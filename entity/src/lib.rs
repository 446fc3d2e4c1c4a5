//! Store models for the organizational directory.
//!
//! Every table is keyed by a client-generated UUIDv7, so rows can be
//! referenced (for example as a superior) before they are inserted.

pub mod business_unit;
pub mod domain;
pub mod employee;
pub mod product;
