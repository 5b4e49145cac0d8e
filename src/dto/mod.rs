//! Outgoing JSON shapes.

pub mod categories;
pub mod consent;
pub mod cookies;
pub mod transfer;
