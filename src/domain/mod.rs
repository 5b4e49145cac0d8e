//! Domain aggregates of the cookie-consent taxonomy.

pub mod category;
pub mod cookie;
pub mod translation;
pub mod types;
