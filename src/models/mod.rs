//! Diesel row models and their conversions into domain aggregates.

pub mod category;
pub mod config;
pub mod cookie;
