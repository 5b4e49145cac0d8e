pub mod categories;
pub mod consent_config;
pub mod cookies;
pub mod errors;
pub mod import_export;

pub use errors::{ServiceError, ServiceResult};
