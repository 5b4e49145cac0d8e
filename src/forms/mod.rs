pub mod categories;
pub mod cookies;
pub mod import_export;
