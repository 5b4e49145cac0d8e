use serde::Serialize;

use crate::domain::category::Category;
use crate::domain::types::Locale;

/// Admin view of a category with texts resolved for one locale.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    pub id: i32,
    pub locale: String,
    pub technical_name: String,
    pub enabled: bool,
    pub read_only: bool,
    pub position: i32,
    pub active: bool,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl CategoryDto {
    pub fn new(category: &Category, locale: &Locale) -> Self {
        Self {
            id: category.id.get(),
            locale: locale.to_string(),
            technical_name: category.technical_name.to_string(),
            enabled: category.enabled,
            read_only: category.read_only,
            position: category.position,
            active: category.active,
            name: category.name(locale).map(str::to_string),
            description: category.description(locale).map(str::to_string),
        }
    }
}
