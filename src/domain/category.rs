use serde::{Deserialize, Serialize};

use crate::domain::translation::{TranslationFields, Translations};
use crate::domain::types::{CategoryId, Locale, TechnicalName};

/// Localized texts of a [`Category`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTranslation {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Localized fields of a [`Category`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryField {
    Name,
    Description,
}

impl TranslationFields for CategoryTranslation {
    type Field = CategoryField;

    fn field(&self, field: CategoryField) -> Option<&str> {
        match field {
            CategoryField::Name => self.name.as_deref(),
            CategoryField::Description => self.description.as_deref(),
        }
    }

    fn set_field(&mut self, field: CategoryField, value: Option<String>) {
        match field {
            CategoryField::Name => self.name = value,
            CategoryField::Description => self.description = value,
        }
    }
}

/// Top-level grouping of cookies by purpose.
///
/// `enabled` marks a category as pre-selected in the banner; `read_only`
/// prevents visitors from toggling it. Inactive categories are hidden from
/// the public configuration together with all their cookies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub technical_name: TechnicalName,
    pub enabled: bool,
    pub read_only: bool,
    pub position: i32,
    pub active: bool,
    pub translations: Translations<CategoryTranslation>,
}

impl Category {
    pub fn name(&self, locale: &Locale) -> Option<&str> {
        self.translations.localized(locale, CategoryField::Name)
    }

    pub fn description(&self, locale: &Locale) -> Option<&str> {
        self.translations.localized(locale, CategoryField::Description)
    }
}

/// Data required to insert a new [`Category`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCategory {
    pub technical_name: TechnicalName,
    pub enabled: bool,
    pub read_only: bool,
    pub position: i32,
    pub active: bool,
    pub translations: Translations<CategoryTranslation>,
}

impl NewCategory {
    /// A new, active category with default flags and no translations.
    pub fn new(technical_name: TechnicalName) -> Self {
        Self {
            technical_name,
            enabled: false,
            read_only: false,
            position: 0,
            active: true,
            translations: Translations::new(),
        }
    }
}
