use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::category::{Category, NewCategory};
use crate::domain::types::{Locale, TechnicalName, TypeConstraintError};

/// Empty strings clear an optional text field.
pub(crate) fn normalize_text(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// JSON body accepted by the category admin endpoints.
///
/// Every field is optional so the same form serves create and patch-style
/// update; `technicalName` is required on create.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CategoryForm {
    #[validate(length(min = 1, max = 100))]
    pub technical_name: Option<String>,
    pub enabled: Option<bool>,
    pub read_only: Option<bool>,
    pub position: Option<i32>,
    pub active: Option<bool>,
    #[validate(length(max = 255))]
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryFormPayload {
    pub technical_name: Option<TechnicalName>,
    pub enabled: Option<bool>,
    pub read_only: Option<bool>,
    pub position: Option<i32>,
    pub active: Option<bool>,
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Error)]
pub enum CategoryFormError {
    #[error("Category form validation failed: {0}")]
    Validation(String),
    #[error("Category form contains invalid data: {0}")]
    TypeConstraint(String),
    #[error("Category form is missing `{0}`")]
    MissingField(&'static str),
}

impl From<ValidationErrors> for CategoryFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for CategoryFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<CategoryForm> for CategoryFormPayload {
    type Error = CategoryFormError;

    fn try_from(value: CategoryForm) -> Result<Self, Self::Error> {
        value.validate()?;

        Ok(Self {
            technical_name: value.technical_name.map(TechnicalName::new).transpose()?,
            enabled: value.enabled,
            read_only: value.read_only,
            position: value.position,
            active: value.active,
            name: value.name,
            description: value.description,
        })
    }
}

impl CategoryFormPayload {
    /// Build a new category, writing localized fields to `locale`.
    pub fn into_new_category(self, locale: &Locale) -> Result<NewCategory, CategoryFormError> {
        let technical_name = self
            .technical_name
            .clone()
            .ok_or(CategoryFormError::MissingField("technicalName"))?;

        let mut category = NewCategory::new(technical_name);
        if let Some(enabled) = self.enabled {
            category.enabled = enabled;
        }
        if let Some(read_only) = self.read_only {
            category.read_only = read_only;
        }
        if let Some(position) = self.position {
            category.position = position;
        }
        if let Some(active) = self.active {
            category.active = active;
        }
        if self.name.is_some() || self.description.is_some() {
            let translation = category.translations.ensure(locale);
            translation.name = self.name.and_then(normalize_text);
            translation.description = self.description.and_then(normalize_text);
        }
        Ok(category)
    }

    /// Patch `category` with the supplied fields only.
    pub fn apply_to(self, category: &mut Category, locale: &Locale) {
        if let Some(technical_name) = self.technical_name {
            category.technical_name = technical_name;
        }
        if let Some(enabled) = self.enabled {
            category.enabled = enabled;
        }
        if let Some(read_only) = self.read_only {
            category.read_only = read_only;
        }
        if let Some(position) = self.position {
            category.position = position;
        }
        if let Some(active) = self.active {
            category.active = active;
        }
        if self.name.is_none() && self.description.is_none() {
            return;
        }
        let translation = category.translations.ensure(locale);
        if let Some(name) = self.name {
            translation.name = normalize_text(name);
        }
        if let Some(description) = self.description {
            translation.description = normalize_text(description);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::translation::Translations;
    use crate::domain::types::CategoryId;

    fn de() -> Locale {
        Locale::new("de").unwrap()
    }

    #[test]
    fn rejects_blank_technical_name() {
        let form = CategoryForm {
            technical_name: Some("   ".into()),
            ..CategoryForm::default()
        };
        let err = CategoryFormPayload::try_from(form).unwrap_err();
        assert!(matches!(err, CategoryFormError::TypeConstraint(_)));
    }

    #[test]
    fn new_category_requires_technical_name() {
        let payload = CategoryFormPayload {
            name: Some("Statistik".into()),
            ..CategoryFormPayload::default()
        };
        let err = payload.into_new_category(&de()).unwrap_err();
        assert!(matches!(err, CategoryFormError::MissingField("technicalName")));
    }

    #[test]
    fn apply_to_only_touches_supplied_fields() {
        let mut category = Category {
            id: CategoryId::new(3).unwrap(),
            technical_name: TechnicalName::new("analytics").unwrap(),
            enabled: false,
            read_only: false,
            position: 2,
            active: true,
            translations: Translations::new(),
        };
        category
            .translations
            .ensure(&de())
            .description = Some("Statistiken".into());

        CategoryFormPayload {
            position: Some(7),
            name: Some("Analyse".into()),
            ..CategoryFormPayload::default()
        }
        .apply_to(&mut category, &de());

        assert_eq!(category.position, 7);
        assert_eq!(category.technical_name, "analytics");
        assert_eq!(category.name(&de()), Some("Analyse"));
        assert_eq!(category.description(&de()), Some("Statistiken"));
        assert!(!category.translations.contains(&Locale::new("en").unwrap()));
    }
}
