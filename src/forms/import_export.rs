//! Validation of import documents into typed records.
//!
//! The whole document is checked before anything is written, so the import
//! either sees only well-formed records or nothing at all.

use std::collections::{BTreeMap, HashSet};

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::domain::category::{Category, CategoryTranslation, NewCategory};
use crate::domain::cookie::{
    Cookie, CookieItemDraft, CookieItemTranslation, CookieTranslation, MergeOutcome, NewCookie,
};
use crate::domain::translation::{TranslationFields, Translations};
use crate::domain::types::{
    CategoryId, CookieItemName, LegalBasis, Locale, ProcessingLocation, TechnicalName,
    TypeConstraintError,
};
use crate::dto::transfer::{
    CategoryRecord, CategoryTranslationRecord, CookieItemRecord, CookieItemTranslationRecord,
    CookieRecord, CookieTranslationRecord, TransferDocument,
};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Import document is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("Import entry {entry} is invalid: {message}")]
    Validation { entry: String, message: String },
}

/// A category entry of the import document.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedCategory {
    pub technical_name: TechnicalName,
    pub enabled: bool,
    pub read_only: bool,
    pub position: i32,
    pub active: bool,
    pub translations: Translations<CategoryTranslation>,
}

/// A cookie entry of the import document.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedCookie {
    pub technical_name: TechnicalName,
    pub category_technical_name: Option<TechnicalName>,
    pub provider: Option<String>,
    pub script_url: Option<String>,
    pub legal_basis: LegalBasis,
    pub processing_location: ProcessingLocation,
    pub position: i32,
    pub active: bool,
    pub translations: Translations<CookieTranslation>,
    pub items: Vec<CookieItemDraft>,
}

/// Fully validated import document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportPayload {
    pub categories: Vec<ImportedCategory>,
    pub cookies: Vec<ImportedCookie>,
}

fn convert_translations<R, T>(
    records: BTreeMap<String, R>,
    convert: impl Fn(R) -> T,
) -> Result<Translations<T>, TypeConstraintError>
where
    T: TranslationFields,
{
    records
        .into_iter()
        .map(|(locale, record)| -> Result<_, TypeConstraintError> {
            Ok((Locale::new(locale)?, convert(record)))
        })
        .collect()
}

impl From<CategoryTranslationRecord> for CategoryTranslation {
    fn from(value: CategoryTranslationRecord) -> Self {
        Self {
            name: value.name,
            description: value.description,
        }
    }
}

impl From<CookieTranslationRecord> for CookieTranslation {
    fn from(value: CookieTranslationRecord) -> Self {
        Self {
            name: value.name,
            description: value.description,
            privacy_policy_url: value.privacy_policy_url,
            data_collected: value.data_collected,
            data_purpose: value.data_purpose,
        }
    }
}

impl From<CookieItemTranslationRecord> for CookieItemTranslation {
    fn from(value: CookieItemTranslationRecord) -> Self {
        Self {
            description: value.description,
        }
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, TypeConstraintError> {
    value.ok_or(TypeConstraintError::EmptyString(field))
}

impl TryFrom<CategoryRecord> for ImportedCategory {
    type Error = TypeConstraintError;

    fn try_from(value: CategoryRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            technical_name: TechnicalName::new(required(value.technical_name, "technicalName")?)?,
            enabled: value.enabled.unwrap_or(false),
            read_only: value.read_only.unwrap_or(false),
            position: value.position.unwrap_or(0),
            active: value.active.unwrap_or(true),
            translations: convert_translations(value.translations, CategoryTranslation::from)?,
        })
    }
}

impl TryFrom<CookieItemRecord> for CookieItemDraft {
    type Error = TypeConstraintError;

    fn try_from(value: CookieItemRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            name: CookieItemName::new(required(value.name, "cookie item name")?)?,
            lifetime: value.lifetime,
            position: value.position.unwrap_or(0),
            active: value.active.unwrap_or(true),
            translations: convert_translations(value.translations, CookieItemTranslation::from)?,
        })
    }
}

impl TryFrom<CookieRecord> for ImportedCookie {
    type Error = TypeConstraintError;

    fn try_from(value: CookieRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            technical_name: TechnicalName::new(required(value.technical_name, "technicalName")?)?,
            category_technical_name: value
                .category_technical_name
                .filter(|name| !name.trim().is_empty())
                .map(TechnicalName::new)
                .transpose()?,
            provider: value.provider,
            script_url: value.script_url,
            legal_basis: value
                .legal_basis
                .map(LegalBasis::try_from)
                .transpose()?
                .unwrap_or_default(),
            processing_location: value
                .processing_location
                .map(ProcessingLocation::try_from)
                .transpose()?
                .unwrap_or_default(),
            position: value.position.unwrap_or(0),
            active: value.active.unwrap_or(true),
            translations: convert_translations(value.translations, CookieTranslation::from)?,
            items: value
                .cookie_items
                .into_iter()
                .map(CookieItemDraft::try_from)
                .collect::<Result<Vec<_>, _>>()?,
        })
    }
}

/// Label of entry `index` in `section`, including its technical name when readable.
fn entry_label(section: &str, index: usize, value: &serde_json::Value) -> String {
    match value.get("technicalName").and_then(serde_json::Value::as_str) {
        Some(name) => format!("{section}[{index}] ({name})"),
        None => format!("{section}[{index}]"),
    }
}

fn parse_entries<R, T>(section: &str, values: Vec<serde_json::Value>) -> Result<Vec<T>, ImportError>
where
    R: DeserializeOwned,
    T: TryFrom<R, Error = TypeConstraintError>,
{
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            let entry = entry_label(section, index, &value);
            let record: R = serde_json::from_value(value).map_err(|e| ImportError::Validation {
                entry: entry.clone(),
                message: e.to_string(),
            })?;
            T::try_from(record).map_err(|e| ImportError::Validation {
                entry,
                message: e.to_string(),
            })
        })
        .collect()
}

impl ImportPayload {
    /// Parse and validate an import document.
    pub fn from_json(json: &str) -> Result<Self, ImportError> {
        let document: TransferDocument = serde_json::from_str(json)
            .map_err(|e| ImportError::InvalidJson(e.to_string()))?;

        let payload = Self {
            categories: parse_entries::<CategoryRecord, _>("categories", document.categories)?,
            cookies: parse_entries::<CookieRecord, _>("cookies", document.cookies)?,
        };
        reject_duplicates(
            "categories",
            payload.categories.iter().map(|c| &c.technical_name),
        )?;
        reject_duplicates("cookies", payload.cookies.iter().map(|c| &c.technical_name))?;
        Ok(payload)
    }
}

/// Technical names identify records, so each may appear once per section.
fn reject_duplicates<'a>(
    section: &str,
    names: impl Iterator<Item = &'a TechnicalName>,
) -> Result<(), ImportError> {
    let mut seen = HashSet::new();
    for (index, name) in names.enumerate() {
        if !seen.insert(name) {
            return Err(ImportError::Validation {
                entry: format!("{section}[{index}] ({name})"),
                message: "duplicate technicalName".to_string(),
            });
        }
    }
    Ok(())
}

impl ImportedCategory {
    /// Overwrite every field of `category`; each imported locale replaces the
    /// stored translation wholesale.
    pub fn apply_to(&self, category: &mut Category) {
        category.enabled = self.enabled;
        category.read_only = self.read_only;
        category.position = self.position;
        category.active = self.active;
        for (locale, translation) in self.translations.iter() {
            category
                .translations
                .replace(locale.clone(), translation.clone());
        }
    }

    pub fn to_new_category(&self) -> NewCategory {
        NewCategory {
            enabled: self.enabled,
            read_only: self.read_only,
            position: self.position,
            active: self.active,
            translations: self.translations.clone(),
            ..NewCategory::new(self.technical_name.clone())
        }
    }
}

impl ImportedCookie {
    /// Overwrite every field of `cookie` and merge the imported items by name.
    ///
    /// The category is only moved when `category_id` resolved; stored items
    /// missing from the import are kept.
    pub fn apply_to(
        &self,
        cookie: &mut Cookie,
        category_id: Option<CategoryId>,
    ) -> Vec<MergeOutcome> {
        cookie.provider = self.provider.clone();
        cookie.script_url = self.script_url.clone();
        cookie.legal_basis = self.legal_basis;
        cookie.processing_location = self.processing_location;
        cookie.position = self.position;
        cookie.active = self.active;
        if let Some(category_id) = category_id {
            cookie.category_id = category_id;
        }
        for (locale, translation) in self.translations.iter() {
            cookie
                .translations
                .replace(locale.clone(), translation.clone());
        }
        self.items
            .iter()
            .map(|draft| cookie.upsert_item(draft.clone()))
            .collect()
    }

    /// Build the cookie for an entry that does not exist yet.
    pub fn to_new_cookie(&self, category_id: CategoryId) -> (NewCookie, Vec<MergeOutcome>) {
        let mut cookie = NewCookie {
            provider: self.provider.clone(),
            script_url: self.script_url.clone(),
            legal_basis: self.legal_basis,
            processing_location: self.processing_location,
            position: self.position,
            active: self.active,
            translations: self.translations.clone(),
            ..NewCookie::new(category_id, self.technical_name.clone())
        };
        let outcomes = self
            .items
            .iter()
            .map(|draft| cookie.upsert_item(draft.clone()))
            .collect();
        (cookie, outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applies_defaults_for_missing_fields() {
        let payload = ImportPayload::from_json(
            r#"{"categories":[{"technicalName":"marketing","translations":{"de":{"name":"Marketing"}}}],
                "cookies":[{"technicalName":"fb","categoryTechnicalName":"marketing",
                            "cookieItems":[{"name":"_fbp"}]}]}"#,
        )
        .unwrap();

        let category = &payload.categories[0];
        assert!(!category.enabled);
        assert!(!category.read_only);
        assert!(category.active);
        assert_eq!(category.position, 0);

        let cookie = &payload.cookies[0];
        assert_eq!(cookie.legal_basis, LegalBasis::Consent);
        assert_eq!(cookie.processing_location, ProcessingLocation::Eu);
        assert_eq!(cookie.items[0].name, "_fbp");
        assert!(cookie.items[0].active);
    }

    #[test]
    fn reports_entry_without_technical_name() {
        let err = ImportPayload::from_json(
            r#"{"categories":[{"technicalName":"essential"},{"position":2}]}"#,
        )
        .unwrap_err();

        match err {
            ImportError::Validation { entry, message } => {
                assert_eq!(entry, "categories[1]");
                assert!(message.contains("technicalName"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn reports_non_object_translations() {
        let err = ImportPayload::from_json(
            r#"{"cookies":[{"technicalName":"ga","translations":"Google Analytics"}]}"#,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            ImportError::Validation { ref entry, .. } if entry == "cookies[0] (ga)"
        ));
    }

    #[test]
    fn rejects_invalid_json() {
        let err = ImportPayload::from_json("{categories:").unwrap_err();
        assert!(matches!(err, ImportError::InvalidJson(_)));
    }

    #[test]
    fn rejects_duplicate_technical_names() {
        let err = ImportPayload::from_json(
            r#"{"cookies":[{"technicalName":"ga"},{"technicalName":"matomo"},{"technicalName":"ga"}]}"#,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            ImportError::Validation { ref entry, .. } if entry == "cookies[2] (ga)"
        ));
    }

    #[test]
    fn apply_to_keeps_locales_absent_from_import() {
        let imported = ImportPayload::from_json(
            r#"{"categories":[{"technicalName":"analytics","position":4,
                "translations":{"de":{"name":"Statistik"}}}]}"#,
        )
        .unwrap()
        .categories
        .remove(0);

        let de = Locale::new("de").unwrap();
        let en = Locale::new("en").unwrap();
        let mut category = Category {
            id: crate::domain::types::CategoryId::new(1).unwrap(),
            technical_name: imported.technical_name.clone(),
            enabled: true,
            read_only: true,
            position: 0,
            active: true,
            translations: Translations::new(),
        };
        category.translations.replace(
            de.clone(),
            CategoryTranslation {
                name: Some("Alt".into()),
                description: Some("Alte Beschreibung".into()),
            },
        );
        category.translations.replace(
            en.clone(),
            CategoryTranslation {
                name: Some("Analytics".into()),
                description: None,
            },
        );

        imported.apply_to(&mut category);

        assert_eq!(category.position, 4);
        assert!(!category.enabled);
        let german = category.translations.get(&de).unwrap();
        assert_eq!(german.name.as_deref(), Some("Statistik"));
        assert_eq!(german.description, None);
        assert_eq!(category.name(&en), Some("Analytics"));
    }
}
