//! Portable import/export document.
//!
//! The same records are produced by the exporter and consumed by the importer,
//! so `import(export(store))` reproduces the store. Ids are never included.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::category::{Category, CategoryTranslation};
use crate::domain::cookie::{Cookie, CookieItem, CookieItemTranslation, CookieTranslation};
use crate::domain::translation::{TranslationFields, Translations};

pub const DOCUMENT_VERSION: &str = "1.0.0";

fn default_version() -> String {
    DOCUMENT_VERSION.to_string()
}

/// Top-level document. Entries stay raw JSON so a malformed record can be
/// reported by position instead of failing the whole parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferDocument<C = serde_json::Value, K = serde_json::Value> {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_date: Option<String>,
    #[serde(default = "Vec::new")]
    pub categories: Vec<C>,
    #[serde(default = "Vec::new")]
    pub cookies: Vec<K>,
}

/// Document as written by the exporter.
pub type ExportDocument = TransferDocument<CategoryRecord, CookieRecord>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTranslationRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRecord {
    #[serde(default)]
    pub technical_name: Option<String>,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub read_only: Option<bool>,
    #[serde(default)]
    pub position: Option<i32>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub translations: BTreeMap<String, CategoryTranslationRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieTranslationRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub privacy_policy_url: Option<String>,
    #[serde(default)]
    pub data_collected: Option<String>,
    #[serde(default)]
    pub data_purpose: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieItemTranslationRecord {
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieItemRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub lifetime: Option<String>,
    #[serde(default)]
    pub position: Option<i32>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub translations: BTreeMap<String, CookieItemTranslationRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieRecord {
    #[serde(default)]
    pub technical_name: Option<String>,
    #[serde(default)]
    pub category_technical_name: Option<String>,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub script_url: Option<String>,
    #[serde(default)]
    pub legal_basis: Option<String>,
    #[serde(default)]
    pub processing_location: Option<String>,
    #[serde(default)]
    pub position: Option<i32>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub translations: BTreeMap<String, CookieTranslationRecord>,
    #[serde(default)]
    pub cookie_items: Vec<CookieItemRecord>,
}

fn export_translations<T, R>(translations: &Translations<T>) -> BTreeMap<String, R>
where
    T: TranslationFields,
    R: for<'a> From<&'a T>,
{
    translations
        .iter()
        .map(|(locale, translation)| (locale.to_string(), R::from(translation)))
        .collect()
}

impl From<&CategoryTranslation> for CategoryTranslationRecord {
    fn from(value: &CategoryTranslation) -> Self {
        Self {
            name: value.name.clone(),
            description: value.description.clone(),
        }
    }
}

impl From<&Category> for CategoryRecord {
    fn from(value: &Category) -> Self {
        Self {
            technical_name: Some(value.technical_name.to_string()),
            enabled: Some(value.enabled),
            read_only: Some(value.read_only),
            position: Some(value.position),
            active: Some(value.active),
            translations: export_translations(&value.translations),
        }
    }
}

impl From<&CookieTranslation> for CookieTranslationRecord {
    fn from(value: &CookieTranslation) -> Self {
        Self {
            name: value.name.clone(),
            description: value.description.clone(),
            privacy_policy_url: value.privacy_policy_url.clone(),
            data_collected: value.data_collected.clone(),
            data_purpose: value.data_purpose.clone(),
        }
    }
}

impl From<&CookieItemTranslation> for CookieItemTranslationRecord {
    fn from(value: &CookieItemTranslation) -> Self {
        Self {
            description: value.description.clone(),
        }
    }
}

impl From<&CookieItem> for CookieItemRecord {
    fn from(value: &CookieItem) -> Self {
        Self {
            name: Some(value.name.to_string()),
            lifetime: value.lifetime.clone(),
            position: Some(value.position),
            active: Some(value.active),
            translations: export_translations(&value.translations),
        }
    }
}

impl CookieRecord {
    /// Export record of `cookie`, naming its category by technical name.
    pub fn new(cookie: &Cookie, category_technical_name: Option<String>) -> Self {
        Self {
            technical_name: Some(cookie.technical_name.to_string()),
            category_technical_name,
            provider: cookie.provider.clone(),
            script_url: cookie.script_url.clone(),
            legal_basis: Some(cookie.legal_basis.to_string()),
            processing_location: Some(cookie.processing_location.to_string()),
            position: Some(cookie.position),
            active: Some(cookie.active),
            translations: export_translations(&cookie.translations),
            cookie_items: cookie.items.iter().map(CookieItemRecord::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{
        CategoryId, CookieId, CookieItemName, LegalBasis, Locale, ProcessingLocation,
        TechnicalName,
    };

    #[test]
    fn records_carry_every_locale_without_ids() {
        let de = Locale::new("de").unwrap();
        let en = Locale::new("en").unwrap();

        let mut item = CookieItem::new(CookieItemName::new("_ga").unwrap());
        item.translations.ensure(&de).description = Some("Besucher".into());
        let mut cookie = Cookie {
            id: CookieId::new(3).unwrap(),
            category_id: CategoryId::new(1).unwrap(),
            technical_name: TechnicalName::new("ga").unwrap(),
            provider: Some("Google".into()),
            script_url: None,
            legal_basis: LegalBasis::Consent,
            processing_location: ProcessingLocation::Usa,
            position: 1,
            active: true,
            translations: Translations::new(),
            items: vec![item],
        };
        cookie.translations.ensure(&de).name = Some("Google Analytics".into());
        cookie.translations.ensure(&en).data_purpose = Some("Statistics".into());

        let record = CookieRecord::new(&cookie, Some("analytics".into()));

        assert_eq!(record.translations.len(), 2);
        assert_eq!(
            record.translations["de"].name.as_deref(),
            Some("Google Analytics")
        );
        assert_eq!(
            record.translations["en"].data_purpose.as_deref(),
            Some("Statistics")
        );
        assert_eq!(
            record.cookie_items[0].translations["de"].description.as_deref(),
            Some("Besucher")
        );
        assert_eq!(record.legal_basis.as_deref(), Some("consent"));

        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["categoryTechnicalName"], "analytics");
    }

    #[test]
    fn category_record_exports_translations() {
        let de = Locale::new("de").unwrap();
        let mut category = Category {
            id: CategoryId::new(1).unwrap(),
            technical_name: TechnicalName::new("essential").unwrap(),
            enabled: true,
            read_only: true,
            position: 0,
            active: true,
            translations: Translations::new(),
        };
        category.translations.ensure(&de).name = Some("Notwendig".into());

        let record = CategoryRecord::from(&category);

        assert_eq!(record.technical_name.as_deref(), Some("essential"));
        assert_eq!(record.read_only, Some(true));
        assert_eq!(
            record.translations["de"],
            CategoryTranslationRecord {
                name: Some("Notwendig".into()),
                description: None,
            }
        );
    }
}
