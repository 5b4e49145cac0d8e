use serde::Serialize;

use crate::domain::category::Category;
use crate::domain::cookie::{Cookie, CookieField, CookieItem};
use crate::domain::types::Locale;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieItemDto {
    pub id: Option<i32>,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub name: String,
    pub lifetime: Option<String>,
    pub position: i32,
    pub active: bool,
    pub description: Option<String>,
}

impl CookieItemDto {
    pub fn new(item: &CookieItem, locale: &Locale) -> Self {
        Self {
            id: item.id.map(|id| id.get()),
            kind: "cookie_item",
            name: item.name.to_string(),
            lifetime: item.lifetime.clone(),
            position: item.position,
            active: item.active,
            description: item.description(locale).map(str::to_string),
        }
    }
}

/// Admin view of a cookie with texts resolved for one locale.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieDto {
    pub id: i32,
    pub locale: String,
    pub category: i32,
    pub category_name: Option<String>,
    pub technical_name: String,
    pub provider: Option<String>,
    pub script_url: Option<String>,
    pub legal_basis: &'static str,
    pub processing_location: &'static str,
    pub position: i32,
    pub active: bool,
    pub name: Option<String>,
    pub description: Option<String>,
    pub privacy_policy_url: Option<String>,
    pub data_collected: Option<String>,
    pub data_purpose: Option<String>,
    pub cookie_items: Vec<CookieItemDto>,
}

impl CookieDto {
    /// `category` is the owning category when it could be loaded.
    pub fn new(cookie: &Cookie, category: Option<&Category>, locale: &Locale) -> Self {
        let text = |field| cookie.localized(locale, field).map(str::to_string);

        Self {
            id: cookie.id.get(),
            locale: locale.to_string(),
            category: cookie.category_id.get(),
            category_name: category
                .and_then(|category| category.name(locale))
                .map(str::to_string),
            technical_name: cookie.technical_name.to_string(),
            provider: cookie.provider.clone(),
            script_url: cookie.script_url.clone(),
            legal_basis: cookie.legal_basis.as_str(),
            processing_location: cookie.processing_location.as_str(),
            position: cookie.position,
            active: cookie.active,
            name: text(CookieField::Name),
            description: text(CookieField::Description),
            privacy_policy_url: text(CookieField::PrivacyPolicyUrl),
            data_collected: text(CookieField::DataCollected),
            data_purpose: text(CookieField::DataPurpose),
            cookie_items: cookie
                .items
                .iter()
                .map(|item| CookieItemDto::new(item, locale))
                .collect(),
        }
    }
}
