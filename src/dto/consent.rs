//! Public consent document read by the banner script.

use serde::Serialize;

use crate::domain::category::Category;
use crate::domain::cookie::{Cookie, CookieField, CookieItem};
use crate::domain::types::Locale;
use crate::models::config::BannerSettings;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicCategoryDto {
    pub id: i32,
    pub technical_name: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub enabled: bool,
    pub read_only: bool,
    pub position: i32,
}

impl PublicCategoryDto {
    pub fn new(category: &Category, locale: &Locale) -> Self {
        Self {
            id: category.id.get(),
            technical_name: category.technical_name.to_string(),
            name: category.name(locale).map(str::to_string),
            description: category.description(locale).map(str::to_string),
            enabled: category.enabled,
            read_only: category.read_only,
            position: category.position,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicCookieItemDto {
    pub name: String,
    pub lifetime: Option<String>,
    pub description: Option<String>,
}

impl PublicCookieItemDto {
    pub fn new(item: &CookieItem, locale: &Locale) -> Self {
        Self {
            name: item.name.to_string(),
            lifetime: item.lifetime.clone(),
            description: item.description(locale).map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicCookieDto {
    pub id: i32,
    pub category_id: i32,
    pub category_technical_name: String,
    pub technical_name: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub provider: Option<String>,
    pub script_url: Option<String>,
    pub legal_basis: &'static str,
    pub processing_location: &'static str,
    pub privacy_policy_url: Option<String>,
    pub data_collected: Option<String>,
    pub data_purpose: Option<String>,
    pub cookie_items: Vec<PublicCookieItemDto>,
}

impl PublicCookieDto {
    /// Only active items are listed.
    pub fn new(cookie: &Cookie, category_technical_name: &str, locale: &Locale) -> Self {
        let text = |field| cookie.localized(locale, field).map(str::to_string);

        Self {
            id: cookie.id.get(),
            category_id: cookie.category_id.get(),
            category_technical_name: category_technical_name.to_string(),
            technical_name: cookie.technical_name.to_string(),
            name: text(CookieField::Name),
            description: text(CookieField::Description),
            provider: cookie.provider.clone(),
            script_url: cookie.script_url.clone(),
            legal_basis: cookie.legal_basis.as_str(),
            processing_location: cookie.processing_location.as_str(),
            privacy_policy_url: text(CookieField::PrivacyPolicyUrl),
            data_collected: text(CookieField::DataCollected),
            data_purpose: text(CookieField::DataPurpose),
            cookie_items: cookie
                .active_items()
                .map(|item| PublicCookieItemDto::new(item, locale))
                .collect(),
        }
    }
}

/// The `{config, categories, cookies, revision}` document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsentConfigDto {
    pub config: BannerSettings,
    pub categories: Vec<PublicCategoryDto>,
    pub cookies: Vec<PublicCookieDto>,
    pub revision: String,
}
