use diesel::prelude::*;

use crate::domain::cookie::{
    Cookie as DomainCookie, CookieItem as DomainCookieItem,
    CookieItemTranslation as DomainCookieItemTranslation,
    CookieTranslation as DomainCookieTranslation, NewCookie as DomainNewCookie,
};
use crate::domain::translation::Translations;
use crate::domain::types::{
    CookieItemName, LegalBasis, Locale, ProcessingLocation, TechnicalName, TypeConstraintError,
};

/// Diesel model representing the `cookies` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::cookies)]
pub struct Cookie {
    pub id: i32,
    pub category_id: i32,
    pub technical_name: String,
    pub provider: Option<String>,
    pub script_url: Option<String>,
    pub legal_basis: String,
    pub processing_location: String,
    pub position: i32,
    pub active: bool,
}

/// Insertable/patchable form of [`Cookie`]; `None` overwrites with `NULL`.
#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::cookies)]
#[diesel(treat_none_as_null = true)]
pub struct NewCookie<'a> {
    pub category_id: i32,
    pub technical_name: &'a str,
    pub provider: Option<&'a str>,
    pub script_url: Option<&'a str>,
    pub legal_basis: &'static str,
    pub processing_location: &'static str,
    pub position: i32,
    pub active: bool,
}

/// Diesel model representing a row in `cookie_translations`.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(belongs_to(Cookie, foreign_key = cookie_id))]
#[diesel(table_name = crate::schema::cookie_translations)]
pub struct CookieTranslation {
    pub id: i32,
    pub cookie_id: i32,
    pub locale: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub privacy_policy_url: Option<String>,
    pub data_collected: Option<String>,
    pub data_purpose: Option<String>,
}

/// Upsert form of [`CookieTranslation`].
#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::cookie_translations)]
#[diesel(treat_none_as_null = true)]
pub struct NewCookieTranslation<'a> {
    pub cookie_id: i32,
    pub locale: &'a str,
    pub name: Option<&'a str>,
    pub description: Option<&'a str>,
    pub privacy_policy_url: Option<&'a str>,
    pub data_collected: Option<&'a str>,
    pub data_purpose: Option<&'a str>,
}

/// Diesel model representing the `cookie_items` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(belongs_to(Cookie, foreign_key = cookie_id))]
#[diesel(table_name = crate::schema::cookie_items)]
pub struct CookieItem {
    pub id: i32,
    pub cookie_id: i32,
    pub name: String,
    pub lifetime: Option<String>,
    pub position: i32,
    pub active: bool,
}

/// Insertable/patchable form of [`CookieItem`].
#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::cookie_items)]
#[diesel(treat_none_as_null = true)]
pub struct NewCookieItem<'a> {
    pub cookie_id: i32,
    pub name: &'a str,
    pub lifetime: Option<&'a str>,
    pub position: i32,
    pub active: bool,
}

/// Diesel model representing a row in `cookie_item_translations`.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(belongs_to(CookieItem, foreign_key = cookie_item_id))]
#[diesel(table_name = crate::schema::cookie_item_translations)]
pub struct CookieItemTranslation {
    pub id: i32,
    pub cookie_item_id: i32,
    pub locale: String,
    pub description: Option<String>,
}

/// Upsert form of [`CookieItemTranslation`].
#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::cookie_item_translations)]
#[diesel(treat_none_as_null = true)]
pub struct NewCookieItemTranslation<'a> {
    pub cookie_item_id: i32,
    pub locale: &'a str,
    pub description: Option<&'a str>,
}

impl TryFrom<(CookieItem, Vec<CookieItemTranslation>)> for DomainCookieItem {
    type Error = TypeConstraintError;

    fn try_from(
        (item, translations): (CookieItem, Vec<CookieItemTranslation>),
    ) -> Result<Self, Self::Error> {
        let translations = translations
            .into_iter()
            .map(|t| -> Result<_, TypeConstraintError> {
                Ok((
                    Locale::new(t.locale)?,
                    DomainCookieItemTranslation {
                        description: t.description,
                    },
                ))
            })
            .collect::<Result<Translations<_>, _>>()?;

        Ok(Self {
            id: Some(item.id.try_into()?),
            name: CookieItemName::new(item.name)?,
            lifetime: item.lifetime,
            position: item.position,
            active: item.active,
            translations,
        })
    }
}

impl TryFrom<(Cookie, Vec<CookieTranslation>, Vec<DomainCookieItem>)> for DomainCookie {
    type Error = TypeConstraintError;

    fn try_from(
        (cookie, translations, items): (Cookie, Vec<CookieTranslation>, Vec<DomainCookieItem>),
    ) -> Result<Self, Self::Error> {
        let translations = translations
            .into_iter()
            .map(|t| -> Result<_, TypeConstraintError> {
                Ok((
                    Locale::new(t.locale)?,
                    DomainCookieTranslation {
                        name: t.name,
                        description: t.description,
                        privacy_policy_url: t.privacy_policy_url,
                        data_collected: t.data_collected,
                        data_purpose: t.data_purpose,
                    },
                ))
            })
            .collect::<Result<Translations<_>, _>>()?;

        Ok(Self {
            id: cookie.id.try_into()?,
            category_id: cookie.category_id.try_into()?,
            technical_name: TechnicalName::new(cookie.technical_name)?,
            provider: cookie.provider,
            script_url: cookie.script_url,
            legal_basis: LegalBasis::try_from(cookie.legal_basis)?,
            processing_location: ProcessingLocation::try_from(cookie.processing_location)?,
            position: cookie.position,
            active: cookie.active,
            translations,
            items,
        })
    }
}

impl<'a> From<&'a DomainNewCookie> for NewCookie<'a> {
    fn from(cookie: &'a DomainNewCookie) -> Self {
        Self {
            category_id: cookie.category_id.get(),
            technical_name: cookie.technical_name.as_str(),
            provider: cookie.provider.as_deref(),
            script_url: cookie.script_url.as_deref(),
            legal_basis: cookie.legal_basis.as_str(),
            processing_location: cookie.processing_location.as_str(),
            position: cookie.position,
            active: cookie.active,
        }
    }
}

impl<'a> From<&'a DomainCookie> for NewCookie<'a> {
    fn from(cookie: &'a DomainCookie) -> Self {
        Self {
            category_id: cookie.category_id.get(),
            technical_name: cookie.technical_name.as_str(),
            provider: cookie.provider.as_deref(),
            script_url: cookie.script_url.as_deref(),
            legal_basis: cookie.legal_basis.as_str(),
            processing_location: cookie.processing_location.as_str(),
            position: cookie.position,
            active: cookie.active,
        }
    }
}

impl<'a> NewCookieTranslation<'a> {
    pub fn new(cookie_id: i32, locale: &'a Locale, translation: &'a DomainCookieTranslation) -> Self {
        Self {
            cookie_id,
            locale: locale.as_str(),
            name: translation.name.as_deref(),
            description: translation.description.as_deref(),
            privacy_policy_url: translation.privacy_policy_url.as_deref(),
            data_collected: translation.data_collected.as_deref(),
            data_purpose: translation.data_purpose.as_deref(),
        }
    }
}

impl<'a> NewCookieItem<'a> {
    pub fn new(cookie_id: i32, item: &'a DomainCookieItem) -> Self {
        Self {
            cookie_id,
            name: item.name.as_str(),
            lifetime: item.lifetime.as_deref(),
            position: item.position,
            active: item.active,
        }
    }
}

impl<'a> NewCookieItemTranslation<'a> {
    pub fn new(
        cookie_item_id: i32,
        locale: &'a Locale,
        translation: &'a DomainCookieItemTranslation,
    ) -> Self {
        Self {
            cookie_item_id,
            locale: locale.as_str(),
            description: translation.description.as_deref(),
        }
    }
}
