use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::cookie::{Cookie, CookieItemPatch, ItemSync, NewCookie};
use crate::domain::types::{
    CategoryId, CookieItemId, CookieItemName, LegalBasis, Locale, ProcessingLocation,
    TechnicalName, TypeConstraintError,
};
use crate::forms::categories::normalize_text;

/// One entry of the `cookieItems` array.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CookieItemForm {
    pub id: Option<i32>,
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 255))]
    pub lifetime: Option<String>,
    pub position: Option<i32>,
    pub active: Option<bool>,
    pub description: Option<String>,
}

/// JSON body accepted by the cookie admin endpoints.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CookieForm {
    #[validate(range(min = 1))]
    pub category: Option<i32>,
    #[validate(length(min = 1, max = 100))]
    pub technical_name: Option<String>,
    #[validate(length(max = 255))]
    pub provider: Option<String>,
    pub script_url: Option<String>,
    pub legal_basis: Option<String>,
    pub processing_location: Option<String>,
    pub position: Option<i32>,
    pub active: Option<bool>,
    #[validate(length(max = 255))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub privacy_policy_url: Option<String>,
    pub data_collected: Option<String>,
    pub data_purpose: Option<String>,
    pub cookie_items: Option<Vec<CookieItemForm>>,
}

/// Localized cookie texts submitted for the request locale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CookieTextsPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub privacy_policy_url: Option<String>,
    pub data_collected: Option<String>,
    pub data_purpose: Option<String>,
}

impl CookieTextsPatch {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.privacy_policy_url.is_none()
            && self.data_collected.is_none()
            && self.data_purpose.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CookieFormPayload {
    pub category_id: Option<CategoryId>,
    pub technical_name: Option<TechnicalName>,
    pub provider: Option<String>,
    pub script_url: Option<String>,
    pub legal_basis: Option<LegalBasis>,
    pub processing_location: Option<ProcessingLocation>,
    pub position: Option<i32>,
    pub active: Option<bool>,
    pub texts: CookieTextsPatch,
    /// `None` leaves items untouched, `Some` reconciles them.
    pub items: Option<Vec<CookieItemPatch>>,
}

#[derive(Debug, Error)]
pub enum CookieFormError {
    #[error("Cookie form validation failed: {0}")]
    Validation(String),
    #[error("Cookie form contains invalid data: {0}")]
    TypeConstraint(String),
    #[error("Cookie form is missing `{0}`")]
    MissingField(&'static str),
}

impl From<ValidationErrors> for CookieFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for CookieFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<CookieItemForm> for CookieItemPatch {
    type Error = CookieFormError;

    fn try_from(value: CookieItemForm) -> Result<Self, Self::Error> {
        value.validate()?;

        Ok(Self {
            id: value.id.map(CookieItemId::new).transpose()?,
            name: value.name.map(CookieItemName::new).transpose()?,
            lifetime: value.lifetime,
            position: value.position,
            active: value.active,
            description: value.description,
        })
    }
}

impl TryFrom<CookieForm> for CookieFormPayload {
    type Error = CookieFormError;

    fn try_from(value: CookieForm) -> Result<Self, Self::Error> {
        value.validate()?;

        let items = value
            .cookie_items
            .map(|items| {
                items
                    .into_iter()
                    .map(CookieItemPatch::try_from)
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;

        Ok(Self {
            category_id: value.category.map(CategoryId::new).transpose()?,
            technical_name: value.technical_name.map(TechnicalName::new).transpose()?,
            provider: value.provider,
            script_url: value.script_url,
            legal_basis: value.legal_basis.map(LegalBasis::try_from).transpose()?,
            processing_location: value
                .processing_location
                .map(ProcessingLocation::try_from)
                .transpose()?,
            position: value.position,
            active: value.active,
            texts: CookieTextsPatch {
                name: value.name,
                description: value.description,
                privacy_policy_url: value.privacy_policy_url,
                data_collected: value.data_collected,
                data_purpose: value.data_purpose,
            },
            items,
        })
    }
}

impl CookieFormPayload {
    /// Build a new cookie, writing localized fields to `locale`.
    pub fn into_new_cookie(self, locale: &Locale) -> Result<NewCookie, CookieFormError> {
        let category_id = self
            .category_id
            .ok_or(CookieFormError::MissingField("category"))?;
        let technical_name = self
            .technical_name
            .clone()
            .ok_or(CookieFormError::MissingField("technicalName"))?;

        let mut cookie = NewCookie::new(category_id, technical_name);
        cookie.provider = self.provider.and_then(normalize_text);
        cookie.script_url = self.script_url.and_then(normalize_text);
        if let Some(legal_basis) = self.legal_basis {
            cookie.legal_basis = legal_basis;
        }
        if let Some(processing_location) = self.processing_location {
            cookie.processing_location = processing_location;
        }
        if let Some(position) = self.position {
            cookie.position = position;
        }
        if let Some(active) = self.active {
            cookie.active = active;
        }
        if !self.texts.is_empty() {
            let translation = cookie.translations.ensure(locale);
            translation.name = self.texts.name.and_then(normalize_text);
            translation.description = self.texts.description.and_then(normalize_text);
            translation.privacy_policy_url = self.texts.privacy_policy_url.and_then(normalize_text);
            translation.data_collected = self.texts.data_collected.and_then(normalize_text);
            translation.data_purpose = self.texts.data_purpose.and_then(normalize_text);
        }
        for patch in self.items.unwrap_or_default() {
            cookie.items.push(patch.into_item(locale)?);
        }
        cookie.items.sort_by_key(|item| item.position);
        Ok(cookie)
    }

    /// Patch `cookie` with the supplied fields and reconcile its items when an
    /// item list was submitted.
    pub fn apply_to(
        self,
        cookie: &mut Cookie,
        locale: &Locale,
    ) -> Result<Option<ItemSync>, CookieFormError> {
        // Item reconciliation runs first so a rejected list leaves the cookie untouched.
        let sync = match self.items {
            Some(items) => Some(cookie.sync_items(locale, items)?),
            None => None,
        };

        if let Some(category_id) = self.category_id {
            cookie.category_id = category_id;
        }
        if let Some(technical_name) = self.technical_name {
            cookie.technical_name = technical_name;
        }
        if let Some(provider) = self.provider {
            cookie.provider = normalize_text(provider);
        }
        if let Some(script_url) = self.script_url {
            cookie.script_url = normalize_text(script_url);
        }
        if let Some(legal_basis) = self.legal_basis {
            cookie.legal_basis = legal_basis;
        }
        if let Some(processing_location) = self.processing_location {
            cookie.processing_location = processing_location;
        }
        if let Some(position) = self.position {
            cookie.position = position;
        }
        if let Some(active) = self.active {
            cookie.active = active;
        }

        if !self.texts.is_empty() {
            let texts = self.texts;
            let translation = cookie.translations.ensure(locale);
            if let Some(name) = texts.name {
                translation.name = normalize_text(name);
            }
            if let Some(description) = texts.description {
                translation.description = normalize_text(description);
            }
            if let Some(url) = texts.privacy_policy_url {
                translation.privacy_policy_url = normalize_text(url);
            }
            if let Some(data_collected) = texts.data_collected {
                translation.data_collected = normalize_text(data_collected);
            }
            if let Some(data_purpose) = texts.data_purpose {
                translation.data_purpose = normalize_text(data_purpose);
            }
        }

        Ok(sync)
    }
}
