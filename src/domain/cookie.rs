use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::translation::{TranslationFields, Translations};
use crate::domain::types::{
    CategoryId, CookieId, CookieItemId, CookieItemName, LegalBasis, Locale, ProcessingLocation,
    TechnicalName, TypeConstraintError,
};

/// Localized texts of a [`Cookie`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieTranslation {
    pub name: Option<String>,
    pub description: Option<String>,
    pub privacy_policy_url: Option<String>,
    pub data_collected: Option<String>,
    pub data_purpose: Option<String>,
}

/// Localized fields of a [`Cookie`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookieField {
    Name,
    Description,
    PrivacyPolicyUrl,
    DataCollected,
    DataPurpose,
}

impl TranslationFields for CookieTranslation {
    type Field = CookieField;

    fn field(&self, field: CookieField) -> Option<&str> {
        match field {
            CookieField::Name => self.name.as_deref(),
            CookieField::Description => self.description.as_deref(),
            CookieField::PrivacyPolicyUrl => self.privacy_policy_url.as_deref(),
            CookieField::DataCollected => self.data_collected.as_deref(),
            CookieField::DataPurpose => self.data_purpose.as_deref(),
        }
    }

    fn set_field(&mut self, field: CookieField, value: Option<String>) {
        match field {
            CookieField::Name => self.name = value,
            CookieField::Description => self.description = value,
            CookieField::PrivacyPolicyUrl => self.privacy_policy_url = value,
            CookieField::DataCollected => self.data_collected = value,
            CookieField::DataPurpose => self.data_purpose = value,
        }
    }
}

/// Localized texts of a [`CookieItem`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieItemTranslation {
    pub description: Option<String>,
}

/// Localized fields of a [`CookieItem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookieItemField {
    Description,
}

impl TranslationFields for CookieItemTranslation {
    type Field = CookieItemField;

    fn field(&self, field: CookieItemField) -> Option<&str> {
        match field {
            CookieItemField::Description => self.description.as_deref(),
        }
    }

    fn set_field(&mut self, field: CookieItemField, value: Option<String>) {
        match field {
            CookieItemField::Description => self.description = value,
        }
    }
}

/// One concrete cookie or storage key set by a [`Cookie`] service.
///
/// `id` stays `None` until the owning cookie is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CookieItem {
    pub id: Option<CookieItemId>,
    pub name: CookieItemName,
    pub lifetime: Option<String>,
    pub position: i32,
    pub active: bool,
    pub translations: Translations<CookieItemTranslation>,
}

impl CookieItem {
    pub fn new(name: CookieItemName) -> Self {
        Self {
            id: None,
            name,
            lifetime: None,
            position: 0,
            active: true,
            translations: Translations::new(),
        }
    }

    pub fn description(&self, locale: &Locale) -> Option<&str> {
        self.translations
            .localized(locale, CookieItemField::Description)
    }

    /// Overwrite every field from `draft`, replacing the translations of the
    /// locales it carries and keeping all others.
    fn overwrite_with(&mut self, draft: CookieItemDraft) {
        self.lifetime = draft.lifetime;
        self.position = draft.position;
        self.active = draft.active;
        for (locale, translation) in draft.translations {
            self.translations.replace(locale, translation);
        }
    }
}

/// Complete description of a cookie item as carried by an import document.
#[derive(Debug, Clone, PartialEq)]
pub struct CookieItemDraft {
    pub name: CookieItemName,
    pub lifetime: Option<String>,
    pub position: i32,
    pub active: bool,
    pub translations: Translations<CookieItemTranslation>,
}

/// Partial update of a cookie item as sent by the admin form.
///
/// Items carrying the `id` of an attached item update it; all others are
/// created. Unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CookieItemPatch {
    pub id: Option<CookieItemId>,
    pub name: Option<CookieItemName>,
    pub lifetime: Option<String>,
    pub position: Option<i32>,
    pub active: Option<bool>,
    pub description: Option<String>,
}

impl CookieItemPatch {
    /// Build a detached item from the patch; a name is required.
    pub fn into_item(self, locale: &Locale) -> Result<CookieItem, TypeConstraintError> {
        let name = self
            .name
            .clone()
            .ok_or(TypeConstraintError::EmptyString("cookie item name"))?;
        let mut item = CookieItem::new(name);
        self.apply_to(&mut item, locale);
        Ok(item)
    }

    fn apply_to(self, item: &mut CookieItem, locale: &Locale) {
        if let Some(name) = self.name {
            item.name = name;
        }
        if let Some(lifetime) = self.lifetime {
            item.lifetime = Some(lifetime);
        }
        if let Some(position) = self.position {
            item.position = position;
        }
        if let Some(active) = self.active {
            item.active = active;
        }
        if let Some(description) = self.description {
            item.translations
                .set_localized(locale, CookieItemField::Description, Some(description));
        }
    }
}

/// Whether a merge created a new record or overwrote an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Created,
    Updated,
}

/// Counts produced by [`Cookie::sync_items`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemSync {
    pub created: usize,
    pub updated: usize,
    pub removed: usize,
}

fn upsert_item(items: &mut Vec<CookieItem>, draft: CookieItemDraft) -> MergeOutcome {
    match items.iter_mut().find(|item| item.name == draft.name) {
        Some(item) => {
            item.overwrite_with(draft);
            MergeOutcome::Updated
        }
        None => {
            let mut item = CookieItem::new(draft.name.clone());
            item.overwrite_with(draft);
            items.push(item);
            MergeOutcome::Created
        }
    }
}

fn sort_items(items: &mut [CookieItem]) {
    items.sort_by_key(|item| item.position);
}

/// A tracked first- or third-party service belonging to one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cookie {
    pub id: CookieId,
    pub category_id: CategoryId,
    pub technical_name: TechnicalName,
    pub provider: Option<String>,
    pub script_url: Option<String>,
    pub legal_basis: LegalBasis,
    pub processing_location: ProcessingLocation,
    pub position: i32,
    pub active: bool,
    pub translations: Translations<CookieTranslation>,
    /// Items ordered by `position`.
    pub items: Vec<CookieItem>,
}

impl Cookie {
    pub fn name(&self, locale: &Locale) -> Option<&str> {
        self.translations.localized(locale, CookieField::Name)
    }

    pub fn localized(&self, locale: &Locale, field: CookieField) -> Option<&str> {
        self.translations.localized(locale, field)
    }

    /// Items visible to visitors.
    pub fn active_items(&self) -> impl Iterator<Item = &CookieItem> {
        self.items.iter().filter(|item| item.active)
    }

    pub fn add_item(&mut self, item: CookieItem) {
        self.items.push(item);
        sort_items(&mut self.items);
    }

    pub fn remove_item(&mut self, id: CookieItemId) -> Option<CookieItem> {
        let index = self.items.iter().position(|item| item.id == Some(id))?;
        Some(self.items.remove(index))
    }

    /// Find the item by name and overwrite it, or append a new one.
    pub fn upsert_item(&mut self, draft: CookieItemDraft) -> MergeOutcome {
        let outcome = upsert_item(&mut self.items, draft);
        sort_items(&mut self.items);
        outcome
    }

    /// Reconcile the attached items with the list submitted by the admin form.
    ///
    /// Patches naming an attached item update it, the rest become new items
    /// and attached items missing from `incoming` are removed. Nothing is
    /// changed when a new item lacks a name or an id appears twice.
    pub fn sync_items(
        &mut self,
        locale: &Locale,
        incoming: Vec<CookieItemPatch>,
    ) -> Result<ItemSync, TypeConstraintError> {
        let is_attached = |patch: &CookieItemPatch| {
            patch
                .id
                .is_some_and(|id| self.items.iter().any(|item| item.id == Some(id)))
        };
        if incoming
            .iter()
            .any(|patch| !is_attached(patch) && patch.name.is_none())
        {
            return Err(TypeConstraintError::EmptyString("cookie item name"));
        }
        let mut seen = HashSet::new();
        if let Some(id) = incoming
            .iter()
            .filter_map(|patch| patch.id)
            .find(|id| !seen.insert(*id))
        {
            return Err(TypeConstraintError::InvalidValue(format!(
                "cookie item {id} submitted more than once"
            )));
        }

        let mut remaining = std::mem::take(&mut self.items);
        let mut synced = Vec::with_capacity(incoming.len());
        let mut summary = ItemSync::default();

        for patch in incoming {
            let attached = patch
                .id
                .and_then(|id| remaining.iter().position(|item| item.id == Some(id)));
            match attached {
                Some(index) => {
                    let mut item = remaining.remove(index);
                    patch.apply_to(&mut item, locale);
                    synced.push(item);
                    summary.updated += 1;
                }
                None => {
                    synced.push(patch.into_item(locale)?);
                    summary.created += 1;
                }
            }
        }

        summary.removed = remaining.len();
        self.items = synced;
        sort_items(&mut self.items);
        Ok(summary)
    }
}

/// Data required to insert a new [`Cookie`] together with its items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCookie {
    pub category_id: CategoryId,
    pub technical_name: TechnicalName,
    pub provider: Option<String>,
    pub script_url: Option<String>,
    pub legal_basis: LegalBasis,
    pub processing_location: ProcessingLocation,
    pub position: i32,
    pub active: bool,
    pub translations: Translations<CookieTranslation>,
    pub items: Vec<CookieItem>,
}

impl NewCookie {
    /// A new, active cookie with default legal basis and location.
    pub fn new(category_id: CategoryId, technical_name: TechnicalName) -> Self {
        Self {
            category_id,
            technical_name,
            provider: None,
            script_url: None,
            legal_basis: LegalBasis::default(),
            processing_location: ProcessingLocation::default(),
            position: 0,
            active: true,
            translations: Translations::new(),
            items: Vec::new(),
        }
    }

    /// Find the item by name and overwrite it, or append a new one.
    pub fn upsert_item(&mut self, draft: CookieItemDraft) -> MergeOutcome {
        let outcome = upsert_item(&mut self.items, draft);
        sort_items(&mut self.items);
        outcome
    }
}
