//! Locale-scoped translation records.
//!
//! Every localized read or write names its locale explicitly. Reads never
//! create a translation; writes go through [`Translations::ensure`], which
//! creates an all-`None` record for a locale the first time it is written.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::types::Locale;

/// Text fields of one translation record, addressable by a field selector.
pub trait TranslationFields: Default {
    /// Selector for the localized fields of this record.
    type Field: Copy;

    /// Value of `field`, if set.
    fn field(&self, field: Self::Field) -> Option<&str>;

    /// Overwrite `field` with `value`.
    fn set_field(&mut self, field: Self::Field, value: Option<String>);
}

/// Translation records of one entity keyed by locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Translations<T>(BTreeMap<Locale, T>);

impl<T> Default for Translations<T> {
    fn default() -> Self {
        Self(BTreeMap::new())
    }
}

impl<T: TranslationFields> Translations<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Translation for `locale`, if one was ever written.
    pub fn get(&self, locale: &Locale) -> Option<&T> {
        self.0.get(locale)
    }

    /// Find-or-create the translation for `locale`.
    pub fn ensure(&mut self, locale: &Locale) -> &mut T {
        self.0.entry(locale.clone()).or_default()
    }

    /// Value of `field` in the `locale` translation, `None` when absent.
    pub fn localized(&self, locale: &Locale, field: T::Field) -> Option<&str> {
        self.get(locale).and_then(|translation| translation.field(field))
    }

    /// Write `field` for `locale`, creating the translation on first write.
    pub fn set_localized(&mut self, locale: &Locale, field: T::Field, value: Option<String>) {
        self.ensure(locale).set_field(field, value);
    }

    /// Replace the whole translation for `locale`.
    pub fn replace(&mut self, locale: Locale, translation: T) {
        self.0.insert(locale, translation);
    }

    pub fn contains(&self, locale: &Locale) -> bool {
        self.0.contains_key(locale)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Locale, &T)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T> FromIterator<(Locale, T)> for Translations<T> {
    fn from_iter<I: IntoIterator<Item = (Locale, T)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<T> IntoIterator for Translations<T> {
    type Item = (Locale, T);
    type IntoIter = std::collections::btree_map::IntoIter<Locale, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
