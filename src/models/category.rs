use diesel::prelude::*;

use crate::domain::category::{
    Category as DomainCategory, CategoryTranslation as DomainCategoryTranslation,
    NewCategory as DomainNewCategory,
};
use crate::domain::translation::Translations;
use crate::domain::types::{Locale, TechnicalName, TypeConstraintError};

/// Diesel model representing the `cookie_categories` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::cookie_categories)]
pub struct Category {
    pub id: i32,
    pub technical_name: String,
    pub enabled: bool,
    pub read_only: bool,
    pub position: i32,
    pub active: bool,
}

/// Insertable/patchable form of [`Category`].
#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::cookie_categories)]
pub struct NewCategory<'a> {
    pub technical_name: &'a str,
    pub enabled: bool,
    pub read_only: bool,
    pub position: i32,
    pub active: bool,
}

/// Diesel model representing a row in `cookie_category_translations`.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(belongs_to(Category, foreign_key = category_id))]
#[diesel(table_name = crate::schema::cookie_category_translations)]
pub struct CategoryTranslation {
    pub id: i32,
    pub category_id: i32,
    pub locale: String,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Upsert form of [`CategoryTranslation`]; `None` overwrites with `NULL`.
#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::cookie_category_translations)]
#[diesel(treat_none_as_null = true)]
pub struct NewCategoryTranslation<'a> {
    pub category_id: i32,
    pub locale: &'a str,
    pub name: Option<&'a str>,
    pub description: Option<&'a str>,
}

impl TryFrom<(Category, Vec<CategoryTranslation>)> for DomainCategory {
    type Error = TypeConstraintError;

    fn try_from(
        (category, translations): (Category, Vec<CategoryTranslation>),
    ) -> Result<Self, Self::Error> {
        let translations = translations
            .into_iter()
            .map(|t| -> Result<_, TypeConstraintError> {
                Ok((
                    Locale::new(t.locale)?,
                    DomainCategoryTranslation {
                        name: t.name,
                        description: t.description,
                    },
                ))
            })
            .collect::<Result<Translations<_>, _>>()?;

        Ok(Self {
            id: category.id.try_into()?,
            technical_name: TechnicalName::new(category.technical_name)?,
            enabled: category.enabled,
            read_only: category.read_only,
            position: category.position,
            active: category.active,
            translations,
        })
    }
}

impl<'a> From<&'a DomainNewCategory> for NewCategory<'a> {
    fn from(category: &'a DomainNewCategory) -> Self {
        Self {
            technical_name: category.technical_name.as_str(),
            enabled: category.enabled,
            read_only: category.read_only,
            position: category.position,
            active: category.active,
        }
    }
}

impl<'a> From<&'a DomainCategory> for NewCategory<'a> {
    fn from(category: &'a DomainCategory) -> Self {
        Self {
            technical_name: category.technical_name.as_str(),
            enabled: category.enabled,
            read_only: category.read_only,
            position: category.position,
            active: category.active,
        }
    }
}

impl<'a> NewCategoryTranslation<'a> {
    pub fn new(
        category_id: i32,
        locale: &'a Locale,
        translation: &'a DomainCategoryTranslation,
    ) -> Self {
        Self {
            category_id,
            locale: locale.as_str(),
            name: translation.name.as_deref(),
            description: translation.description.as_deref(),
        }
    }
}
