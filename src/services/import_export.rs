//! Bulk import and export of the cookie taxonomy.

use std::collections::HashMap;

use chrono::Local;
use serde::Serialize;

use crate::domain::cookie::MergeOutcome;
use crate::domain::types::{CategoryId, TechnicalName};
use crate::dto::transfer::{
    CategoryRecord, CookieRecord, DOCUMENT_VERSION, ExportDocument, TransferDocument,
};
use crate::forms::import_export::ImportPayload;
use crate::repository::{
    CategoryListQuery, CategoryReader, CategoryWrite, CookieListQuery, CookieReader, CookieWrite,
    TaxonomyBatchWriter,
};

use super::{ServiceError, ServiceResult};

/// Layout of the informational `exportDate` field.
pub const EXPORT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Per-entity counts reported after an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportStats {
    pub categories_created: usize,
    pub categories_updated: usize,
    pub categories_skipped: usize,
    pub cookies_created: usize,
    pub cookies_updated: usize,
    pub cookies_skipped: usize,
    pub cookie_items_created: usize,
    pub cookie_items_updated: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Category,
    Cookie,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportAction {
    Created,
    Updated,
    Skipped,
}

impl ImportAction {
    /// Short tag printed by the import command.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Created => "[NEW]",
            Self::Updated => "[UPD]",
            Self::Skipped => "[SKIP]",
        }
    }
}

/// What happened to one entry of the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportEntry {
    pub kind: EntryKind,
    pub technical_name: String,
    pub action: ImportAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub stats: ImportStats,
    pub entries: Vec<ImportEntry>,
}

impl ImportReport {
    fn record(&mut self, kind: EntryKind, technical_name: &TechnicalName, action: ImportAction) {
        self.record_with_note(kind, technical_name, action, None);
    }

    fn record_with_note(
        &mut self,
        kind: EntryKind,
        technical_name: &TechnicalName,
        action: ImportAction,
        note: Option<String>,
    ) {
        let stats = &mut self.stats;
        let counter = match (kind, action) {
            (EntryKind::Category, ImportAction::Created) => &mut stats.categories_created,
            (EntryKind::Category, ImportAction::Updated) => &mut stats.categories_updated,
            (EntryKind::Category, ImportAction::Skipped) => &mut stats.categories_skipped,
            (EntryKind::Cookie, ImportAction::Created) => &mut stats.cookies_created,
            (EntryKind::Cookie, ImportAction::Updated) => &mut stats.cookies_updated,
            (EntryKind::Cookie, ImportAction::Skipped) => &mut stats.cookies_skipped,
        };
        *counter += 1;
        self.entries.push(ImportEntry {
            kind,
            technical_name: technical_name.to_string(),
            action,
            note,
        });
    }

    fn record_items(&mut self, outcomes: &[MergeOutcome]) {
        for outcome in outcomes {
            match outcome {
                MergeOutcome::Created => self.stats.cookie_items_created += 1,
                MergeOutcome::Updated => self.stats.cookie_items_updated += 1,
            }
        }
    }
}

/// Resolves category technical names against the store, caching lookups.
struct CategoryResolver<'a, R> {
    repo: &'a R,
    cache: HashMap<TechnicalName, Option<CategoryId>>,
}

impl<'a, R: CategoryReader> CategoryResolver<'a, R> {
    fn new(repo: &'a R) -> Self {
        Self {
            repo,
            cache: HashMap::new(),
        }
    }

    fn resolve(&mut self, technical_name: &TechnicalName) -> ServiceResult<Option<CategoryId>> {
        if let Some(id) = self.cache.get(technical_name) {
            return Ok(*id);
        }
        let id = self
            .repo
            .get_category_by_technical_name(technical_name)
            .map_err(|e| ServiceError::from_repository("look up category", e))?
            .map(|category| category.id);
        self.cache.insert(technical_name.clone(), id);
        Ok(id)
    }
}

/// Merge a validated document into the store.
///
/// Records are matched by technical name. Missing ones are created; existing
/// ones are skipped unless `force` is set, in which case their fields and the
/// imported locales are overwritten. Items are matched by name and never
/// deleted. Categories are committed before cookies are planned, so cookies
/// resolve `categoryTechnicalName` against stored categories.
pub fn import_taxonomy<R>(
    payload: &ImportPayload,
    force: bool,
    repo: &R,
) -> ServiceResult<ImportReport>
where
    R: CategoryReader + CookieReader + TaxonomyBatchWriter,
{
    let mut report = ImportReport::default();

    let mut category_writes = Vec::with_capacity(payload.categories.len());
    for imported in &payload.categories {
        let existing = repo
            .get_category_by_technical_name(&imported.technical_name)
            .map_err(|e| ServiceError::from_repository("look up category", e))?;

        match existing {
            None => {
                category_writes.push(CategoryWrite::Create(imported.to_new_category()));
                report.record(
                    EntryKind::Category,
                    &imported.technical_name,
                    ImportAction::Created,
                );
            }
            Some(_) if !force => {
                report.record(
                    EntryKind::Category,
                    &imported.technical_name,
                    ImportAction::Skipped,
                );
            }
            Some(mut category) => {
                imported.apply_to(&mut category);
                category_writes.push(CategoryWrite::Update(category));
                report.record(
                    EntryKind::Category,
                    &imported.technical_name,
                    ImportAction::Updated,
                );
            }
        }
    }

    if !category_writes.is_empty() {
        repo.write_categories(&category_writes)
            .map_err(|e| ServiceError::from_repository("import categories", e))?;
    }

    let mut categories = CategoryResolver::new(repo);
    let mut cookie_writes = Vec::with_capacity(payload.cookies.len());
    for imported in &payload.cookies {
        let category_id = match &imported.category_technical_name {
            Some(name) => {
                let id = categories.resolve(name)?;
                if id.is_none() {
                    log::warn!(
                        "Cookie `{}` references unknown category `{name}`",
                        imported.technical_name
                    );
                }
                id
            }
            None => None,
        };

        let existing = repo
            .get_cookie_by_technical_name(&imported.technical_name)
            .map_err(|e| ServiceError::from_repository("look up cookie", e))?;

        match (existing, category_id) {
            (None, None) => {
                report.record_with_note(
                    EntryKind::Cookie,
                    &imported.technical_name,
                    ImportAction::Skipped,
                    Some("category not found".to_string()),
                );
            }
            (None, Some(category_id)) => {
                let (cookie, outcomes) = imported.to_new_cookie(category_id);
                report.record_items(&outcomes);
                cookie_writes.push(CookieWrite::Create(cookie));
                report.record(
                    EntryKind::Cookie,
                    &imported.technical_name,
                    ImportAction::Created,
                );
            }
            (Some(_), _) if !force => {
                report.record(
                    EntryKind::Cookie,
                    &imported.technical_name,
                    ImportAction::Skipped,
                );
            }
            (Some(mut cookie), category_id) => {
                let outcomes = imported.apply_to(&mut cookie, category_id);
                report.record_items(&outcomes);
                cookie_writes.push(CookieWrite::Update(cookie));
                report.record(
                    EntryKind::Cookie,
                    &imported.technical_name,
                    ImportAction::Updated,
                );
            }
        }
    }

    if !cookie_writes.is_empty() {
        repo.write_cookies(&cookie_writes)
            .map_err(|e| ServiceError::from_repository("import cookies", e))?;
    }

    let stats = &report.stats;
    log::info!(
        "Import finished: categories {}/{}/{} cookies {}/{}/{} (created/updated/skipped), items {}/{} (created/updated)",
        stats.categories_created,
        stats.categories_updated,
        stats.categories_skipped,
        stats.cookies_created,
        stats.cookies_updated,
        stats.cookies_skipped,
        stats.cookie_items_created,
        stats.cookie_items_updated,
    );

    Ok(report)
}

/// Serialize the whole taxonomy, inactive records included.
pub fn export_taxonomy<R>(repo: &R) -> ServiceResult<ExportDocument>
where
    R: CategoryReader + CookieReader,
{
    let categories = match repo.list_categories(CategoryListQuery::new()) {
        Ok(categories) => categories,
        Err(e) => {
            log::error!("Failed to list categories: {e}");
            return Err(ServiceError::Internal);
        }
    };
    let cookies = match repo.list_cookies(CookieListQuery::new()) {
        Ok(cookies) => cookies,
        Err(e) => {
            log::error!("Failed to list cookies: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let technical_names: HashMap<CategoryId, String> = categories
        .iter()
        .map(|category| (category.id, category.technical_name.to_string()))
        .collect();

    Ok(TransferDocument {
        version: DOCUMENT_VERSION.to_string(),
        export_date: Some(Local::now().format(EXPORT_DATE_FORMAT).to_string()),
        categories: categories.iter().map(CategoryRecord::from).collect(),
        cookies: cookies
            .iter()
            .map(|cookie| {
                CookieRecord::new(cookie, technical_names.get(&cookie.category_id).cloned())
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cookie::CookieItemField;
    use crate::domain::types::Locale;
    use crate::repository::test::TestRepository;

    const MARKETING: &str = r#"{
        "version": "1.0.0",
        "categories": [
            {"technicalName": "marketing", "enabled": false, "position": 1,
             "translations": {"de": {"name": "Marketing"}}}
        ],
        "cookies": [
            {"technicalName": "facebook-pixel", "categoryTechnicalName": "marketing",
             "provider": "Meta", "processingLocation": "usa",
             "translations": {"de": {"name": "Facebook Pixel"}},
             "cookieItems": [
                {"name": "_fbp", "lifetime": "3 Monate", "translations": {"de": {"description": "Besucher-ID"}}},
                {"name": "fr", "lifetime": "3 Monate", "position": 1}
             ]}
        ]
    }"#;

    fn payload(json: &str) -> ImportPayload {
        ImportPayload::from_json(json).unwrap()
    }

    #[test]
    fn import_creates_then_skips() {
        let repo = TestRepository::default();

        let first = import_taxonomy(&payload(MARKETING), false, &repo).unwrap();
        assert_eq!(first.stats.categories_created, 1);
        assert_eq!(first.stats.categories_skipped, 0);
        assert_eq!(first.stats.cookies_created, 1);
        assert_eq!(first.stats.cookie_items_created, 2);

        let second = import_taxonomy(&payload(MARKETING), false, &repo).unwrap();
        assert_eq!(second.stats.categories_created, 0);
        assert_eq!(second.stats.categories_skipped, 1);
        assert_eq!(second.stats.cookies_skipped, 1);
        assert_eq!(second.entries[0].action.tag(), "[SKIP]");
    }

    #[test]
    fn forced_import_overwrites_and_keeps_unlisted_items() {
        let repo = TestRepository::default();
        import_taxonomy(&payload(MARKETING), false, &repo).unwrap();

        let update = r#"{"cookies":[{"technicalName":"facebook-pixel","categoryTechnicalName":"marketing",
            "cookieItems":[{"name":"_fbp","lifetime":"90 Tage"}]}]}"#;
        let report = import_taxonomy(&payload(update), true, &repo).unwrap();

        assert_eq!(report.stats.cookies_updated, 1);
        assert_eq!(report.stats.cookie_items_updated, 1);
        let cookie = repo.cookies().remove(0);
        assert_eq!(cookie.provider, None);
        assert_eq!(cookie.items.len(), 2);
        let fbp = cookie.items.iter().find(|i| i.name == "_fbp").unwrap();
        assert_eq!(fbp.lifetime.as_deref(), Some("90 Tage"));
        // Item translations for German were not in the update and survive.
        assert_eq!(
            fbp.translations
                .localized(&Locale::new("de").unwrap(), CookieItemField::Description),
            Some("Besucher-ID")
        );
    }

    #[test]
    fn new_cookie_with_unknown_category_is_skipped() {
        let repo = TestRepository::default();
        let json = r#"{"cookies":[{"technicalName":"hotjar","categoryTechnicalName":"missing"}]}"#;

        let report = import_taxonomy(&payload(json), true, &repo).unwrap();

        assert_eq!(report.stats.cookies_skipped, 1);
        assert_eq!(
            report.entries[0].note.as_deref(),
            Some("category not found")
        );
        assert!(repo.cookies().is_empty());
    }

    #[test]
    fn unknown_category_leaves_existing_cookie_in_place() {
        let repo = TestRepository::default();
        import_taxonomy(&payload(MARKETING), false, &repo).unwrap();
        let category_id = repo.categories()[0].id;

        let json = r#"{"cookies":[{"technicalName":"facebook-pixel","categoryTechnicalName":"gone","position":4}]}"#;
        import_taxonomy(&payload(json), true, &repo).unwrap();

        let cookie = repo.cookies().remove(0);
        assert_eq!(cookie.category_id, category_id);
        assert_eq!(cookie.position, 4);
    }

    #[test]
    fn export_names_categories_by_technical_name() {
        let repo = TestRepository::default();
        import_taxonomy(&payload(MARKETING), false, &repo).unwrap();

        let document = export_taxonomy(&repo).unwrap();

        assert_eq!(document.version, DOCUMENT_VERSION);
        let export_date = document.export_date.as_deref().unwrap();
        assert!(chrono::NaiveDateTime::parse_from_str(export_date, EXPORT_DATE_FORMAT).is_ok());
        assert_eq!(
            document.cookies[0].category_technical_name.as_deref(),
            Some("marketing")
        );
        let json = serde_json::to_value(&document).unwrap();
        assert!(json["categories"][0].get("id").is_none());
        assert_eq!(json["cookies"][0]["cookieItems"][0]["name"], "_fbp");
    }

    #[test]
    fn export_round_trips_through_import() {
        let source = TestRepository::default();
        import_taxonomy(&payload(MARKETING), false, &source).unwrap();
        let exported = serde_json::to_string(&export_taxonomy(&source).unwrap()).unwrap();

        let target = TestRepository::default();
        import_taxonomy(&payload(&exported), false, &target).unwrap();

        let exported_again = export_taxonomy(&target).unwrap();
        let first = export_taxonomy(&source).unwrap();
        assert_eq!(first.categories, exported_again.categories);
        assert_eq!(first.cookies, exported_again.cookies);
    }
}
