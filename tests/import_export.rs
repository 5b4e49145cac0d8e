use sulu_cookie_consent::domain::types::{Locale, TechnicalName};
use sulu_cookie_consent::forms::import_export::ImportPayload;
use sulu_cookie_consent::repository::{
    CategoryListQuery, CategoryReader, CookieListQuery, CookieReader,
};
use sulu_cookie_consent::services::import_export::{export_taxonomy, import_taxonomy};

mod common;

const DEFAULT_DATASET: &str = include_str!("../resources/default-cookies.json");

const MARKETING: &str = r#"{
    "categories": [
        {"technicalName": "marketing", "position": 3,
         "translations": {"de": {"name": "Marketing"}, "en": {"name": "Marketing"}}}
    ],
    "cookies": [
        {"technicalName": "facebook-pixel", "categoryTechnicalName": "marketing",
         "provider": "Meta", "processingLocation": "worldwide",
         "translations": {"de": {"name": "Facebook Pixel"}},
         "cookieItems": [
            {"name": "_fbp", "lifetime": "3 Monate"},
            {"name": "fr", "lifetime": "3 Monate", "position": 1}
         ]}
    ]
}"#;

fn payload(json: &str) -> ImportPayload {
    ImportPayload::from_json(json).expect("document should validate")
}

#[test]
fn import_creates_records_and_skips_them_on_rerun() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let first = import_taxonomy(&payload(MARKETING), false, &repo).expect("import should run");
    assert_eq!(first.stats.categories_created, 1);
    assert_eq!(first.stats.cookies_created, 1);
    assert_eq!(first.stats.cookie_items_created, 2);

    let cookie = repo
        .get_cookie_by_technical_name(&TechnicalName::new("facebook-pixel").unwrap())
        .expect("should load cookie")
        .expect("cookie should be imported");
    let category = repo
        .get_category_by_id(cookie.category_id)
        .expect("should load category")
        .expect("category should exist");
    assert_eq!(category.technical_name, "marketing");
    assert_eq!(cookie.items.len(), 2);

    let second = import_taxonomy(&payload(MARKETING), false, &repo).expect("import should run");
    assert_eq!(second.stats.categories_skipped, 1);
    assert_eq!(second.stats.cookies_skipped, 1);
    assert_eq!(second.stats.categories_created, 0);
    assert_eq!(second.stats.cookies_created, 0);
}

#[test]
fn forced_import_is_idempotent() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();
    import_taxonomy(&payload(DEFAULT_DATASET), false, &repo).expect("import should run");
    let before = export_taxonomy(&repo).expect("export should run");

    let report =
        import_taxonomy(&payload(DEFAULT_DATASET), true, &repo).expect("import should run");
    let after = export_taxonomy(&repo).expect("export should run");

    assert_eq!(report.stats.categories_created, 0);
    assert_eq!(report.stats.cookies_created, 0);
    assert_eq!(report.stats.cookie_items_created, 0);
    assert_eq!(report.stats.categories_updated, before.categories.len());
    assert_eq!(before.categories, after.categories);
    assert_eq!(before.cookies, after.cookies);
}

#[test]
fn forced_import_replaces_listed_locales_only() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();
    import_taxonomy(&payload(MARKETING), false, &repo).expect("import should run");

    let update = r#"{"categories":[{"technicalName":"marketing","position":3,
        "translations":{"de":{"name":"Werbung"}}}]}"#;
    import_taxonomy(&payload(update), true, &repo).expect("import should run");

    let category = repo
        .get_category_by_technical_name(&TechnicalName::new("marketing").unwrap())
        .expect("should load category")
        .expect("category should exist");
    assert_eq!(category.name(&Locale::new("de").unwrap()), Some("Werbung"));
    assert_eq!(category.name(&Locale::new("en").unwrap()), Some("Marketing"));
}

#[test]
fn export_then_import_reproduces_the_store() {
    let source_db = common::TestDb::new();
    let source = source_db.repo();
    import_taxonomy(&payload(DEFAULT_DATASET), false, &source).expect("import should run");
    let exported = export_taxonomy(&source).expect("export should run");
    let json = serde_json::to_string(&exported).expect("export should serialize");

    let target_db = common::TestDb::new();
    let target = target_db.repo();
    import_taxonomy(&payload(&json), false, &target).expect("import should run");
    let reexported = export_taxonomy(&target).expect("export should run");

    assert_eq!(exported.categories, reexported.categories);
    assert_eq!(exported.cookies, reexported.cookies);
}

#[test]
fn cookies_resolve_categories_created_by_the_same_document() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let report =
        import_taxonomy(&payload(DEFAULT_DATASET), false, &repo).expect("import should run");

    let categories = repo
        .list_categories(CategoryListQuery::new())
        .expect("should list categories");
    let cookies = repo
        .list_cookies(CookieListQuery::new())
        .expect("should list cookies");
    assert_eq!(categories.len(), report.stats.categories_created);
    assert_eq!(cookies.len(), report.stats.cookies_created);
    assert_eq!(report.stats.cookies_skipped, 0);
}

#[test]
fn invalid_entry_aborts_before_any_write() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let json = r#"{"categories":[{"technicalName":"essential"},{"technicalName":"essential"}]}"#;
    assert!(ImportPayload::from_json(json).is_err());

    let categories = repo
        .list_categories(CategoryListQuery::new())
        .expect("should list categories");
    assert!(categories.is_empty());
}
