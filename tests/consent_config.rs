use sulu_cookie_consent::domain::types::{Locale, TechnicalName};
use sulu_cookie_consent::forms::import_export::ImportPayload;
use sulu_cookie_consent::models::config::BannerSettings;
use sulu_cookie_consent::repository::{CookieReader, CookieWriter, DieselRepository};
use sulu_cookie_consent::services::consent_config::get_full_config;
use sulu_cookie_consent::services::import_export::import_taxonomy;

mod common;

const DEFAULT_DATASET: &str = include_str!("../resources/default-cookies.json");

fn seeded_repo(test_db: &common::TestDb) -> DieselRepository {
    let repo = test_db.repo();
    let payload = ImportPayload::from_json(DEFAULT_DATASET).expect("dataset should validate");
    import_taxonomy(&payload, false, &repo).expect("import should run");
    repo
}

fn revision(repo: &DieselRepository) -> String {
    get_full_config(
        &Locale::new("de").unwrap(),
        &BannerSettings::default(),
        repo,
    )
    .expect("config should assemble")
    .revision
}

#[test]
fn public_config_lists_active_records_in_locale() {
    let test_db = common::TestDb::new();
    let repo = seeded_repo(&test_db);

    let config = get_full_config(
        &Locale::new("en").unwrap(),
        &BannerSettings::default(),
        &repo,
    )
    .expect("config should assemble");

    let categories: Vec<&str> = config
        .categories
        .iter()
        .map(|c| c.technical_name.as_str())
        .collect();
    assert_eq!(
        categories,
        vec!["essential", "functional", "analytics", "marketing"]
    );
    assert_eq!(config.categories[0].name.as_deref(), Some("Essential"));
    assert_eq!(config.revision.len(), 8);
    assert!(config.revision.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn revision_is_stable_between_reads() {
    let test_db = common::TestDb::new();
    let repo = seeded_repo(&test_db);

    assert_eq!(revision(&repo), revision(&repo));
}

#[test]
fn revision_follows_only_visible_changes() {
    let test_db = common::TestDb::new();
    let repo = seeded_repo(&test_db);
    let pixel_name = TechnicalName::new("facebook-pixel").unwrap();

    let initial = revision(&repo);

    let mut pixel = repo
        .get_cookie_by_technical_name(&pixel_name)
        .expect("should load cookie")
        .expect("cookie should exist");
    pixel.active = false;
    repo.update_cookie(&pixel).expect("should deactivate cookie");
    let hidden = revision(&repo);
    assert_ne!(initial, hidden);

    let mut pixel = repo
        .get_cookie_by_technical_name(&pixel_name)
        .expect("should load cookie")
        .expect("cookie should exist");
    pixel.provider = Some("Meta Platforms".to_string());
    pixel.items[0].lifetime = Some("90 days".to_string());
    repo.update_cookie(&pixel).expect("should update cookie");
    assert_eq!(hidden, revision(&repo));
}
