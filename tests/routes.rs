use actix_web::http::StatusCode;
use actix_web::http::header::{CACHE_CONTROL, CONTENT_DISPOSITION};
use actix_web::{App, test, web};
use serde_json::{Value, json};
use sulu_cookie_consent::models::config::{BannerSettings, ServerConfig};
use sulu_cookie_consent::routes::categories::{
    create_category, delete_category, get_category, list_categories, update_category,
};
use sulu_cookie_consent::routes::consent::consent_config;
use sulu_cookie_consent::routes::cookies::{
    create_cookie, delete_cookie, get_cookie, list_cookies, update_cookie,
};
use sulu_cookie_consent::routes::import_export::{
    EXPORT_FILE_NAME, export_taxonomy, import_taxonomy,
};

mod common;

const ANALYTICS: &str = r#"{
    "categories": [
        {"technicalName": "analytics", "position": 2,
         "translations": {"de": {"name": "Statistik"}}}
    ],
    "cookies": []
}"#;

fn server_config() -> ServerConfig {
    ServerConfig {
        database_url: ":memory:".to_string(),
        bind_address: "127.0.0.1".to_string(),
        port: 8080,
        default_locale: "de".to_string(),
        banner: BannerSettings::default(),
    }
}

fn register(test_db: &common::TestDb) -> impl FnOnce(&mut web::ServiceConfig) {
    let repo = web::Data::new(test_db.repo());
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(repo)
            .app_data(web::Data::new(server_config()))
            .service(consent_config)
            .service(list_categories)
            .service(get_category)
            .service(create_category)
            .service(update_category)
            .service(delete_category)
            .service(list_cookies)
            .service(get_cookie)
            .service(create_cookie)
            .service(update_cookie)
            .service(delete_cookie)
            .service(export_taxonomy)
            .service(import_taxonomy);
    }
}

#[actix_web::test]
async fn public_config_is_cacheable_for_five_minutes() {
    let test_db = common::TestDb::new();
    let app = test::init_service(App::new().configure(register(&test_db))).await;

    let req = test::TestRequest::get()
        .uri("/cookie-consent/config?locale=en")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let cache_control = resp
        .headers()
        .get(CACHE_CONTROL)
        .and_then(|value| value.to_str().ok())
        .unwrap()
        .to_string();
    assert!(cache_control.contains("public"));
    assert!(cache_control.contains("max-age=300"));
}

#[actix_web::test]
async fn unknown_category_id_is_not_found() {
    let test_db = common::TestDb::new();
    let app = test::init_service(App::new().configure(register(&test_db))).await;

    let req = test::TestRequest::get()
        .uri("/admin/api/cookie-categories/42")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri("/admin/api/cookie-categories/0")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn duplicate_category_is_a_conflict() {
    let test_db = common::TestDb::new();
    let app = test::init_service(App::new().configure(register(&test_db))).await;
    let body = json!({"technicalName": "technical", "name": "Technisch"});

    let req = test::TestRequest::post()
        .uri("/admin/api/cookie-categories")
        .set_json(&body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["technicalName"], "technical");
    assert_eq!(created["name"], "Technisch");

    let req = test::TestRequest::post()
        .uri("/admin/api/cookie-categories")
        .set_json(&body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn cookie_with_unknown_category_or_bad_locale_is_unprocessable() {
    let test_db = common::TestDb::new();
    let app = test::init_service(App::new().configure(register(&test_db))).await;
    let body = json!({"category": 99, "technicalName": "ga", "name": "Google Analytics"});

    let req = test::TestRequest::post()
        .uri("/admin/api/cookies")
        .set_json(&body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let req = test::TestRequest::get()
        .uri("/admin/api/cookies?locale=not-a-real-locale")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn import_rejects_malformed_json() {
    let test_db = common::TestDb::new();
    let app = test::init_service(App::new().configure(register(&test_db))).await;

    let req = test::TestRequest::post()
        .uri("/admin/api/cookie-consent/import")
        .set_payload("{\"categories\": [")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn import_overwrites_existing_records_by_default() {
    let test_db = common::TestDb::new();
    let app = test::init_service(App::new().configure(register(&test_db))).await;

    let req = test::TestRequest::post()
        .uri("/admin/api/cookie-consent/import?force=false")
        .set_payload(ANALYTICS)
        .to_request();
    let first: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(first["success"], true);
    assert_eq!(first["stats"]["categoriesCreated"], 1);

    let renamed = ANALYTICS.replace("Statistik", "Analyse");
    let req = test::TestRequest::post()
        .uri("/admin/api/cookie-consent/import")
        .set_payload(renamed)
        .to_request();
    let second: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(second["stats"]["categoriesUpdated"], 1);

    let req = test::TestRequest::get()
        .uri("/admin/api/cookie-categories?locale=de")
        .to_request();
    let categories: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(categories[0]["name"], "Analyse");
}

#[actix_web::test]
async fn export_is_served_as_attachment() {
    let test_db = common::TestDb::new();
    let app = test::init_service(App::new().configure(register(&test_db))).await;

    let req = test::TestRequest::post()
        .uri("/admin/api/cookie-consent/import")
        .set_payload(ANALYTICS)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/admin/api/cookie-consent/export")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let disposition = resp
        .headers()
        .get(CONTENT_DISPOSITION)
        .and_then(|value| value.to_str().ok())
        .unwrap()
        .to_string();
    assert!(disposition.contains("attachment"));
    assert!(disposition.contains(EXPORT_FILE_NAME));

    let document: Value = test::read_body_json(resp).await;
    assert_eq!(document["categories"][0]["technicalName"], "analytics");
}
