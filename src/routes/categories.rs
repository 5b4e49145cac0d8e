use actix_web::{HttpResponse, Responder, delete, get, post, put, web};

use crate::domain::types::CategoryId;
use crate::forms::categories::{CategoryForm, CategoryFormPayload};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{LocaleQuery, error_body, service_error_response};
use crate::services::categories::{
    create_category as create_category_service, delete_category as delete_category_service,
    get_category as get_category_service, list_categories as list_categories_service,
    update_category as update_category_service,
};

fn category_id(raw: i32) -> Result<CategoryId, HttpResponse> {
    CategoryId::new(raw).map_err(|_| HttpResponse::NotFound().finish())
}

#[get("/admin/api/cookie-categories")]
pub async fn list_categories(
    query: web::Query<LocaleQuery>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let locale = match query.resolve(&server_config) {
        Ok(locale) => locale,
        Err(response) => return response,
    };

    match list_categories_service(&locale, repo.get_ref()) {
        Ok(categories) => HttpResponse::Ok().json(categories),
        Err(err) => service_error_response(err),
    }
}

#[get("/admin/api/cookie-categories/{id}")]
pub async fn get_category(
    path: web::Path<i32>,
    query: web::Query<LocaleQuery>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let (id, locale) = match (category_id(path.into_inner()), query.resolve(&server_config)) {
        (Ok(id), Ok(locale)) => (id, locale),
        (Err(response), _) | (_, Err(response)) => return response,
    };

    match get_category_service(id, &locale, repo.get_ref()) {
        Ok(category) => HttpResponse::Ok().json(category),
        Err(err) => service_error_response(err),
    }
}

#[post("/admin/api/cookie-categories")]
pub async fn create_category(
    query: web::Query<LocaleQuery>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    web::Json(form): web::Json<CategoryForm>,
) -> impl Responder {
    let locale = match query.resolve(&server_config) {
        Ok(locale) => locale,
        Err(response) => return response,
    };
    let payload: CategoryFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_body(HttpResponse::UnprocessableEntity(), e),
    };

    match create_category_service(payload, &locale, repo.get_ref()) {
        Ok(category) => HttpResponse::Created().json(category),
        Err(err) => service_error_response(err),
    }
}

#[put("/admin/api/cookie-categories/{id}")]
pub async fn update_category(
    path: web::Path<i32>,
    query: web::Query<LocaleQuery>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    web::Json(form): web::Json<CategoryForm>,
) -> impl Responder {
    let (id, locale) = match (category_id(path.into_inner()), query.resolve(&server_config)) {
        (Ok(id), Ok(locale)) => (id, locale),
        (Err(response), _) | (_, Err(response)) => return response,
    };
    let payload: CategoryFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_body(HttpResponse::UnprocessableEntity(), e),
    };

    match update_category_service(id, payload, &locale, repo.get_ref()) {
        Ok(category) => HttpResponse::Ok().json(category),
        Err(err) => service_error_response(err),
    }
}

#[delete("/admin/api/cookie-categories/{id}")]
pub async fn delete_category(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let id = match category_id(path.into_inner()) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match delete_category_service(id, repo.get_ref()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => service_error_response(err),
    }
}
