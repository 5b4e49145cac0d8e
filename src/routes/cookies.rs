use actix_web::{HttpResponse, Responder, delete, get, post, put, web};
use serde::Deserialize;

use crate::domain::types::{CategoryId, CookieId, Locale};
use crate::forms::cookies::{CookieForm, CookieFormPayload};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{LocaleQuery, error_body, service_error_response};
use crate::services::cookies::{
    create_cookie as create_cookie_service, delete_cookie as delete_cookie_service,
    get_cookie as get_cookie_service, list_cookies as list_cookies_service,
    update_cookie as update_cookie_service,
};

#[derive(Debug, Deserialize)]
pub struct CookieListParams {
    pub locale: Option<String>,
    pub category: Option<i32>,
}

fn cookie_id(raw: i32) -> Result<CookieId, HttpResponse> {
    CookieId::new(raw).map_err(|_| HttpResponse::NotFound().finish())
}

fn path_and_locale(
    raw_id: i32,
    query: &LocaleQuery,
    server_config: &ServerConfig,
) -> Result<(CookieId, Locale), HttpResponse> {
    Ok((cookie_id(raw_id)?, query.resolve(server_config)?))
}

#[get("/admin/api/cookies")]
pub async fn list_cookies(
    params: web::Query<CookieListParams>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let params = params.into_inner();
    let locale = match (LocaleQuery {
        locale: params.locale,
    })
    .resolve(&server_config)
    {
        Ok(locale) => locale,
        Err(response) => return response,
    };
    let category_id = match params.category.map(CategoryId::new).transpose() {
        Ok(category_id) => category_id,
        Err(e) => return error_body(HttpResponse::UnprocessableEntity(), e),
    };

    match list_cookies_service(category_id, &locale, repo.get_ref()) {
        Ok(cookies) => HttpResponse::Ok().json(cookies),
        Err(err) => service_error_response(err),
    }
}

#[get("/admin/api/cookies/{id}")]
pub async fn get_cookie(
    path: web::Path<i32>,
    query: web::Query<LocaleQuery>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let (id, locale) = match path_and_locale(path.into_inner(), &query, &server_config) {
        Ok(resolved) => resolved,
        Err(response) => return response,
    };

    match get_cookie_service(id, &locale, repo.get_ref()) {
        Ok(cookie) => HttpResponse::Ok().json(cookie),
        Err(err) => service_error_response(err),
    }
}

#[post("/admin/api/cookies")]
pub async fn create_cookie(
    query: web::Query<LocaleQuery>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    web::Json(form): web::Json<CookieForm>,
) -> impl Responder {
    let locale = match query.resolve(&server_config) {
        Ok(locale) => locale,
        Err(response) => return response,
    };
    let payload: CookieFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_body(HttpResponse::UnprocessableEntity(), e),
    };

    match create_cookie_service(payload, &locale, repo.get_ref()) {
        Ok(cookie) => HttpResponse::Created().json(cookie),
        Err(err) => service_error_response(err),
    }
}

#[put("/admin/api/cookies/{id}")]
pub async fn update_cookie(
    path: web::Path<i32>,
    query: web::Query<LocaleQuery>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    web::Json(form): web::Json<CookieForm>,
) -> impl Responder {
    let (id, locale) = match path_and_locale(path.into_inner(), &query, &server_config) {
        Ok(resolved) => resolved,
        Err(response) => return response,
    };
    let payload: CookieFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_body(HttpResponse::UnprocessableEntity(), e),
    };

    match update_cookie_service(id, payload, &locale, repo.get_ref()) {
        Ok(cookie) => HttpResponse::Ok().json(cookie),
        Err(err) => service_error_response(err),
    }
}

#[delete("/admin/api/cookies/{id}")]
pub async fn delete_cookie(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let id = match cookie_id(path.into_inner()) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match delete_cookie_service(id, repo.get_ref()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => service_error_response(err),
    }
}
