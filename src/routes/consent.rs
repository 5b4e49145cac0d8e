use actix_web::http::header::{CacheControl, CacheDirective};
use actix_web::{HttpResponse, Responder, get, web};

use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{LocaleQuery, service_error_response};
use crate::services::consent_config::get_full_config;

/// Seconds the public document may be cached.
pub const CONFIG_MAX_AGE: u32 = 300;

#[get("/cookie-consent/config")]
pub async fn consent_config(
    query: web::Query<LocaleQuery>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let locale = match query.resolve(&server_config) {
        Ok(locale) => locale,
        Err(response) => return response,
    };

    match get_full_config(&locale, &server_config.banner, repo.get_ref()) {
        Ok(config) => HttpResponse::Ok()
            .insert_header(CacheControl(vec![
                CacheDirective::Public,
                CacheDirective::MaxAge(CONFIG_MAX_AGE),
            ]))
            .json(config),
        Err(err) => service_error_response(err),
    }
}
