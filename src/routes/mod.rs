use actix_web::HttpResponse;
use serde::Deserialize;
use serde_json::json;

use crate::domain::types::Locale;
use crate::models::config::ServerConfig;
use crate::services::ServiceError;

pub mod categories;
pub mod consent;
pub mod cookies;
pub mod import_export;

/// `?locale=` query parameter shared by all localized endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct LocaleQuery {
    pub locale: Option<String>,
}

impl LocaleQuery {
    /// The requested locale, falling back to the configured default.
    pub fn resolve(&self, config: &ServerConfig) -> Result<Locale, HttpResponse> {
        let raw = self.locale.as_deref().unwrap_or(&config.default_locale);
        Locale::new(raw).map_err(|e| error_body(HttpResponse::UnprocessableEntity(), e))
    }
}

pub fn error_body(
    mut builder: actix_web::HttpResponseBuilder,
    message: impl ToString,
) -> HttpResponse {
    builder.json(json!({ "error": message.to_string() }))
}

/// Translate a service failure into the matching HTTP status.
pub fn service_error_response(err: ServiceError) -> HttpResponse {
    match err {
        ServiceError::NotFound => error_body(HttpResponse::NotFound(), err),
        ServiceError::Conflict(_) => error_body(HttpResponse::Conflict(), err),
        ServiceError::Validation(_) | ServiceError::Form(_) => {
            error_body(HttpResponse::UnprocessableEntity(), err)
        }
        ServiceError::Internal => HttpResponse::InternalServerError().finish(),
    }
}
