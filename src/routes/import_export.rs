use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, Responder, get, post, web};
use serde::Deserialize;
use serde_json::json;

use crate::forms::import_export::{ImportError, ImportPayload};
use crate::repository::DieselRepository;
use crate::routes::{error_body, service_error_response};
use crate::services::import_export::{
    export_taxonomy as export_taxonomy_service, import_taxonomy as import_taxonomy_service,
};

pub const EXPORT_FILE_NAME: &str = "cookie-consent-export.json";

#[derive(Debug, Deserialize)]
pub struct ImportParams {
    /// Overwrite existing records; the admin import always does.
    #[serde(default = "default_force")]
    pub force: bool,
}

fn default_force() -> bool {
    true
}

#[get("/admin/api/cookie-consent/export")]
pub async fn export_taxonomy(repo: web::Data<DieselRepository>) -> impl Responder {
    let document = match export_taxonomy_service(repo.get_ref()) {
        Ok(document) => document,
        Err(err) => return service_error_response(err),
    };

    match serde_json::to_string_pretty(&document) {
        Ok(body) => HttpResponse::Ok()
            .content_type("application/json")
            .insert_header(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(EXPORT_FILE_NAME.to_string())],
            })
            .body(body),
        Err(e) => {
            log::error!("Failed to serialize export document: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/admin/api/cookie-consent/import")]
pub async fn import_taxonomy(
    params: web::Query<ImportParams>,
    repo: web::Data<DieselRepository>,
    body: String,
) -> impl Responder {
    let payload = match ImportPayload::from_json(&body) {
        Ok(payload) => payload,
        Err(e @ ImportError::InvalidJson(_)) => return error_body(HttpResponse::BadRequest(), e),
        Err(e @ ImportError::Validation { .. }) => {
            return error_body(HttpResponse::UnprocessableEntity(), e);
        }
    };

    match import_taxonomy_service(&payload, params.force, repo.get_ref()) {
        Ok(report) => HttpResponse::Ok().json(json!({
            "success": true,
            "stats": report.stats,
        })),
        Err(err) => service_error_response(err),
    }
}
