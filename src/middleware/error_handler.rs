// Extractor error handlers
//
// Malformed JSON bodies, query strings and path segments are answered with
// the same error body as every other AppError.

use actix_web::{
    error::{JsonPayloadError, PathError, QueryPayloadError},
    web, Error, HttpRequest,
};

use crate::core::AppError;

fn log_error(req: &HttpRequest, kind: &str, detail: &str) {
    tracing::warn!(path = %req.path(), kind, detail, "Rejected malformed request");
}

pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> Error {
    let detail = err.to_string();
    log_error(req, "json", &detail);
    AppError::validation(format!("Invalid JSON body: {}", detail)).into()
}

pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> Error {
    let detail = err.to_string();
    log_error(req, "query", &detail);
    AppError::validation(format!("Invalid query string: {}", detail)).into()
}

pub fn path_error_handler(err: PathError, req: &HttpRequest) -> Error {
    let detail = err.to_string();
    log_error(req, "path", &detail);
    AppError::validation(format!("Invalid path parameter: {}", detail)).into()
}

/// Register the handlers on an app or scope
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler));
}
