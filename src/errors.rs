use actix_web::HttpResponse;
use thiserror::Error;

use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound(entity) => AppError::NotFound(entity),
            DomainError::InvalidInput(msg) => AppError::BadRequest(msg),
            DomainError::Conflict(msg) => AppError::Conflict(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::BadRequest(e.to_string())
    }
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let body = |msg: String| serde_json::json!({ "error": msg });
        match self {
            AppError::NotFound(_) => HttpResponse::NotFound().json(body(self.to_string())),
            AppError::BadRequest(_) => HttpResponse::BadRequest().json(body(self.to_string())),
            AppError::Conflict(_) => HttpResponse::Conflict().json(body(self.to_string())),
            AppError::Internal(detail) => {
                log::error!("request failed: {}", detail);
                HttpResponse::InternalServerError().json(body("Internal server error".to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::MessageBody;
    use actix_web::http::StatusCode;
    use actix_web::ResponseError;

    fn body_of(err: &AppError) -> serde_json::Value {
        let bytes = err
            .error_response()
            .into_body()
            .try_into_bytes()
            .expect("body should be in memory");
        serde_json::from_slice(&bytes).expect("body should be JSON")
    }

    #[test]
    fn not_found_returns_404() {
        let resp = AppError::NotFound("Product").error_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn bad_request_returns_400() {
        let resp = AppError::BadRequest("quantity must be positive".into()).error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn conflict_returns_409() {
        let resp = AppError::Conflict("duplicate rut".into()).error_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn internal_error_returns_500_and_hides_detail() {
        let err = AppError::Internal("connection refused".to_string());
        assert_eq!(err.error_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_of(&err)["error"], "Internal server error");
    }

    #[test]
    fn not_found_display_names_entity() {
        assert_eq!(AppError::NotFound("Sale").to_string(), "Sale not found");
        assert_eq!(body_of(&AppError::NotFound("Sale"))["error"], "Sale not found");
    }

    #[test]
    fn domain_errors_map_to_http_errors() {
        assert!(matches!(
            AppError::from(DomainError::NotFound("Client")),
            AppError::NotFound("Client")
        ));
        assert!(matches!(
            AppError::from(DomainError::InvalidInput("bad".into())),
            AppError::BadRequest(_)
        ));
        assert!(matches!(
            AppError::from(DomainError::Conflict("dup".into())),
            AppError::Conflict(_)
        ));
        assert!(matches!(
            AppError::from(DomainError::Internal("oops".into())),
            AppError::Internal(_)
        ));
    }
}
