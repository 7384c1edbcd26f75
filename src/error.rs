use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;

use crate::backend::ApiError;
use crate::forms::FieldErrors;

/// Every failure a handler can surface. The body is always
/// `{success: false, error}` with a short message for the user; details go to
/// the log at the call site.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Backend {
        message: String,
        #[source]
        source: ApiError,
    },

    #[error("Dados inválidos")]
    Validation(FieldErrors),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Receipt(String),
}

impl AppError {
    /// Wraps a backend failure under a user-facing message, logging the cause.
    pub fn backend(message: impl Into<String>) -> impl FnOnce(ApiError) -> AppError {
        let message = message.into();
        move |source| {
            tracing::error!(
                error = %source,
                backend_message = source.backend_message().unwrap_or("-"),
                "{}",
                message
            );
            AppError::Backend { message, source }
        }
    }
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        AppError::Validation(errors)
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Backend { .. } => StatusCode::BAD_GATEWAY,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Receipt(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::Validation(fields) => json!({
                "success": false,
                "error": self.to_string(),
                "fields": fields,
            }),
            _ => json!({
                "success": false,
                "error": self.to_string(),
            }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn backend_failures_keep_the_user_message() {
        let err = AppError::backend("Erro ao carregar funcionários")(ApiError::Server {
            status: 404,
            message: "Not Found".into(),
        });
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);

        let body = to_bytes(err.error_response().into_body()).await.unwrap();
        let v: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(v, json!({ "success": false, "error": "Erro ao carregar funcionários" }));
    }

    #[actix_web::test]
    async fn validation_lists_fields() {
        let mut fields = FieldErrors::default();
        fields.add("name", "Nome é obrigatório");
        let err = AppError::from(fields);

        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = to_bytes(resp.into_body()).await.unwrap();
        let v: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(v["success"], false);
        assert_eq!(v["fields"]["name"][0], "Nome é obrigatório");
    }
}
