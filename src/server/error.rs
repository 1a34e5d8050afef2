//! Error-to-HTTP response conversion.
//!
//! Wraps [`gallery_common::Error`] so route handlers can return
//! `Result<T, AppError>` and use `?` on store calls.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use gallery_common::Error;
use serde_json::json;

/// Wrapper so we can implement `IntoResponse` for an external type.
#[derive(Debug)]
pub struct AppError(pub Error);

impl From<Error> for AppError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl AppError {
    fn code(&self) -> &'static str {
        match &self.0 {
            Error::NotFound { .. } => "not_found",
            Error::Decode(_) => "decode_error",
            Error::Pipeline { .. } => "pipeline_error",
            Error::Forbidden(_) => "forbidden",
            Error::Validation(_) => "validation_error",
            Error::Database { .. } => "database_error",
            Error::Io { .. } => "io_error",
            Error::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Server-side failures are logged in full and reported opaquely.
        let message = if status.is_server_error() {
            tracing::error!(status = %status, error = %self.0, "Server error in API handler");
            "Internal Server Error".to_string()
        } else {
            self.0.to_string()
        };

        let body = json!({
            "error": message,
            "code": self.code(),
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery_common::{Entity, GalleryId};

    #[test]
    fn not_found_produces_404() {
        let err = AppError::from(Error::not_found(Entity::Gallery, GalleryId::new(1)));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn decode_produces_422() {
        let response = AppError(Error::decode("bad magic")).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn forbidden_produces_403() {
        let response = AppError(Error::Forbidden("anonymous".into())).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn database_errors_are_opaque() {
        let err = AppError(Error::database("disk I/O error"));
        assert_eq!(err.code(), "database_error");
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
