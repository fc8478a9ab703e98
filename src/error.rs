//! HTTP-facing error type
//!
//! Every handler returns `Result<_, AppError>`; the error is logged and turned
//! into a status code with a plain-text message body.

use crate::cart::service::ServiceError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or invalid input
    #[error("{0}")]
    BadRequest(String),

    /// The caller may not act on the target resource
    #[error("{0}")]
    Forbidden(String),

    #[error("authentication required")]
    Unauthenticated,

    /// Service failure mapped by its own kind
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::Service(err) => err.status(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::warn!(status = %status, error = %self, "request rejected");
        (status, self.to_string()).into_response()
    }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::models::CartItemId;

    #[test]
    fn status_mapping() {
        assert_eq!(
            AppError::BadRequest("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::Forbidden("x".into()).status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::Unauthenticated.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::from(ServiceError::CartItemNotFound(CartItemId(1))).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn service_message_passes_through() {
        let err = AppError::from(ServiceError::CartItemNotFound(CartItemId(9)));
        assert_eq!(err.to_string(), "cart item 9 does not exist");
    }
}
