//! Caller identity
//!
//! The authenticated principal is produced upstream (gateway, auth proxy) and
//! forwarded in a configurable header. [`attach_identity`] moves it into the
//! request extensions; handlers read it back with the [`Identity`] extractor.

use super::state::SharedState;
use crate::error::AppError;
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use std::fmt;

/// The authenticated caller, identified by email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity(String);

impl Identity {
    pub fn new(email: impl Into<String>) -> Self {
        Self(email.into())
    }

    pub fn email(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .ok_or(AppError::Unauthenticated)
    }
}

/// Middleware: turns the upstream identity header into an [`Identity`] extension.
///
/// Blank values are ignored, which leaves the request unauthenticated.
pub async fn attach_identity(
    State(state): State<SharedState>,
    mut req: Request,
    next: Next,
) -> Response {
    let identity = req
        .headers()
        .get(&state.identity_header)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(Identity::new);

    if let Some(identity) = identity {
        req.extensions_mut().insert(identity);
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request as HttpRequest;

    #[tokio::test]
    async fn extractor_reads_extension() {
        let mut req = HttpRequest::builder().body(()).unwrap();
        req.extensions_mut().insert(Identity::new("alice@example.com"));
        let (mut parts, _) = req.into_parts();

        let identity = Identity::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(identity.email(), "alice@example.com");
    }

    #[tokio::test]
    async fn extractor_rejects_missing_identity() {
        let (mut parts, _) = HttpRequest::builder().body(()).unwrap().into_parts();
        let result = Identity::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::Unauthenticated)));
    }
}
