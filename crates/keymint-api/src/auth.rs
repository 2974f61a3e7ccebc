//! # Authentication Middleware
//!
//! Shared-secret authentication for the license issuance endpoint.
//!
//! The client sends the secret as the raw value of the `Authorization`
//! header (no scheme prefix — this is the wire contract the service has
//! always exposed). The comparison is constant-time to avoid timing
//! side-channels that could reveal token length or prefix.
//!
//! Validation (`POST /check_license`) is an open endpoint and is not
//! routed through this middleware.

use axum::extract::Request;
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use subtle::ConstantTimeEq;

use crate::error::FailureBody;

/// Default shared secret, suitable only for local development.
/// Any real deployment must override it via `SECRET_TOKEN`.
pub const DEV_SECRET_TOKEN: &str = "TREXOP123A";

/// The process-wide shared secret.
///
/// Custom `Debug` redacts the value to prevent credential leakage in logs.
#[derive(Clone)]
pub struct SecretToken(String);

impl SecretToken {
    /// Wrap a secret value.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Return the secret as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SecretToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SecretToken").field(&"[REDACTED]").finish()
    }
}

/// Auth configuration injected into request extensions.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub token: SecretToken,
}

/// Constant-time comparison of secret tokens.
///
/// When lengths differ, performs a dummy comparison to avoid leaking
/// length information through timing variance.
fn constant_time_token_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

/// Require a matching `Authorization` header on the wrapped routes.
///
/// Rejects with 401 and the standard failure body when the header is
/// missing, unreadable, or does not match the configured secret.
pub async fn auth_middleware(request: Request, next: Next) -> Response {
    let Some(config) = request.extensions().get::<AuthConfig>().cloned() else {
        tracing::error!("auth middleware invoked without AuthConfig extension");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(FailureBody::new("Internal server error")),
        )
            .into_response();
    };

    let provided = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    match provided {
        Some(token) if constant_time_token_eq(token, config.token.as_str()) => {
            next.run(request).await
        }
        Some(_) => {
            tracing::warn!("authentication failed: token mismatch");
            unauthorized_response()
        }
        None => {
            tracing::warn!("authentication failed: missing authorization header");
            unauthorized_response()
        }
    }
}

fn unauthorized_response() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(FailureBody::new("Unauthorized request")),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::middleware::from_fn;
    use axum::routing::get;
    use axum::Router;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    /// Build a minimal router with the auth middleware and a simple handler.
    fn test_app(token: &str) -> Router {
        let auth_config = AuthConfig {
            token: SecretToken::new(token),
        };
        Router::new()
            .route("/test", get(|| async { "ok" }))
            .layer(from_fn(auth_middleware))
            .layer(axum::Extension(auth_config))
    }

    #[tokio::test]
    async fn matching_token_accepted() {
        let app = test_app("my-secret");

        let request = Request::builder()
            .uri("/test")
            .header("Authorization", "my-secret")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn missing_authorization_header_rejected() {
        let app = test_app("my-secret");

        let request = Request::builder().uri("/test").body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let err: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(err["status"], "failure");
        assert_eq!(err["message"], "Unauthorized request");
    }

    #[tokio::test]
    async fn wrong_token_rejected() {
        let app = test_app("my-secret");

        let request = Request::builder()
            .uri("/test")
            .header("Authorization", "wrong-token")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn bearer_prefixed_token_rejected() {
        // The contract is the bare secret; a scheme prefix is a mismatch.
        let app = test_app("my-secret");

        let request = Request::builder()
            .uri("/test")
            .header("Authorization", "Bearer my-secret")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn constant_time_eq_identical_tokens() {
        assert!(constant_time_token_eq("secret-token-123", "secret-token-123"));
    }

    #[test]
    fn constant_time_eq_rejects_wrong_token() {
        assert!(!constant_time_token_eq("wrong-token-1234", "secret-token-123"));
    }

    #[test]
    fn constant_time_eq_rejects_prefix() {
        assert!(!constant_time_token_eq("secret", "secret-token-123"));
    }

    #[test]
    fn constant_time_eq_rejects_empty() {
        assert!(!constant_time_token_eq("", "secret-token-123"));
    }

    #[test]
    fn secret_token_debug_is_redacted() {
        let token = SecretToken::new("super-secret");
        let debug = format!("{token:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("REDACTED"));
    }
}
