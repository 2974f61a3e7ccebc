//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented routes into a single OpenAPI spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::state::AppState;

/// Adds the shared-secret security scheme to the OpenAPI spec.
///
/// The secret is sent as the raw value of the `Authorization` header —
/// no scheme prefix.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "secret_token",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                    "Authorization",
                    "Shared secret sent as the raw Authorization header value. \
                     Set via the SECRET_TOKEN env var.",
                ))),
            );
        }
    }
}

/// Assembled OpenAPI spec for the API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "keymint API",
        version = "0.1.0",
        description = "License issuing and validation service.\n\nProvides:\n- **License issuance** for a product and duration (`lifetime` or `<integer> month`), returning a random 10-character key\n- **License validation** checking key existence and expiration\n\nAuthentication: shared secret via the `Authorization` header, required only by `/generate_license`. Validation and health probes are open.",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
    paths(
        crate::routes::licenses::generate_license,
        crate::routes::licenses::check_license,
    ),
    components(
        schemas(
            crate::routes::licenses::GenerateLicenseRequest,
            crate::routes::licenses::GenerateLicenseResponse,
            crate::routes::licenses::CheckLicenseRequest,
            crate::routes::licenses::CheckLicenseResponse,
            crate::error::FailureBody,
            crate::state::LicenseRecord,
        ),
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "licenses", description = "License issuance and validation"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
///
/// Serves the OpenAPI JSON spec at `/openapi.json`.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json — Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_spec_generates_successfully() {
        let spec = ApiDoc::openapi();
        assert_eq!(spec.info.title, "keymint API");
    }

    #[test]
    fn openapi_spec_has_license_paths() {
        let spec = ApiDoc::openapi();
        assert!(spec.paths.paths.contains_key("/generate_license"));
        assert!(spec.paths.paths.contains_key("/check_license"));
    }

    #[test]
    fn openapi_spec_has_security_scheme() {
        let spec = ApiDoc::openapi();
        let components = spec.components.as_ref().unwrap();
        assert!(components.security_schemes.contains_key("secret_token"));
    }

    #[test]
    fn openapi_spec_serializes_to_json() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string(&spec).unwrap();
        assert!(json.contains("openapi"));
        assert!(json.contains("/generate_license"));
    }
}
