//! # License API
//!
//! Handles license issuance and validation.
//!
//! Request DTOs use `Option` fields with manual presence checks because
//! the wire contract fixes the exact 400 messages ("Missing duration or
//! product", "License key is missing") — serde-level rejection cannot
//! produce them.
//!
//! There is no stored status field: validity is recomputed at check time
//! from `expiration` versus the current instant.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use keymint_core::{generate_key, Duration};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::{AppState, LicenseRecord};

/// Request to issue a license.
#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateLicenseRequest {
    /// `"lifetime"` or `"<integer> month"`.
    #[serde(default)]
    pub duration: Option<String>,
    /// Product name. Any non-empty string is accepted.
    #[serde(default)]
    pub product: Option<String>,
}

/// Successful issuance response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GenerateLicenseResponse {
    /// Always `"success"`.
    pub status: String,
    /// The generated 10-character key.
    pub license_key: String,
    /// `"Valid license for {product}"`.
    pub message: String,
    /// `YYYY-MM-DD`, or `"Lifetime"` for a license that never expires.
    pub expiration: String,
}

/// Request to validate a license key.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckLicenseRequest {
    #[serde(default)]
    pub license_key: Option<String>,
}

/// Successful validation response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CheckLicenseResponse {
    /// Always `"success"`.
    pub status: String,
    /// The message stored at issue time.
    pub message: String,
    /// `YYYY-MM-DD`, or `"Lifetime"` for a license that never expires.
    pub expiration: String,
}

/// Format an expiration for the wire: `YYYY-MM-DD`, or `"Lifetime"` when unset.
fn format_expiration(expiration: Option<DateTime<Utc>>) -> String {
    match expiration {
        Some(instant) => instant.format("%Y-%m-%d").to_string(),
        None => "Lifetime".to_string(),
    }
}

/// Unwrap a JSON body, mapping deserialization failures to 400.
fn extract_json<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

/// POST /generate_license — Issue a new license.
#[utoipa::path(
    post,
    path = "/generate_license",
    request_body = GenerateLicenseRequest,
    responses(
        (status = 200, description = "License issued", body = GenerateLicenseResponse),
        (status = 400, description = "Missing or invalid fields", body = crate::error::FailureBody),
        (status = 401, description = "Unauthorized", body = crate::error::FailureBody),
        (status = 500, description = "Internal error", body = crate::error::FailureBody),
    ),
    security(("secret_token" = [])),
    tag = "licenses"
)]
pub async fn generate_license(
    State(state): State<AppState>,
    body: Result<Json<GenerateLicenseRequest>, JsonRejection>,
) -> Result<Json<GenerateLicenseResponse>, AppError> {
    let req = extract_json(body)?;

    let (duration, product) = match (req.duration, req.product) {
        (Some(d), Some(p)) if !d.is_empty() && !p.is_empty() => (d, p),
        _ => {
            return Err(AppError::BadRequest(
                "Missing duration or product".to_string(),
            ))
        }
    };

    let duration: Duration = duration
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid duration format".to_string()))?;

    let now = Utc::now();
    let expiration = duration
        .expiration_from(now)
        .map_err(|e| AppError::Internal(format!("expiration computation failed: {e}")))?;

    let key = generate_key();
    let message = format!("Valid license for {product}");

    let record = LicenseRecord {
        id: Uuid::new_v4(),
        key: key.clone(),
        message: message.clone(),
        expiration,
        created_at: now,
    };

    // The store enforces key uniqueness; a generation collision is not
    // retried and surfaces as an internal error.
    state.licenses.try_insert(record.clone())?;

    // Persist to database (write-through). On failure the memory insert
    // is rolled back: a failed issuance must never leave a key that
    // validates until restart and then silently disappears.
    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::licenses::insert(pool, &record).await {
            state.licenses.remove(&record.key);
            tracing::error!(license_key = %record.key, error = %e, "failed to persist license to database");
            return Err(AppError::Internal(
                "database persist failed, issuance rolled back".to_string(),
            ));
        }
    }

    tracing::info!(license_key = %key, "license issued");

    Ok(Json(GenerateLicenseResponse {
        status: "success".to_string(),
        license_key: key,
        message,
        expiration: format_expiration(record.expiration),
    }))
}

/// POST /check_license — Validate a presented license key.
#[utoipa::path(
    post,
    path = "/check_license",
    request_body = CheckLicenseRequest,
    responses(
        (status = 200, description = "License is valid", body = CheckLicenseResponse),
        (status = 400, description = "Missing, unknown, or expired key", body = crate::error::FailureBody),
        (status = 500, description = "Internal error", body = crate::error::FailureBody),
    ),
    tag = "licenses"
)]
pub async fn check_license(
    State(state): State<AppState>,
    body: Result<Json<CheckLicenseRequest>, JsonRejection>,
) -> Result<Json<CheckLicenseResponse>, AppError> {
    let req = extract_json(body)?;

    let key = match req.license_key {
        Some(key) if !key.is_empty() => key,
        _ => return Err(AppError::BadRequest("License key is missing".to_string())),
    };

    // Unknown keys are a client-input error by this API's convention
    // (400, not 404).
    let record = state
        .licenses
        .find_by_key(&key)
        .ok_or_else(|| AppError::BadRequest("Invalid license key".to_string()))?;

    // Strictly after: an expiration equal to the check instant is still valid.
    if let Some(expiration) = record.expiration {
        if Utc::now() > expiration {
            return Err(AppError::BadRequest("License key has expired".to_string()));
        }
    }

    Ok(Json(CheckLicenseResponse {
        status: "success".to_string(),
        message: record.message,
        expiration: format_expiration(record.expiration),
    }))
}
