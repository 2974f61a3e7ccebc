//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! ## Architecture
//!
//! The [`LicenseStore`] is a thread-safe in-memory map keyed by license
//! key and is the synchronous read path for lookups. When a database pool
//! is configured, inserts are written through to Postgres and the store is
//! hydrated from it at startup, so memory and database stay consistent
//! for a single-instance deployment.
//!
//! Licenses are immutable once issued: the store exposes insert and
//! lookup, plus a removal used only to roll back a memory insert whose
//! database write-through failed. No update path exists.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{SecretToken, DEV_SECRET_TOKEN};

/// An issued license. Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LicenseRecord {
    /// Surrogate identifier, assigned at issue time.
    pub id: Uuid,
    /// Opaque 10-character key drawn from `{A-Z, 0-9}`. Unique.
    pub key: String,
    /// Human-readable description: `"Valid license for {product}"`.
    pub message: String,
    /// Expiration instant. `None` means the license never expires.
    /// A license is invalid strictly after this value.
    pub expiration: Option<DateTime<Utc>>,
    /// Issue instant.
    pub created_at: DateTime<Utc>,
}

/// Error raised by the license store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// A record with this key already exists. Key generation collisions
    /// are not retried; this surfaces to the caller as an internal error.
    #[error("license key {0} already exists")]
    DuplicateKey(String),
}

/// Thread-safe, cloneable in-memory license store keyed by license key.
///
/// All operations are synchronous (the RwLock is `parking_lot`, not
/// `tokio::sync`) because the lock is never held across `.await` points.
/// `parking_lot::RwLock` is non-poisonable — a panicking writer does not
/// permanently corrupt the store.
#[derive(Debug, Clone, Default)]
pub struct LicenseStore {
    data: Arc<RwLock<HashMap<String, LicenseRecord>>>,
}

impl LicenseStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, enforcing key uniqueness.
    ///
    /// The existence check and insert run under a single write lock, so
    /// two concurrent inserts of the same key cannot both succeed.
    pub fn try_insert(&self, record: LicenseRecord) -> Result<LicenseRecord, StoreError> {
        let mut guard = self.data.write();
        if guard.contains_key(&record.key) {
            return Err(StoreError::DuplicateKey(record.key));
        }
        guard.insert(record.key.clone(), record.clone());
        Ok(record)
    }

    /// Look up a record by license key. Read-only.
    pub fn find_by_key(&self, key: &str) -> Option<LicenseRecord> {
        self.data.read().get(key).cloned()
    }

    /// Remove a record by key, returning it if present.
    ///
    /// Exists solely to roll back a memory insert after the database
    /// write-through fails; issued licenses are never otherwise removed.
    pub(crate) fn remove(&self, key: &str) -> Option<LicenseRecord> {
        self.data.write().remove(key)
    }

    /// Return the number of issued licenses.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Application configuration, built once at startup from the environment
/// and passed explicitly into the state — never ambient globals.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Shared secret required by the issuance endpoint.
    pub secret_token: SecretToken,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            secret_token: SecretToken::new(DEV_SECRET_TOKEN),
        }
    }
}

/// Shared application state accessible to all route handlers.
/// Clone-friendly via `Arc` internals in the store and pool.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Issued licenses, keyed by license key.
    pub licenses: LicenseStore,
    /// PostgreSQL connection pool for durable persistence.
    /// When `None`, the API operates in in-memory-only mode.
    pub db_pool: Option<PgPool>,
    pub config: AppConfig,
}

impl AppState {
    /// Create application state with default configuration and no database.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default(), None)
    }

    /// Create application state with the given configuration and optional
    /// database pool.
    pub fn with_config(config: AppConfig, db_pool: Option<PgPool>) -> Self {
        Self {
            licenses: LicenseStore::new(),
            db_pool,
            config,
        }
    }

    /// Hydrate the in-memory store from the database.
    ///
    /// Called once on startup when a database pool is available, so that
    /// lookups remain fast and synchronous.
    pub async fn hydrate_from_db(&self) -> Result<(), String> {
        let pool = match &self.db_pool {
            Some(pool) => pool,
            None => return Ok(()),
        };

        let records = crate::db::licenses::load_all(pool)
            .await
            .map_err(|e| format!("failed to load licenses: {e}"))?;
        let count = records.len();
        for record in records {
            if let Err(e) = self.licenses.try_insert(record) {
                // The UNIQUE constraint makes this unreachable; log rather
                // than abort startup if the database is ever hand-edited.
                tracing::warn!(error = %e, "skipping duplicate license during hydration");
            }
        }

        tracing::info!(licenses = count, "Hydrated license store from database");
        Ok(())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
