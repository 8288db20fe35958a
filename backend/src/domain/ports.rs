//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the domain expects to interact with driven adapters
//! (the camper store and the asset store). Each trait exposes strongly typed
//! errors so adapters map their failures into predictable variants.

use async_trait::async_trait;
use thiserror::Error;

use super::camper::{AssetRef, Camper, CamperId, CamperPatch, NewCamper};

/// Errors surfaced by camper store adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CamperStoreError {
    /// No record exists for the requested identifier.
    #[error("no camper found for id {id}")]
    NotFound { id: CamperId },
    /// Optimistic concurrency check failed.
    #[error("version mismatch: expected {expected}, found {actual}")]
    VersionMismatch { expected: u64, actual: u64 },
    /// Persistence could not be read or written.
    #[error("camper store i/o failed: {message}")]
    Io { message: String },
}

impl CamperStoreError {
    /// Helper for missing-record failures.
    #[must_use]
    pub fn not_found(id: CamperId) -> Self {
        Self::NotFound { id }
    }

    /// Helper for I/O failures bubbling up from the adapter.
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }
}

/// Errors surfaced by asset store adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetStoreError {
    /// No asset exists under the requested reference.
    #[error("no asset found for reference {reference}")]
    NotFound { reference: String },
    /// The asset bytes could not be read or written.
    #[error("asset store i/o failed: {message}")]
    Io { message: String },
}

impl AssetStoreError {
    /// Helper for missing-asset failures.
    pub fn not_found(reference: impl Into<String>) -> Self {
        Self::NotFound {
            reference: reference.into(),
        }
    }

    /// Helper for I/O failures bubbling up from the adapter.
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }
}

/// Port for the persisted roster collection.
///
/// The store owns identity assignment, milestone defaults, timestamps and
/// the per-record `version` counter. There is no transaction scope wider
/// than a single record.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CamperStore: Send + Sync {
    /// Persist a new record: assigns the id, defaults both milestone flags
    /// to `false`, sets `created_at == updated_at` and `version == 1`.
    async fn insert(&self, new: NewCamper) -> Result<Camper, CamperStoreError>;

    /// Fetch a single record.
    async fn get(&self, id: CamperId) -> Result<Camper, CamperStoreError>;

    /// Every record, ordered newest-first by `created_at`, recomputed fresh
    /// on each call.
    async fn list_all(&self) -> Result<Vec<Camper>, CamperStoreError>;

    /// Merge only the supplied keys into the record, refresh `updated_at`
    /// and bump `version`. Honours `patch.expected_version` as a
    /// compare-and-swap token.
    async fn update(&self, id: CamperId, patch: CamperPatch) -> Result<Camper, CamperStoreError>;

    /// Replace every caller-controlled field. `new_image` of `None` retains
    /// the current `image_ref` explicitly; `Some` replaces it.
    async fn replace(
        &self,
        id: CamperId,
        fields: NewCamper,
        new_image: Option<AssetRef>,
    ) -> Result<Camper, CamperStoreError>;

    /// Remove the record, returning it so callers can release dependent
    /// resources. Removing an absent id always reports [`CamperStoreError::NotFound`].
    async fn remove(&self, id: CamperId) -> Result<Camper, CamperStoreError>;
}

/// Port for stored photo bytes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Persist `bytes` under a freshly generated collision-resistant name
    /// derived from `original_name`'s extension.
    async fn store(&self, bytes: Vec<u8>, original_name: &str)
        -> Result<AssetRef, AssetStoreError>;

    /// Retrieve previously stored bytes.
    async fn resolve(&self, reference: &AssetRef) -> Result<Vec<u8>, AssetStoreError>;

    /// Delete a stored asset. Discarding an already-absent asset succeeds,
    /// so the cascade in the roster service stays idempotent.
    async fn discard(&self, reference: &AssetRef) -> Result<(), AssetStoreError>;
}
