//! Roster service: the operations layer over the camper and asset stores.
//!
//! Each operation targets exactly one record. The service validates incoming
//! fields against the configured area/team allow-lists, translates port
//! failures into the domain error taxonomy, and owns the asset cascade:
//! deleting a camper (or replacing its photo) discards the now-unreferenced
//! asset best-effort, so a failed cleanup never fails the record mutation.

use std::sync::Arc;

use serde_json::json;
use tracing::warn;

use super::camper::{AssetRef, Camper, CamperId, CamperPatch, RegisterCamper};
use super::error::Error;
use super::ports::{AssetStore, AssetStoreError, CamperStore, CamperStoreError};
use super::projection::{self, Projection, RosterFilter};

/// Default area allow-list, matching the deployment this system replaces.
pub const DEFAULT_AREAS: [&str; 4] = ["Dematagoda", "Wattala", "Kirulapone", "Wellawatte"];

/// Default team allow-list.
pub const DEFAULT_TEAMS: [&str; 4] = ["Vikings", "ThunderBolts", "Gladiators", "Volcanoes"];

/// Closed enumerations enforced at the service boundary.
///
/// The store itself accepts arbitrary text for `area` and `team`; the
/// allow-list check happens here so the lists stay configurable without
/// touching persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterPolicy {
    pub allowed_areas: Vec<String>,
    pub allowed_teams: Vec<String>,
}

impl Default for RosterPolicy {
    fn default() -> Self {
        Self {
            allowed_areas: DEFAULT_AREAS.iter().map(ToString::to_string).collect(),
            allowed_teams: DEFAULT_TEAMS.iter().map(ToString::to_string).collect(),
        }
    }
}

impl RosterPolicy {
    fn check(field: &str, value: &str, allowed: &[String]) -> Result<(), Error> {
        if allowed.iter().any(|candidate| candidate == value) {
            return Ok(());
        }
        Err(
            Error::invalid_request(format!("{field} must be one of the configured values"))
                .with_details(json!({
                    "field": field,
                    "value": value,
                    "allowed": allowed,
                    "code": "unknown_value",
                })),
        )
    }

    fn check_area(&self, value: &str) -> Result<(), Error> {
        Self::check("area", value, &self.allowed_areas)
    }

    fn check_team(&self, value: &str) -> Result<(), Error> {
        Self::check("team", value, &self.allowed_teams)
    }
}

/// Raw photo bytes received at the boundary, not yet stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub bytes: Vec<u8>,
    pub original_name: String,
}

fn empty_field_error(field: &str) -> Error {
    Error::invalid_request(format!("{field} must not be empty")).with_details(json!({
        "field": field,
        "code": "empty_field",
    }))
}

/// Thin orchestration layer exposing the five roster operations plus asset
/// retrieval and the read-side projection.
#[derive(Clone)]
pub struct RosterService {
    store: Arc<dyn CamperStore>,
    assets: Arc<dyn AssetStore>,
    policy: Arc<RosterPolicy>,
}

impl RosterService {
    /// Compose the service from its two ports and the allow-list policy.
    pub fn new(store: Arc<dyn CamperStore>, assets: Arc<dyn AssetStore>, policy: RosterPolicy) -> Self {
        Self {
            store,
            assets,
            policy: Arc::new(policy),
        }
    }

    fn map_store_error(error: CamperStoreError) -> Error {
        match error {
            CamperStoreError::NotFound { id } => {
                Error::not_found(format!("no camper found for id {id}"))
            }
            CamperStoreError::VersionMismatch { expected, actual } => {
                Error::conflict("camper was modified by another caller").with_details(json!({
                    "expectedVersion": expected,
                    "actualVersion": actual,
                    "code": "version_mismatch",
                }))
            }
            CamperStoreError::Io { message } => {
                Error::storage(format!("camper store failed: {message}"))
            }
        }
    }

    fn map_asset_error(error: AssetStoreError) -> Error {
        match error {
            AssetStoreError::NotFound { reference } => {
                Error::not_found(format!("no asset found for reference {reference}"))
            }
            AssetStoreError::Io { message } => {
                Error::storage(format!("asset store failed: {message}"))
            }
        }
    }

    fn validate_register(&self, request: &RegisterCamper) -> Result<(), Error> {
        for (field, value) in [
            ("name", &request.name),
            ("phoneNumber", &request.phone_number),
            ("school", &request.school),
        ] {
            if value.trim().is_empty() {
                return Err(empty_field_error(field));
            }
        }
        self.policy.check_area(&request.area)?;
        self.policy.check_team(&request.team)
    }

    fn validate_patch(&self, patch: &CamperPatch) -> Result<(), Error> {
        for (field, value) in [
            ("name", &patch.name),
            ("phoneNumber", &patch.phone_number),
            ("school", &patch.school),
        ] {
            if let Some(value) = value {
                if value.trim().is_empty() {
                    return Err(empty_field_error(field));
                }
            }
        }
        if let Some(area) = &patch.area {
            self.policy.check_area(area)?;
        }
        if let Some(team) = &patch.team {
            self.policy.check_team(team)?;
        }
        Ok(())
    }

    async fn store_upload(&self, upload: Upload) -> Result<AssetRef, Error> {
        self.assets
            .store(upload.bytes, &upload.original_name)
            .await
            .map_err(Self::map_asset_error)
    }

    /// Best-effort asset removal for the delete/replace cascade. A failed
    /// cleanup is logged and swallowed; the record mutation already happened.
    async fn discard_asset(&self, reference: &AssetRef) {
        if let Err(error) = self.assets.discard(reference).await {
            warn!(reference = %reference, %error, "failed to discard orphaned asset");
        }
    }

    /// Register a new camper, storing the photo (if any) first.
    ///
    /// The asset write precedes the record write; if the record write then
    /// fails, the stored asset is not rolled back. That leak is accepted and
    /// bounded to failed registrations.
    pub async fn register(
        &self,
        request: RegisterCamper,
        upload: Option<Upload>,
    ) -> Result<Camper, Error> {
        self.validate_register(&request)?;

        let image_ref = match upload {
            Some(upload) => Some(self.store_upload(upload).await?),
            None => None,
        };

        self.store
            .insert(request.into_new_camper(image_ref))
            .await
            .map_err(Self::map_store_error)
    }

    /// The full roster, newest-first.
    pub async fn list(&self) -> Result<Vec<Camper>, Error> {
        self.store.list_all().await.map_err(Self::map_store_error)
    }

    /// Fetch a single camper.
    pub async fn fetch(&self, id: CamperId) -> Result<Camper, Error> {
        self.store.get(id).await.map_err(Self::map_store_error)
    }

    /// The filtered view plus roster-wide counts.
    pub async fn overview(&self, filter: &RosterFilter) -> Result<Projection, Error> {
        let roster = self.list().await?;
        Ok(projection::project(
            &roster,
            filter,
            &self.policy.allowed_teams,
        ))
    }

    /// Partial update: merge the supplied keys, honouring the optional
    /// `expected_version` compare-and-swap token.
    pub async fn amend(&self, id: CamperId, patch: CamperPatch) -> Result<Camper, Error> {
        self.validate_patch(&patch)?;
        self.store
            .update(id, patch)
            .await
            .map_err(Self::map_store_error)
    }

    /// Full update, optionally replacing the photo. Without a new upload the
    /// existing `image_ref` is retained; with one, the superseded asset is
    /// discarded after the record write succeeds.
    pub async fn replace(
        &self,
        id: CamperId,
        request: RegisterCamper,
        upload: Option<Upload>,
    ) -> Result<Camper, Error> {
        self.validate_register(&request)?;

        let previous_image = match &upload {
            Some(_) => self
                .store
                .get(id)
                .await
                .map_err(Self::map_store_error)?
                .image_ref,
            None => None,
        };

        let new_image = match upload {
            Some(upload) => Some(self.store_upload(upload).await?),
            None => None,
        };

        let updated = self
            .store
            .replace(id, request.into_new_camper(None), new_image)
            .await
            .map_err(Self::map_store_error)?;

        if let Some(previous) = previous_image {
            if updated.image_ref.as_ref() != Some(&previous) {
                self.discard_asset(&previous).await;
            }
        }

        Ok(updated)
    }

    /// Delete the record, then cascade-discard its asset.
    pub async fn remove(&self, id: CamperId) -> Result<(), Error> {
        let removed = self.store.remove(id).await.map_err(Self::map_store_error)?;
        if let Some(reference) = removed.image_ref {
            self.discard_asset(&reference).await;
        }
        Ok(())
    }

    /// Raw bytes of a stored photo, for serving at the boundary.
    pub async fn asset(&self, reference: &AssetRef) -> Result<Vec<u8>, Error> {
        self.assets
            .resolve(reference)
            .await
            .map_err(Self::map_asset_error)
    }
}
