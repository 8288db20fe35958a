//! File-backed camper store adapter.
//!
//! The roster is a single JSON snapshot on disk, mirrored by an in-memory
//! map behind a `tokio` `RwLock`. Every successful mutation rewrites the
//! snapshot through a temp-file-then-rename sequence so a crash mid-write
//! never leaves a torn roster. Mutations that fail to persist are rolled
//! back in memory, keeping the map and the file in agreement.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::info;

use crate::domain::camper::{AssetRef, Camper, CamperId, CamperPatch, NewCamper};
use crate::domain::ports::{CamperStore, CamperStoreError};

/// Durable camper store persisting a JSON snapshot per mutation.
pub struct JsonCamperStore {
    path: PathBuf,
    records: RwLock<HashMap<CamperId, Camper>>,
}

fn io_error(context: &str, error: &std::io::Error) -> CamperStoreError {
    CamperStoreError::io(format!("{context}: {error}"))
}

fn newest_first(records: &HashMap<CamperId, Camper>) -> Vec<Camper> {
    let mut roster: Vec<Camper> = records.values().cloned().collect();
    roster.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
    roster
}

impl JsonCamperStore {
    /// Open the store at `path`, loading an existing snapshot. A missing
    /// file is an empty roster.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, CamperStoreError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|error| io_error("failed to create data directory", &error))?;
        }

        let records = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let roster: Vec<Camper> = serde_json::from_slice(&bytes).map_err(|error| {
                    CamperStoreError::io(format!("failed to parse roster snapshot: {error}"))
                })?;
                info!(path = %path.display(), campers = roster.len(), "loaded roster snapshot");
                roster.into_iter().map(|camper| (camper.id, camper)).collect()
            }
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(error) => return Err(io_error("failed to read roster snapshot", &error)),
        };

        Ok(Self {
            path,
            records: RwLock::new(records),
        })
    }

    async fn persist(
        path: &Path,
        records: &HashMap<CamperId, Camper>,
    ) -> Result<(), CamperStoreError> {
        let snapshot = serde_json::to_vec_pretty(&newest_first(records)).map_err(|error| {
            CamperStoreError::io(format!("failed to encode roster snapshot: {error}"))
        })?;

        let staging = path.with_extension("tmp");
        tokio::fs::write(&staging, snapshot)
            .await
            .map_err(|error| io_error("failed to stage roster snapshot", &error))?;
        tokio::fs::rename(&staging, path)
            .await
            .map_err(|error| io_error("failed to commit roster snapshot", &error))
    }
}

#[async_trait]
impl CamperStore for JsonCamperStore {
    async fn insert(&self, new: NewCamper) -> Result<Camper, CamperStoreError> {
        let now = Utc::now();
        let camper = Camper {
            id: CamperId::random(),
            name: new.name,
            age: new.age,
            phone_number: new.phone_number,
            area: new.area,
            team: new.team,
            school: new.school,
            remarks: new.remarks,
            payment: new.payment,
            image_ref: new.image_ref,
            arrived_for_bus: false,
            arrived_camp_site: false,
            version: 1,
            created_at: now,
            updated_at: now,
        };

        let mut records = self.records.write().await;
        records.insert(camper.id, camper.clone());
        if let Err(error) = Self::persist(&self.path, &records).await {
            records.remove(&camper.id);
            return Err(error);
        }
        Ok(camper)
    }

    async fn get(&self, id: CamperId) -> Result<Camper, CamperStoreError> {
        self.records
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(CamperStoreError::NotFound { id })
    }

    async fn list_all(&self) -> Result<Vec<Camper>, CamperStoreError> {
        Ok(newest_first(&*self.records.read().await))
    }

    async fn update(&self, id: CamperId, patch: CamperPatch) -> Result<Camper, CamperStoreError> {
        let mut records = self.records.write().await;
        let current = records
            .get(&id)
            .cloned()
            .ok_or(CamperStoreError::NotFound { id })?;

        if let Some(expected) = patch.expected_version {
            if expected != current.version {
                return Err(CamperStoreError::VersionMismatch {
                    expected,
                    actual: current.version,
                });
            }
        }

        let mut updated = current.clone();
        patch.apply(&mut updated);
        updated.updated_at = Utc::now();
        updated.version = current.version + 1;

        records.insert(id, updated.clone());
        if let Err(error) = Self::persist(&self.path, &records).await {
            records.insert(id, current);
            return Err(error);
        }
        Ok(updated)
    }

    async fn replace(
        &self,
        id: CamperId,
        fields: NewCamper,
        new_image: Option<AssetRef>,
    ) -> Result<Camper, CamperStoreError> {
        let mut records = self.records.write().await;
        let current = records
            .get(&id)
            .cloned()
            .ok_or(CamperStoreError::NotFound { id })?;

        let mut updated = current.clone();
        updated.name = fields.name;
        updated.age = fields.age;
        updated.phone_number = fields.phone_number;
        updated.area = fields.area;
        updated.team = fields.team;
        updated.school = fields.school;
        updated.remarks = fields.remarks;
        updated.payment = fields.payment;
        // A full update without a new photo keeps the current image_ref;
        // overwriting it with "no file" would silently erase a valid photo.
        if let Some(image) = new_image {
            updated.image_ref = Some(image);
        }
        updated.updated_at = Utc::now();
        updated.version = current.version + 1;

        records.insert(id, updated.clone());
        if let Err(error) = Self::persist(&self.path, &records).await {
            records.insert(id, current);
            return Err(error);
        }
        Ok(updated)
    }

    async fn remove(&self, id: CamperId) -> Result<Camper, CamperStoreError> {
        let mut records = self.records.write().await;
        let removed = records
            .remove(&id)
            .ok_or(CamperStoreError::NotFound { id })?;

        if let Err(error) = Self::persist(&self.path, &records).await {
            records.insert(id, removed);
            return Err(error);
        }
        Ok(removed)
    }
}
