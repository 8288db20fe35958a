//! Camper entity and mutation request types.
//!
//! A [`Camper`] is the sole aggregate of the roster. The store assigns the
//! identifier and maintains the timestamps plus the optimistic-concurrency
//! `version`; everything else arrives through [`NewCamper`] (creation and
//! full replacement) or [`CamperPatch`] (partial merge).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Opaque camper identifier, assigned by the store, never reused.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct CamperId(Uuid);

impl CamperId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier from its canonical string form.
    pub fn parse(value: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(value).map(Self)
    }
}

impl std::fmt::Display for CamperId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable name of a stored photo, resolvable through the asset store.
///
/// The reference is decoupled from the camper record: replacing or deleting
/// the underlying file never corrupts the record that pointed at it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct AssetRef(String);

impl AssetRef {
    /// Wrap a generated asset name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the underlying name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for AssetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered participant record.
///
/// ## Invariants
/// - `id` uniquely identifies exactly one record for its entire lifetime.
/// - `arrived_for_bus` and `arrived_camp_site` are independent flags with no
///   ordering constraint between them.
/// - A record without an `image_ref` is valid.
/// - `created_at` is immutable; `updated_at` refreshes on every mutation and
///   `version` increments alongside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Camper {
    pub id: CamperId,
    pub name: String,
    pub age: u32,
    pub phone_number: String,
    pub area: String,
    pub team: String,
    pub school: String,
    pub remarks: Option<String>,
    pub payment: Option<f64>,
    pub image_ref: Option<AssetRef>,
    pub arrived_for_bus: bool,
    pub arrived_camp_site: bool,
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Store-level creation input: every field the caller controls.
///
/// Milestone flags, identity, version and timestamps are owned by the store
/// and deliberately absent here.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCamper {
    pub name: String,
    pub age: u32,
    pub phone_number: String,
    pub area: String,
    pub team: String,
    pub school: String,
    pub remarks: Option<String>,
    pub payment: Option<f64>,
    pub image_ref: Option<AssetRef>,
}

/// Service-level registration request, before any photo has been stored.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisterCamper {
    pub name: String,
    pub age: u32,
    pub phone_number: String,
    pub area: String,
    pub team: String,
    pub school: String,
    pub remarks: Option<String>,
    pub payment: Option<f64>,
}

impl RegisterCamper {
    /// Combine the request with an already-stored photo reference.
    #[must_use]
    pub fn into_new_camper(self, image_ref: Option<AssetRef>) -> NewCamper {
        NewCamper {
            name: self.name,
            age: self.age,
            phone_number: self.phone_number,
            area: self.area,
            team: self.team,
            school: self.school,
            remarks: self.remarks,
            payment: self.payment,
            image_ref,
        }
    }
}

/// Deserialise `null` as `Some(None)` while `#[serde(default)]` keeps an
/// absent key as `None`, so a patch can distinguish "clear this field" from
/// "leave it alone".
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Partial-update request: only supplied keys are merged into the record.
///
/// `image_ref` is intentionally not patchable here; photos only change
/// through the full-update path, which handles asset replacement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CamperPatch {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub phone_number: Option<String>,
    pub area: Option<String>,
    pub team: Option<String>,
    pub school: Option<String>,
    #[serde(deserialize_with = "double_option")]
    pub remarks: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    pub payment: Option<Option<f64>>,
    pub arrived_for_bus: Option<bool>,
    pub arrived_camp_site: Option<bool>,
    /// Optimistic concurrency token. When present, the update only applies
    /// if the stored record still carries this version.
    pub expected_version: Option<u64>,
}

impl CamperPatch {
    /// Merge the supplied keys into `camper`, leaving everything else as is.
    ///
    /// Timestamps and `version` are the store's responsibility and are not
    /// touched here.
    pub fn apply(&self, camper: &mut Camper) {
        if let Some(name) = &self.name {
            camper.name = name.clone();
        }
        if let Some(age) = self.age {
            camper.age = age;
        }
        if let Some(phone_number) = &self.phone_number {
            camper.phone_number = phone_number.clone();
        }
        if let Some(area) = &self.area {
            camper.area = area.clone();
        }
        if let Some(team) = &self.team {
            camper.team = team.clone();
        }
        if let Some(school) = &self.school {
            camper.school = school.clone();
        }
        if let Some(remarks) = &self.remarks {
            camper.remarks = remarks.clone();
        }
        if let Some(payment) = self.payment {
            camper.payment = payment;
        }
        if let Some(arrived_for_bus) = self.arrived_for_bus {
            camper.arrived_for_bus = arrived_for_bus;
        }
        if let Some(arrived_camp_site) = self.arrived_camp_site {
            camper.arrived_camp_site = arrived_camp_site;
        }
    }
}
