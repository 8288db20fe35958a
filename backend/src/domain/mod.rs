//! Transport-agnostic core of the camp roster.
//!
//! Purpose: hold the camper entity and its lifecycle rules, the ports the
//! adapters implement, the roster service composing them, and the pure
//! projection used by the read side. Nothing in here knows about HTTP or the
//! filesystem.

pub mod camper;
pub mod error;
pub mod ports;
pub mod projection;
pub mod roster;

pub use self::camper::{AssetRef, Camper, CamperId, CamperPatch, NewCamper, RegisterCamper};
pub use self::error::{Error, ErrorCode};
pub use self::projection::{MilestoneCounts, Projection, RosterCounts, RosterFilter};
pub use self::roster::{RosterPolicy, RosterService, Upload};

/// Convenient result alias for domain operations.
pub type ApiResult<T> = Result<T, Error>;
