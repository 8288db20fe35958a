//! HTTP inbound adapter exposing the roster REST endpoints.

pub mod assets;
pub mod campers;
pub mod error;
pub mod health;
pub mod state;
pub mod validation;

pub use error::ApiResult;
