//! Shared HTTP adapter state.
//!
//! Handlers receive the roster service via `actix_web::web::Data`, so they
//! stay thin: parse, delegate, shape the response.

use std::sync::Arc;

use crate::domain::RosterService;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub roster: Arc<RosterService>,
}

impl HttpState {
    /// Construct state around a roster service.
    pub fn new(roster: RosterService) -> Self {
        Self {
            roster: Arc::new(roster),
        }
    }
}
