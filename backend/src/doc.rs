//! OpenAPI document for the registration API.
//!
//! Served at `/openapi.json` in debug builds so frontend work and external
//! tooling can pull the current contract straight from a running server.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode, MilestoneCounts, RosterCounts};
use crate::inbound::http::campers::{CamperResponse, DeleteResponse, OverviewResponse};

/// Top-level OpenAPI description of the REST surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Camp registration API",
        description = "Camper roster management: registration with photo upload, \
                       arrival tracking, and filtered roster views."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::campers::register_camper,
        crate::inbound::http::campers::list_campers,
        crate::inbound::http::campers::roster_overview,
        crate::inbound::http::campers::get_camper,
        crate::inbound::http::campers::amend_camper,
        crate::inbound::http::campers::replace_camper,
        crate::inbound::http::campers::delete_camper,
        crate::inbound::http::assets::get_asset,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        CamperResponse,
        OverviewResponse,
        DeleteResponse,
        RosterCounts,
        MilestoneCounts,
        Error,
        ErrorCode,
    )),
    tags(
        (name = "campers", description = "Camper registration and roster management"),
        (name = "assets", description = "Stored camper photos"),
        (name = "health", description = "Probes for orchestration")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_endpoint() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        for expected in [
            "/campers",
            "/campers/overview",
            "/campers/{id}",
            "/assets/{reference}",
            "/health/ready",
            "/health/live",
        ] {
            assert!(paths.contains(&expected), "missing path {expected}");
        }
    }

    #[test]
    fn document_serialises_to_json() {
        let json = ApiDoc::openapi().to_json().expect("serialise document");
        assert!(json.contains("Camp registration API"));
    }
}
