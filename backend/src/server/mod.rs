//! Server construction: store setup, route table, and middleware wiring.

mod config;

pub use config::AppConfig;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

#[cfg(debug_assertions)]
use actix_web::HttpResponse;
#[cfg(debug_assertions)]
use utoipa::OpenApi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::RosterService;
use crate::inbound::http::assets::get_asset;
use crate::inbound::http::campers::{
    amend_camper, delete_camper, get_camper, list_campers, register_camper, replace_camper,
    roster_overview,
};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::state::HttpState;
use crate::middleware::RequestLog;
use crate::outbound::{FsAssetStore, JsonCamperStore};

/// Open the stores named in the configuration and assemble the HTTP state.
///
/// # Errors
/// Returns [`std::io::Error`] when either store cannot be opened, which
/// should abort startup rather than serve requests against broken storage.
pub async fn build_state(config: &AppConfig) -> std::io::Result<HttpState> {
    let store = JsonCamperStore::open(config.data_file.clone())
        .await
        .map_err(|error| std::io::Error::other(format!("opening camper store: {error}")))?;
    let assets = FsAssetStore::open(config.assets_dir.clone())
        .await
        .map_err(|error| std::io::Error::other(format!("opening asset store: {error}")))?;
    Ok(HttpState::new(RosterService::new(
        Arc::new(store),
        Arc::new(assets),
        config.policy(),
    )))
}

#[cfg(debug_assertions)]
async fn openapi_json() -> HttpResponse {
    match ApiDoc::openapi().to_json() {
        Ok(json) => HttpResponse::Ok()
            .content_type("application/json")
            .body(json),
        Err(error) => {
            tracing::error!(%error, "failed to render OpenAPI document");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Assemble the application with its full route table.
///
/// `/campers/overview` is registered before `/campers/{id}` so the literal
/// segment wins over the path parameter.
pub fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(RequestLog)
        .service(register_camper)
        .service(list_campers)
        .service(roster_overview)
        .service(get_camper)
        .service(amend_camper)
        .service(replace_camper)
        .service(delete_camper)
        .service(get_asset)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.route("/openapi.json", web::get().to(openapi_json));

    app
}

/// Build and spawn the HTTP server.
///
/// # Errors
/// Propagates [`std::io::Error`] from store setup or socket binding.
pub async fn create_server(
    health_state: web::Data<HealthState>,
    config: AppConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(build_state(&config).await?);

    let server = HttpServer::new(move || {
        // The registration frontend is served from a different origin.
        // CORS wraps here rather than in `build_app` because it changes the
        // response body type.
        build_app(server_health_state.clone(), http_state.clone()).wrap(Cors::permissive())
    })
    .bind(config.bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
