//! Registration backend entry point.

use actix_web::web;
use clap::Parser;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use campreg::inbound::http::health::HealthState;
use campreg::server::{AppConfig, create_server};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %error, "tracing init failed");
    }

    let config = AppConfig::parse();
    let health_state = web::Data::new(HealthState::new());

    let server = create_server(health_state, config).await?;
    server.await
}
