//! Runtime configuration, parsed from CLI flags or environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use crate::domain::RosterPolicy;

/// Configuration for the registration backend.
///
/// Every flag can also be supplied through its `CAMPREG_*` environment
/// variable, which is how container deployments set them.
#[derive(Debug, Clone, Parser)]
#[command(name = "campreg", about = "Camp registration backend", version)]
pub struct AppConfig {
    /// Socket address for the HTTP listener.
    #[arg(long, env = "CAMPREG_BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind_addr: SocketAddr,

    /// Path of the roster snapshot file.
    #[arg(long, env = "CAMPREG_DATA_FILE", default_value = "data/campers.json")]
    pub data_file: PathBuf,

    /// Directory where uploaded photos are kept.
    #[arg(long, env = "CAMPREG_ASSETS_DIR", default_value = "uploads")]
    pub assets_dir: PathBuf,

    /// Accepted values for the `area` field; empty means the built-in list.
    #[arg(long, env = "CAMPREG_AREAS", value_delimiter = ',')]
    pub areas: Vec<String>,

    /// Accepted values for the `team` field; empty means the built-in list.
    #[arg(long, env = "CAMPREG_TEAMS", value_delimiter = ',')]
    pub teams: Vec<String>,
}

impl AppConfig {
    /// Resolve the allow-list policy, falling back to the defaults for any
    /// list left unset.
    #[must_use]
    pub fn policy(&self) -> RosterPolicy {
        let mut policy = RosterPolicy::default();
        if !self.areas.is_empty() {
            policy.allowed_areas = self.areas.clone();
        }
        if !self.teams.is_empty() {
            policy.allowed_teams = self.teams.clone();
        }
        policy
    }
}
