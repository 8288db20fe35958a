//! Camp registration backend library.
//!
//! Hexagonal layout: `domain` holds the roster rules and ports, `inbound`
//! and `outbound` hold the adapters, `server` wires them together.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

pub use doc::ApiDoc;
pub use middleware::RequestLog;
