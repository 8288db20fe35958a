//! Inbound adapters: interfaces through which the outside world drives the
//! application.

pub mod http;
