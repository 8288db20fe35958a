//! Persistence adapters for the camper store port.

mod json_store;

pub use json_store::JsonCamperStore;
