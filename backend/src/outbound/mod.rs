//! Driven adapters implementing the domain ports against the filesystem.

pub mod assets;
pub mod persistence;

pub use self::assets::FsAssetStore;
pub use self::persistence::JsonCamperStore;
