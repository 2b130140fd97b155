//! Persistence and lookup layer: the digitized-record store, keyword
//! search over it, and the resident/zone reference data.

pub mod directory;
pub mod store;

pub use directory::{
    ResidentDirectory, StaticResidentDirectory, StaticZoneRegistry, ZoneRegistry,
};
pub use store::{INDEX_FILE, RecordStore, StoreConfig, normalize_key};
