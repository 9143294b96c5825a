//! Infrastructure layer for sighting
//!
//! This crate contains adapters that implement the ports defined in the
//! domain and application layers: the observation store, the catalog
//! snapshot, the user directory, the JSONL audit log and configuration
//! file loading.

pub mod config;
pub mod directory;
pub mod logging;
pub mod store;

// Re-export commonly used types
pub use config::{ConfigLoader, FileAuditConfig, FileCatalogConfig, FileConfig, FileOutputConfig};
pub use directory::StaticUserDirectory;
pub use logging::JsonlVoteAuditLog;
pub use store::{CatalogSnapshot, InMemoryObservationStore, UserRecord};
