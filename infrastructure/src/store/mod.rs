//! Observation store adapters
//!
//! - [`InMemoryObservationStore`] implements the domain
//!   [`ObservationStore`](sighting_domain::ObservationStore) port
//! - [`CatalogSnapshot`] loads and saves the store contents as JSON

mod memory;
mod snapshot;

pub use memory::InMemoryObservationStore;
pub use snapshot::{CatalogSnapshot, UserRecord};
