//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation adapters
//! must implement. Persistence itself is a domain trait
//! ([`ObservationStore`](sighting_domain::ObservationStore)).

pub mod audit_log;
pub mod clock;
pub mod progress;
