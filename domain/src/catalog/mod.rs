//! Catalog persistence contracts.
//!
//! - [`repository::ObservationStore`]: load/save whole observation aggregates
//! - [`repository::StoreError`]: persistence failures

pub mod repository;
