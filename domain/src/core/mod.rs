//! Core domain concepts shared across all subdomains.
//!
//! - [`ids`]: user, observation and naming identifiers
//! - [`name::TaxonName`]: a validated proposed name
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod ids;
pub mod name;
