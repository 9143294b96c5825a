//! Progress reporters for long-running operations

pub mod reporter;
