//! Taxon name value object

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// A proposed scientific or common name (Value Object)
///
/// Names are compared by their trimmed text; two namings proposing the same
/// text propose the same name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaxonName {
    text: String,
}

impl TaxonName {
    /// Try to create a name, rejecting empty or whitespace-only text
    pub fn new(text: impl Into<String>) -> Result<Self, DomainError> {
        let text = text.into();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidName(text));
        }
        Ok(Self {
            text: trimmed.to_string(),
        })
    }

    /// Get the name text
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl std::fmt::Display for TaxonName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl TryFrom<String> for TaxonName {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl TryFrom<&str> for TaxonName {
    type Error = DomainError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<TaxonName> for String {
    fn from(name: TaxonName) -> Self {
        name.text
    }
}
