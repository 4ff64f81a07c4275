//! Filter error types
//!
//! Only system and configuration defects surface as errors. Bad client input
//! never does: it becomes [`FilterOutcome::Ignored`](super::FilterOutcome).

use thiserror::Error;

use crate::data::sql::Backend;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// The active connection does not target a JSON-capable engine
    #[error("Invalid database platform: postgres required but {found} found")]
    InvalidPlatform { found: Backend },

    /// A property declares a type outside string, int, float, bool
    #[error("Type \"{kind}\" specified for property \"{property}\" is not supported")]
    UnsupportedType { property: String, kind: String },

    /// A property path cannot be safely placed into SQL text
    #[error("Invalid filter path \"{property}\": {reason}")]
    InvalidPath { property: String, reason: String },
}

impl FilterError {
    pub fn invalid_path(property: &str, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            property: property.to_string(),
            reason: reason.into(),
        }
    }
}
