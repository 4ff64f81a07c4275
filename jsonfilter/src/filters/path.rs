//! Filter path parsing
//!
//! A property identifier `config.a.b` names the JSON column `config` and the
//! key path `a,b`, the separator expected by PostgreSQL text-array paths.

use serde::Serialize;

use super::error::FilterError;
use crate::utils::sql::{is_safe_identifier, is_safe_json_key};

/// JSON column plus key path derived from a property identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterPath {
    pub column: String,
    pub key: String,
}

impl FilterPath {
    /// Split a dotted property identifier into column and key
    ///
    /// Never fails: a property without a dot yields an empty key.
    pub fn parse(property: &str) -> Self {
        match property.split_once('.') {
            Some((column, rest)) => Self {
                column: column.to_string(),
                key: rest.split('.').collect::<Vec<_>>().join(","),
            },
            None => Self {
                column: property.to_string(),
                key: String::new(),
            },
        }
    }

    /// Parse and reject paths that cannot be spliced into SQL text
    pub fn parse_checked(property: &str) -> Result<Self, FilterError> {
        let path = Self::parse(property);

        if !is_safe_identifier(&path.column) {
            return Err(FilterError::invalid_path(
                property,
                format!("\"{}\" is not a valid column name", path.column),
            ));
        }
        if path.key.is_empty() {
            return Err(FilterError::invalid_path(property, "missing JSON key"));
        }
        if let Some(bad) = path.key.split(',').find(|s| !is_safe_json_key(s)) {
            return Err(FilterError::invalid_path(
                property,
                format!("\"{}\" is not a valid JSON key", bad),
            ));
        }

        Ok(path)
    }
}
