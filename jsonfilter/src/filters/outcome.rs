//! Compilation outcomes
//!
//! Bad client input is not an error: the filter is dropped and the reason
//! returned so the caller can report it.

use std::collections::BTreeMap;

use serde::Serialize;

use super::predicate::Predicate;

/// Result of compiling one property filter
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FilterOutcome {
    /// Predicate was added to the query builder
    Applied { predicate: Predicate },
    /// A precondition did not hold; nothing to report
    Skipped { reason: SkipReason },
    /// Client input was rejected
    Ignored { reason: IgnoredReason },
}

impl FilterOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    pub fn predicate(&self) -> Option<&Predicate> {
        match self {
            Self::Applied { predicate } => Some(predicate),
            _ => None,
        }
    }

    pub fn ignored_reason(&self) -> Option<&IgnoredReason> {
        match self {
            Self::Ignored { reason } => Some(reason),
            _ => None,
        }
    }
}

/// Silent early exits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NullValue,
    PropertyNotEnabled,
    ColumnNotMapped,
    ColumnNotJson,
}

/// Client input errors, reported as notices
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IgnoredReason {
    InvalidStrategy { strategy: String },
    EmptyValue,
    InvalidNumeric,
    InvalidBoolean,
    UnsupportedMultiValueStrategy { strategy: String },
}

impl IgnoredReason {
    /// Short category used as the notice kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidStrategy { .. } => "Invalid filter strategy",
            _ => "Invalid filter ignored",
        }
    }

    pub fn message(&self, property: &str) -> String {
        match self {
            Self::InvalidStrategy { strategy } => format!(
                "Invalid filter strategy ({}) specified for \"{}\" property",
                strategy, property
            ),
            Self::EmptyValue => format!(
                "At least one value is required, multiple values should be in \
                 \"{0}[]=firstvalue&{0}[]=secondvalue\" format",
                property
            ),
            Self::InvalidNumeric => format!("Invalid numeric value for \"{}\" property", property),
            Self::InvalidBoolean => format!(
                "Invalid boolean value for \"{}\" property, expected one of ( \"true\" | \"false\" | \"1\" | \"0\" )",
                property
            ),
            Self::UnsupportedMultiValueStrategy { strategy } => format!(
                "\"{}\" strategy selected for \"{}\" property, but only \"exact\" strategy supports multiple values",
                strategy, property
            ),
        }
    }

    /// Structured fields attached to the notice
    pub fn context(&self, property: &str) -> BTreeMap<String, String> {
        let mut context = BTreeMap::new();
        context.insert("property".to_string(), property.to_string());
        match self {
            Self::InvalidStrategy { strategy } | Self::UnsupportedMultiValueStrategy { strategy } => {
                context.insert("strategy".to_string(), strategy.clone());
            }
            Self::EmptyValue | Self::InvalidNumeric | Self::InvalidBoolean => {}
        }
        context
    }
}
