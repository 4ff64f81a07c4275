//! Collaborator traits
//!
//! The compiler does not own a query, a schema or a logger. The host system
//! provides them through these traits; `filters::query`, `filters::schema`
//! and `filters::diagnostics` hold the implementations used by this crate.

use std::collections::BTreeMap;

use super::types::{FieldType, ParamValue};
use crate::data::sql::Backend;

/// Identifies the engine behind the active connection
pub trait DatabasePlatform {
    fn backend(&self) -> Backend;
}

/// Query under construction that filters append to
///
/// Predicates are AND-ed together by the builder.
pub trait QueryBuilder: DatabasePlatform {
    /// Alias of the root table (e.g. `o` in `FROM subscription o`)
    fn root_alias(&self) -> &str;

    fn add_predicate(&mut self, sql: String);

    fn bind_parameter(&mut self, name: String, value: ParamValue);
}

/// Source of parameter names
///
/// Must never return the same name twice for one query builder.
pub trait ParameterNameGenerator {
    fn generate(&mut self, seed: &str) -> String;
}

/// Column metadata of the filtered resource
pub trait ResourceMetadata {
    fn is_property_mapped(&self, column: &str) -> bool;

    fn field_type(&self, column: &str) -> Option<FieldType>;

    fn is_json_field(&self, column: &str) -> bool {
        self.field_type(column).is_some_and(|t| t.is_json())
    }
}

/// Best-effort channel for filters that were ignored
pub trait DiagnosticsSink {
    fn notice(&self, kind: &str, message: &str, context: &BTreeMap<String, String>);
}
