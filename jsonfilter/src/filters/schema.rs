//! Resource column metadata

use std::collections::BTreeMap;

use serde::Deserialize;

use super::traits::ResourceMetadata;
use super::types::FieldType;
use crate::core::constants::DEFAULT_ROOT_ALIAS;

/// Table, root alias and mapped columns of a filterable resource
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceSchema {
    pub table: String,
    #[serde(default = "default_alias")]
    pub alias: String,
    #[serde(default)]
    pub columns: BTreeMap<String, FieldType>,
}

fn default_alias() -> String {
    DEFAULT_ROOT_ALIAS.to_string()
}

impl ResourceSchema {
    pub fn new(table: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            alias: alias.into(),
            columns: BTreeMap::new(),
        }
    }

    pub fn with_column(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.columns.insert(name.into(), field_type);
        self
    }
}

impl ResourceMetadata for ResourceSchema {
    fn is_property_mapped(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    fn field_type(&self, column: &str) -> Option<FieldType> {
        self.columns.get(column).copied()
    }
}
