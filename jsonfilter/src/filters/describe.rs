//! Filter description
//!
//! Advertises the query parameters a resource accepts. Properties that take
//! several values get a second `name[]` entry.

use std::collections::BTreeMap;

use serde::Serialize;

use super::types::{FilterConfig, PropertyConfig, PropertyType};

/// Suffix of multi-value query parameter names
pub const COLLECTION_SUFFIX: &str = "[]";

/// One accepted query parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterDescriptor {
    pub property: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub strategy: String,
    pub required: bool,
    pub is_collection: bool,
}

/// Whether a property advertises the `name[]` form
fn accepts_collection(config: &PropertyConfig) -> bool {
    match config.kind {
        PropertyType::Int | PropertyType::Float => true,
        PropertyType::String => config.strategy_token == "exact",
        PropertyType::Bool => false,
    }
}

pub fn describe(config: &FilterConfig) -> BTreeMap<String, FilterDescriptor> {
    let mut description = BTreeMap::new();

    for property in config.iter() {
        let mut parameter_names = vec![property.property.clone()];
        if accepts_collection(property) {
            parameter_names.push(format!("{}{}", property.property, COLLECTION_SUFFIX));
        }

        for name in parameter_names {
            let descriptor = FilterDescriptor {
                property: property.property.clone(),
                kind: property.kind.as_str().to_string(),
                strategy: property.strategy_token.clone(),
                required: property.required,
                is_collection: name.ends_with(COLLECTION_SUFFIX),
            };
            description.insert(name, descriptor);
        }
    }

    description
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::types::RawPropertyConfig;

    fn config(entries: &[(&str, &str, &str, bool)]) -> FilterConfig {
        FilterConfig::from_raw(entries.iter().map(|(property, kind, strategy, required)| {
            (
                property.to_string(),
                RawPropertyConfig {
                    kind: Some(kind.to_string()),
                    strategy: Some(strategy.to_string()),
                    required: *required,
                },
            )
        }))
        .unwrap()
    }

    #[test]
    fn numeric_and_exact_string_get_collection_entry() {
        let description = describe(&config(&[
            ("config.level", "int", "exact", false),
            ("config.score", "float", "exact", false),
            ("config.type", "string", "exact", true),
        ]));

        assert_eq!(description.len(), 6);
        let collection = &description["config.type[]"];
        assert!(collection.is_collection);
        assert_eq!(collection.property, "config.type");
        assert!(collection.required);
        assert!(!description["config.type"].is_collection);
        assert!(description.contains_key("config.level[]"));
        assert!(description.contains_key("config.score[]"));
    }

    #[test]
    fn other_strategies_and_bool_are_single_valued() {
        let description = describe(&config(&[
            ("config.name", "string", "partial", false),
            ("config.code", "string", "iexact", false),
            ("config.active", "bool", "exact", false),
        ]));

        assert_eq!(description.len(), 3);
        assert!(description.values().all(|d| !d.is_collection));
    }

    #[test]
    fn descriptor_serializes_type_field() {
        let description = describe(&config(&[("config.level", "int", "exact", false)]));
        let json = serde_json::to_value(&description["config.level"]).unwrap();
        assert_eq!(json["type"], "int");
        assert_eq!(json["strategy"], "exact");
        assert_eq!(json["is_collection"], false);
    }

    #[test]
    fn empty_config_describes_nothing() {
        assert!(describe(&FilterConfig::default()).is_empty());
    }
}
