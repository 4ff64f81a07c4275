//! Filter type definitions
//!
//! Configuration types (property type, matching strategy) and the raw and
//! bound value types that flow through the compiler.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::error::FilterError;
use super::path::FilterPath;

// =============================================================================
// Property Type
// =============================================================================

/// Declared value type of a JSON property
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    #[default]
    String,
    Int,
    Float,
    Bool,
}

impl PropertyType {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "string" => Some(Self::String),
            "int" => Some(Self::Int),
            "float" => Some(Self::Float),
            "bool" => Some(Self::Bool),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Strategy
// =============================================================================

/// String matching strategy without case handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseStrategy {
    Exact,
    Partial,
    Start,
    End,
    WordStart,
}

impl BaseStrategy {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "exact" => Some(Self::Exact),
            "partial" => Some(Self::Partial),
            "start" => Some(Self::Start),
            "end" => Some(Self::End),
            "word_start" => Some(Self::WordStart),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Partial => "partial",
            Self::Start => "start",
            Self::End => "end",
            Self::WordStart => "word_start",
        }
    }
}

/// Matching strategy decided once at configuration load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Strategy {
    pub base: BaseStrategy,
    pub case_sensitive: bool,
}

impl Strategy {
    pub const DEFAULT_TOKEN: &'static str = "exact";

    /// Parse one of the ten strategy tokens; an `i` prefix means case-insensitive
    pub fn from_token(token: &str) -> Option<Self> {
        if let Some(base) = BaseStrategy::from_token(token) {
            return Some(Self {
                base,
                case_sensitive: true,
            });
        }
        token
            .strip_prefix('i')
            .and_then(BaseStrategy::from_token)
            .map(|base| Self {
                base,
                case_sensitive: false,
            })
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.case_sensitive {
            f.write_str("i")?;
        }
        f.write_str(self.base.as_str())
    }
}

// =============================================================================
// Property Configuration
// =============================================================================

/// Property configuration as written in a resource definition
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPropertyConfig {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub strategy: Option<String>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub required: bool,
}

/// Accept `true`, `1`, `"yes"`, `"on"` and friends as a boolean flag
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Bool(b) => b,
        serde_json::Value::Number(n) => n.as_i64() == Some(1),
        serde_json::Value::String(s) => {
            matches!(s.trim().to_lowercase().as_str(), "1" | "true" | "on" | "yes")
        }
        _ => false,
    })
}

/// Validated configuration of one filterable JSON property
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyConfig {
    pub property: String,
    pub path: FilterPath,
    pub kind: PropertyType,
    /// Strategy as configured, kept for descriptions and diagnostics
    pub strategy_token: String,
    /// `None` when the token is not a known strategy
    pub strategy: Option<Strategy>,
    pub required: bool,
}

impl PropertyConfig {
    pub fn from_raw(property: &str, raw: &RawPropertyConfig) -> Result<Self, FilterError> {
        let path = FilterPath::parse_checked(property)?;

        let kind = match raw.kind.as_deref() {
            None => PropertyType::default(),
            Some(token) => {
                PropertyType::from_token(token).ok_or_else(|| FilterError::UnsupportedType {
                    property: property.to_string(),
                    kind: token.to_string(),
                })?
            }
        };

        let strategy_token = raw
            .strategy
            .clone()
            .unwrap_or_else(|| Strategy::DEFAULT_TOKEN.to_string());
        let strategy = Strategy::from_token(&strategy_token);
        if strategy.is_none() {
            tracing::warn!(
                property = %property,
                strategy = %strategy_token,
                "Unknown filter strategy, filter will be ignored"
            );
        }

        Ok(Self {
            property: property.to_string(),
            path,
            kind,
            strategy_token,
            strategy,
            required: raw.required,
        })
    }
}

/// Filterable properties of one resource, keyed by property name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterConfig {
    properties: BTreeMap<String, PropertyConfig>,
}

impl FilterConfig {
    /// Validate raw configuration; an unsupported type aborts loading
    pub fn from_raw<I>(raw: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = (String, RawPropertyConfig)>,
    {
        let mut properties = BTreeMap::new();
        for (property, raw_config) in raw {
            let config = PropertyConfig::from_raw(&property, &raw_config)?;
            properties.insert(property, config);
        }
        Ok(Self { properties })
    }

    pub fn get(&self, property: &str) -> Option<&PropertyConfig> {
        self.properties.get(property)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PropertyConfig> {
        self.properties.values()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

// =============================================================================
// Raw Request Values
// =============================================================================

/// Untyped scalar as received from a request
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{}", x),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// Filter value as received: one scalar or a `name[]` collection
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawValue {
    Many(Vec<Scalar>),
    One(Scalar),
}

impl RawValue {
    /// Coerce into an ordered sequence; a bare scalar becomes one element
    pub fn as_slice(&self) -> &[Scalar] {
        match self {
            Self::Many(values) => values,
            Self::One(value) => std::slice::from_ref(value),
        }
    }
}

// =============================================================================
// Bound Parameters
// =============================================================================

/// SQL type a parameter is bound with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlType {
    String,
    Integer,
    Float,
}

/// Value bound to a named query parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(i64),
    /// Decimal literal as written; JSON keeps `1.0` and `1` apart
    Float(String),
    Text(String),
}

impl ParamValue {
    pub fn sql_type(&self) -> SqlType {
        match self {
            Self::Int(_) => SqlType::Integer,
            Self::Float(_) => SqlType::Float,
            Self::Text(_) => SqlType::String,
        }
    }
}

// =============================================================================
// Resource Columns
// =============================================================================

/// Storage type of a mapped resource column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Json,
    Jsonb,
    Text,
    Integer,
    Bigint,
    Float,
    Boolean,
    Timestamp,
    Uuid,
}

impl FieldType {
    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json | Self::Jsonb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(kind: Option<&str>, strategy: Option<&str>) -> RawPropertyConfig {
        RawPropertyConfig {
            kind: kind.map(String::from),
            strategy: strategy.map(String::from),
            required: false,
        }
    }

    #[test]
    fn strategy_tokens() {
        let cases = [
            ("exact", BaseStrategy::Exact, true),
            ("partial", BaseStrategy::Partial, true),
            ("start", BaseStrategy::Start, true),
            ("end", BaseStrategy::End, true),
            ("word_start", BaseStrategy::WordStart, true),
            ("iexact", BaseStrategy::Exact, false),
            ("ipartial", BaseStrategy::Partial, false),
            ("istart", BaseStrategy::Start, false),
            ("iend", BaseStrategy::End, false),
            ("iword_start", BaseStrategy::WordStart, false),
        ];

        for (token, base, case_sensitive) in cases {
            let strategy = Strategy::from_token(token).unwrap();
            assert_eq!(strategy.base, base, "{}", token);
            assert_eq!(strategy.case_sensitive, case_sensitive, "{}", token);
            assert_eq!(strategy.to_string(), token);
        }
    }

    #[test]
    fn strategy_rejects_unknown_tokens() {
        assert_eq!(Strategy::from_token("fuzzy"), None);
        assert_eq!(Strategy::from_token("iiexact"), None);
        assert_eq!(Strategy::from_token("EXACT"), None);
        assert_eq!(Strategy::from_token(""), None);
    }

    #[test]
    fn property_config_defaults() {
        let config = PropertyConfig::from_raw("config.type", &raw(None, None)).unwrap();
        assert_eq!(config.kind, PropertyType::String);
        assert_eq!(config.strategy_token, "exact");
        assert_eq!(
            config.strategy,
            Some(Strategy {
                base: BaseStrategy::Exact,
                case_sensitive: true
            })
        );
        assert!(!config.required);
        assert_eq!(config.path.column, "config");
    }

    #[test]
    fn property_config_unsupported_type_fails() {
        let err = PropertyConfig::from_raw("config.created", &raw(Some("date"), None)).unwrap_err();
        assert_eq!(
            err,
            FilterError::UnsupportedType {
                property: "config.created".to_string(),
                kind: "date".to_string(),
            }
        );
    }

    #[test]
    fn property_config_keeps_unknown_strategy() {
        let config = PropertyConfig::from_raw("config.type", &raw(None, Some("fuzzy"))).unwrap();
        assert_eq!(config.strategy, None);
        assert_eq!(config.strategy_token, "fuzzy");
    }

    #[test]
    fn raw_property_config_required_flag() {
        let cases = [
            (r#"{"required": true}"#, true),
            (r#"{"required": "yes"}"#, true),
            (r#"{"required": "1"}"#, true),
            (r#"{"required": 1}"#, true),
            (r#"{"required": "false"}"#, false),
            (r#"{"required": 0}"#, false),
            (r#"{}"#, false),
        ];
        for (json, expected) in cases {
            let config: RawPropertyConfig = serde_json::from_str(json).unwrap();
            assert_eq!(config.required, expected, "{}", json);
        }
    }

    #[test]
    fn filter_config_from_raw() {
        let raw_configs = vec![
            ("config.type".to_string(), raw(Some("string"), Some("ipartial"))),
            ("config.level".to_string(), raw(Some("int"), None)),
        ];
        let config = FilterConfig::from_raw(raw_configs).unwrap();
        assert_eq!(config.len(), 2);
        assert!(config.get("config.type").is_some());
        assert!(config.get("config.other").is_none());
        assert_eq!(config.get("config.level").unwrap().kind, PropertyType::Int);
    }

    #[test]
    fn raw_value_deserialize() {
        let one: RawValue = serde_json::from_str(r#""abc""#).unwrap();
        assert_eq!(one, RawValue::One(Scalar::text("abc")));

        let many: RawValue = serde_json::from_str(r#"[1, 2.5, true, "x"]"#).unwrap();
        assert_eq!(
            many,
            RawValue::Many(vec![
                Scalar::Int(1),
                Scalar::Float(2.5),
                Scalar::Bool(true),
                Scalar::text("x"),
            ])
        );

        let null: Option<RawValue> = serde_json::from_str("null").unwrap();
        assert_eq!(null, None);
    }

    #[test]
    fn raw_value_as_slice() {
        assert_eq!(RawValue::One(Scalar::Int(3)).as_slice(), &[Scalar::Int(3)]);
        assert!(RawValue::Many(vec![]).as_slice().is_empty());
    }

    #[test]
    fn param_value_sql_type() {
        assert_eq!(ParamValue::Int(1).sql_type(), SqlType::Integer);
        assert_eq!(ParamValue::Float("1.5".into()).sql_type(), SqlType::Float);
        assert_eq!(ParamValue::Text("a".into()).sql_type(), SqlType::String);
    }

    #[test]
    fn field_type_is_json() {
        assert!(FieldType::Json.is_json());
        assert!(FieldType::Jsonb.is_json());
        assert!(!FieldType::Text.is_json());
    }
}
