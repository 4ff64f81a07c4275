//! JSON property filters
//!
//! Compiles per-property filter configuration and raw request values into
//! parameterized predicates on JSON columns (PostgreSQL `#>>` extraction).
//!
//! ## Usage
//!
//! ```no_run
//! use jsonfilter::filters::{
//!     FieldType, JsonFilter, PgQueryBuilder, RawPropertyConfig, RawValue, ResourceSchema,
//!     SequentialNameGenerator, TracingDiagnostics,
//! };
//!
//! let filter = JsonFilter::from_raw([(
//!     "config.type".to_string(),
//!     RawPropertyConfig {
//!         kind: Some("string".into()),
//!         strategy: Some("ipartial".into()),
//!         required: false,
//!     },
//! )])
//! .unwrap();
//! let schema = ResourceSchema::new("user", "o").with_column("config", FieldType::Json);
//! let mut qb = PgQueryBuilder::new("user", "o");
//! let mut names = SequentialNameGenerator::new();
//! let value: RawValue = serde_json::from_str(r#""Gold""#).unwrap();
//! filter
//!     .filter_property("config.type", Some(&value), &mut qb, &mut names, &schema, &TracingDiagnostics)
//!     .unwrap();
//! let sql = qb.to_sql("*");
//! ```

mod compiler;
mod describe;
mod diagnostics;
mod error;
mod normalize;
mod outcome;
mod path;
mod predicate;
mod query;
mod request;
mod schema;
mod traits;
mod types;

pub use compiler::JsonFilter;
pub use describe::{COLLECTION_SUFFIX, FilterDescriptor};
pub use diagnostics::{CollectingDiagnostics, Notice, TracingDiagnostics};
pub use error::FilterError;
pub use normalize::{NormalizedValues, normalize_values};
pub use outcome::{FilterOutcome, IgnoredReason, SkipReason};
pub use path::FilterPath;
pub use predicate::{BoundParam, Predicate, build_comparison, build_strategy};
pub use query::{PgQueryBuilder, SequentialNameGenerator, render_placeholders};
pub use request::{parse_pairs, split_pair};
pub use schema::ResourceSchema;
pub use traits::{
    DatabasePlatform, DiagnosticsSink, ParameterNameGenerator, QueryBuilder, ResourceMetadata,
};
pub use types::{
    BaseStrategy, FieldType, FilterConfig, ParamValue, PropertyConfig, PropertyType,
    RawPropertyConfig, RawValue, Scalar, SqlType, Strategy,
};
