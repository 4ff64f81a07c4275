//! JSON property filter compiler
//!
//! Turns a configured property (`config.type`) and the raw request value into
//! a predicate on the JSON column, with every value bound as a parameter.
//!
//! Only PostgreSQL is supported: the active platform is checked on every call.

use std::collections::BTreeMap;

use super::describe::{FilterDescriptor, describe};
use super::error::FilterError;
use super::normalize::{NormalizedValues, normalize_values};
use super::outcome::{FilterOutcome, IgnoredReason, SkipReason};
use super::predicate::{
    Predicate, build_comparison, build_strategy, named_placeholder, or_group,
};
use super::traits::{DiagnosticsSink, ParameterNameGenerator, QueryBuilder, ResourceMetadata};
use super::types::{
    BaseStrategy, FilterConfig, ParamValue, RawPropertyConfig, RawValue, Strategy,
};
use crate::data::sql::SqlDialect;
use crate::utils::sql::escape_like_pattern;

const TRUE_VALUE: &str = "true";
const FALSE_VALUE: &str = "false";

/// Filter over JSON properties of one resource
///
/// Immutable after construction; share it across requests.
#[derive(Debug, Clone)]
pub struct JsonFilter {
    config: FilterConfig,
}

/// Where a predicate points: dialect, `alias.column` and the key path
struct Target<'a> {
    dialect: &'static dyn SqlDialect,
    column_ref: String,
    key: &'a str,
    seed: &'a str,
}

impl JsonFilter {
    pub fn new(config: FilterConfig) -> Self {
        Self { config }
    }

    /// Build from raw property configuration
    pub fn from_raw<I>(raw: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = (String, RawPropertyConfig)>,
    {
        Ok(Self::new(FilterConfig::from_raw(raw)?))
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Describe the accepted query parameters, keyed by parameter name
    pub fn describe(&self) -> BTreeMap<String, FilterDescriptor> {
        describe(&self.config)
    }

    /// Compile one property filter and register it with the query builder
    ///
    /// Returns `Err` only for platform or configuration defects. Bad input
    /// comes back as [`FilterOutcome::Ignored`] and leaves the builder as is.
    pub fn compile(
        &self,
        property: &str,
        value: Option<&RawValue>,
        qb: &mut dyn QueryBuilder,
        names: &mut dyn ParameterNameGenerator,
        resource: &dyn ResourceMetadata,
    ) -> Result<FilterOutcome, FilterError> {
        let backend = qb.backend();
        let dialect = backend
            .json_dialect()
            .ok_or(FilterError::InvalidPlatform { found: backend })?;

        let Some(value) = value else {
            return Ok(skipped(SkipReason::NullValue));
        };
        let Some(config) = self.config.get(property) else {
            return Ok(skipped(SkipReason::PropertyNotEnabled));
        };

        let column = config.path.column.as_str();
        if !resource.is_property_mapped(column) {
            return Ok(skipped(SkipReason::ColumnNotMapped));
        }
        if !resource.is_json_field(column) {
            return Ok(skipped(SkipReason::ColumnNotJson));
        }

        let Some(strategy) = config.strategy else {
            return Ok(ignored(IgnoredReason::InvalidStrategy {
                strategy: config.strategy_token.clone(),
            }));
        };

        let values = match normalize_values(value.as_slice(), config.kind) {
            Ok(values) => values,
            Err(reason) => return Ok(ignored(reason)),
        };

        let target = Target {
            dialect,
            column_ref: format!("{}.{}", qb.root_alias(), column),
            key: &config.path.key,
            seed: column,
        };

        let predicate = match values {
            NormalizedValues::Strings(values) => string_predicate(&target, strategy, &values, names),
            NormalizedValues::Ints(values) => Ok(numeric_predicate(
                &target,
                values.into_iter().map(ParamValue::Int).collect(),
                names,
            )),
            NormalizedValues::Floats(values) => Ok(numeric_predicate(
                &target,
                values.into_iter().map(ParamValue::Float).collect(),
                names,
            )),
            NormalizedValues::Bool(value) => Ok(boolean_predicate(&target, value, names)),
        };

        match predicate {
            Ok(predicate) => {
                register(qb, &predicate);
                tracing::debug!(
                    property = %property,
                    kind = %config.kind,
                    sql = %predicate.sql,
                    params = predicate.params.len(),
                    "JSON filter applied"
                );
                Ok(FilterOutcome::Applied { predicate })
            }
            Err(reason) => Ok(ignored(reason)),
        }
    }

    /// Compile and report ignored input to `sink`
    pub fn filter_property(
        &self,
        property: &str,
        value: Option<&RawValue>,
        qb: &mut dyn QueryBuilder,
        names: &mut dyn ParameterNameGenerator,
        resource: &dyn ResourceMetadata,
        sink: &dyn DiagnosticsSink,
    ) -> Result<FilterOutcome, FilterError> {
        let outcome = self.compile(property, value, qb, names, resource)?;
        if let FilterOutcome::Ignored { reason } = &outcome {
            sink.notice(
                reason.kind(),
                &reason.message(property),
                &reason.context(property),
            );
        }
        Ok(outcome)
    }

    /// Apply every filter of a request; stops at the first system error
    pub fn apply(
        &self,
        request: &BTreeMap<String, RawValue>,
        qb: &mut dyn QueryBuilder,
        names: &mut dyn ParameterNameGenerator,
        resource: &dyn ResourceMetadata,
        sink: &dyn DiagnosticsSink,
    ) -> Result<Vec<(String, FilterOutcome)>, FilterError> {
        let mut outcomes = Vec::with_capacity(request.len());
        for (property, value) in request {
            let outcome =
                self.filter_property(property, Some(value), qb, names, resource, sink)?;
            outcomes.push((property.clone(), outcome));
        }
        Ok(outcomes)
    }

    /// Required properties absent from `request`
    pub fn missing_required<'a>(&'a self, request: &BTreeMap<String, RawValue>) -> Vec<&'a str> {
        self.config
            .iter()
            .filter(|c| c.required && !request.contains_key(&c.property))
            .map(|c| c.property.as_str())
            .collect()
    }
}

fn skipped(reason: SkipReason) -> FilterOutcome {
    FilterOutcome::Skipped { reason }
}

fn ignored(reason: IgnoredReason) -> FilterOutcome {
    FilterOutcome::Ignored { reason }
}

fn register(qb: &mut dyn QueryBuilder, predicate: &Predicate) {
    qb.add_predicate(predicate.sql.clone());
    for param in &predicate.params {
        qb.bind_parameter(param.name.clone(), param.value.clone());
    }
}

fn string_predicate(
    target: &Target<'_>,
    strategy: Strategy,
    values: &[String],
    names: &mut dyn ParameterNameGenerator,
) -> Result<Predicate, IgnoredReason> {
    let case_sensitive = strategy.case_sensitive;
    let fold = |value: &str| {
        if case_sensitive {
            value.to_string()
        } else {
            value.to_lowercase()
        }
    };

    let mut predicate = Predicate::default();

    if let [value] = values {
        let name = names.generate(target.seed);
        predicate.sql = build_strategy(
            target.dialect,
            &target.column_ref,
            target.key,
            strategy,
            &named_placeholder(&name),
        );
        let value = match strategy.base {
            BaseStrategy::Exact => fold(value.as_str()),
            _ => escape_like_pattern(&fold(value.as_str())),
        };
        predicate.bind(name, ParamValue::Text(value));
        return Ok(predicate);
    }

    if strategy.base != BaseStrategy::Exact {
        return Err(IgnoredReason::UnsupportedMultiValueStrategy {
            strategy: strategy.base.as_str().to_string(),
        });
    }

    let mut fragments = Vec::with_capacity(values.len());
    for value in values {
        let name = names.generate(target.seed);
        fragments.push(build_comparison(
            target.dialect,
            &target.column_ref,
            target.key,
            true,
            &named_placeholder(&name),
            case_sensitive,
        ));
        predicate.bind(name, ParamValue::Text(fold(value.as_str())));
    }
    predicate.sql = or_group(&fragments);
    Ok(predicate)
}

/// Numbers are compared against the extracted text, so the bound value is cast
fn numeric_predicate(
    target: &Target<'_>,
    values: Vec<ParamValue>,
    names: &mut dyn ParameterNameGenerator,
) -> Predicate {
    let mut predicate = Predicate::default();
    let mut fragments = Vec::with_capacity(values.len());

    for value in values {
        let name = names.generate(target.seed);
        let placeholder = target.dialect.cast_to_string(&named_placeholder(&name));
        fragments.push(build_comparison(
            target.dialect,
            &target.column_ref,
            target.key,
            true,
            &placeholder,
            true,
        ));
        predicate.bind(name, value);
    }

    predicate.sql = match fragments.as_slice() {
        [single] => single.clone(),
        _ => or_group(&fragments),
    };
    predicate
}

/// JSON booleans extract as the text `true` / `false`
fn boolean_predicate(
    target: &Target<'_>,
    value: bool,
    names: &mut dyn ParameterNameGenerator,
) -> Predicate {
    let name = names.generate(target.seed);
    let mut predicate = Predicate {
        sql: or_group(&[build_comparison(
            target.dialect,
            &target.column_ref,
            target.key,
            true,
            &named_placeholder(&name),
            true,
        )]),
        params: Vec::new(),
    };
    let text = if value { TRUE_VALUE } else { FALSE_VALUE };
    predicate.bind(name, ParamValue::Text(text.to_string()));
    predicate
}

#[cfg(test)]
#[path = "compiler_tests.rs"]
mod tests;
