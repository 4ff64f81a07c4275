//! PostgreSQL query builder
//!
//! Collects filter predicates with named placeholders (`:name`) and renders
//! them into positional SQL (`$1`, `$2`, ...) plus an executable sqlx query.

use std::collections::HashMap;

use sqlx::Postgres;
use sqlx::postgres::PgArguments;
use sqlx::query::Query;

use super::predicate::BoundParam;
use super::traits::{DatabasePlatform, ParameterNameGenerator, QueryBuilder};
use super::types::ParamValue;
use crate::data::sql::{Backend, PostgresDialect, SqlDialect};

/// Query over one root table that filters append to
#[derive(Debug, Clone)]
pub struct PgQueryBuilder {
    table: String,
    alias: String,
    predicates: Vec<String>,
    params: Vec<BoundParam>,
}

impl PgQueryBuilder {
    pub fn new(table: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            alias: alias.into(),
            predicates: Vec::new(),
            params: Vec::new(),
        }
    }

    pub fn predicates(&self) -> &[String] {
        &self.predicates
    }

    /// Bound parameters in binding order
    pub fn params(&self) -> &[BoundParam] {
        &self.params
    }

    /// AND-joined predicates with named placeholders
    pub fn where_clause(&self) -> Option<String> {
        if self.predicates.is_empty() {
            return None;
        }
        Some(self.predicates.join(" AND "))
    }

    /// Render `SELECT <select> FROM <table> <alias> [WHERE ...]` with positional placeholders
    pub fn to_sql(&self, select: &str) -> String {
        let mut sql = format!("SELECT {} FROM {} {}", select, self.table, self.alias);
        if let Some(clause) = self.where_clause() {
            sql.push_str(" WHERE ");
            sql.push_str(&render_placeholders(&clause, &self.params, &PostgresDialect));
        }
        sql
    }

    /// Bind every parameter, in order, onto a query for `sql`
    ///
    /// `sql` must come from [`to_sql`](Self::to_sql) on this builder.
    pub fn build<'q>(&self, sql: &'q str) -> Query<'q, Postgres, PgArguments> {
        self.params
            .iter()
            .fold(sqlx::query::<Postgres>(sql), |query, param| {
                match &param.value {
                    ParamValue::Int(i) => query.bind(*i),
                    ParamValue::Float(s) => query.bind(s.clone()),
                    ParamValue::Text(s) => query.bind(s.clone()),
                }
            })
    }
}

impl DatabasePlatform for PgQueryBuilder {
    fn backend(&self) -> Backend {
        Backend::Postgres
    }
}

impl QueryBuilder for PgQueryBuilder {
    fn root_alias(&self) -> &str {
        &self.alias
    }

    fn add_predicate(&mut self, sql: String) {
        self.predicates.push(sql);
    }

    fn bind_parameter(&mut self, name: String, value: ParamValue) {
        tracing::trace!(name = %name, sql_type = ?value.sql_type(), "Binding filter parameter");
        self.params.push(BoundParam { name, value });
    }
}

/// Replace `:name` placeholders with the dialect's positional form
///
/// Positions follow binding order; a name used twice maps to the same
/// position. `::TYPE` casts and text inside string literals are untouched.
pub fn render_placeholders(sql: &str, params: &[BoundParam], dialect: &dyn SqlDialect) -> String {
    let positions: HashMap<&str, usize> = params
        .iter()
        .enumerate()
        .map(|(i, p)| (p.name.as_str(), i + 1))
        .collect();

    let bytes = sql.as_bytes();
    let mut out = String::with_capacity(sql.len());
    let mut last = 0;
    let mut in_literal = false;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if b == b'\'' {
            in_literal = !in_literal;
        } else if !in_literal && b == b':' && (i == 0 || bytes[i - 1] != b':') {
            let start = i + 1;
            let mut end = start;
            while end < bytes.len() && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'_')
            {
                end += 1;
            }
            if end > start
                && !bytes[start].is_ascii_digit()
                && let Some(position) = positions.get(&sql[start..end])
            {
                out.push_str(&sql[last..i]);
                out.push_str(&dialect.placeholder(*position));
                last = end;
                i = end;
                continue;
            }
        }
        i += 1;
    }

    out.push_str(&sql[last..]);
    out
}

/// Generates `<seed>_p<n>` names from a per-query counter
#[derive(Debug, Default)]
pub struct SequentialNameGenerator {
    counter: usize,
}

impl SequentialNameGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ParameterNameGenerator for SequentialNameGenerator {
    fn generate(&mut self, seed: &str) -> String {
        let seed: String = seed
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect();
        let name = format!("{}_p{}", seed, self.counter);
        self.counter += 1;
        name
    }
}
