//! Predicate fragments
//!
//! Pure SQL text builders. Values never appear here: callers pass the
//! placeholder expression and bind the value separately.

use serde::Serialize;

use super::types::{BaseStrategy, ParamValue, Strategy};
use crate::data::sql::SqlDialect;

/// A named parameter and the value bound to it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundParam {
    pub name: String,
    pub value: ParamValue,
}

/// SQL fragment plus the parameters it references
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Predicate {
    pub sql: String,
    pub params: Vec<BoundParam>,
}

impl Predicate {
    pub fn bind(&mut self, name: impl Into<String>, value: ParamValue) {
        self.params.push(BoundParam {
            name: name.into(),
            value,
        });
    }
}

/// Named placeholder as written in predicate fragments
pub fn named_placeholder(name: &str) -> String {
    format!(":{}", name)
}

/// Build a single comparison against the text at `key` inside `column_ref`
///
/// `exact_match` selects `=` over `LIKE`. When not `case_sensitive` the
/// extracted text is wrapped in `LOWER(...)`; the caller lower-cases the value.
pub fn build_comparison(
    dialect: &dyn SqlDialect,
    column_ref: &str,
    key: &str,
    exact_match: bool,
    placeholder: &str,
    case_sensitive: bool,
) -> String {
    let extracted = dialect.json_extract_text(column_ref, key);
    let lhs = if case_sensitive {
        extracted
    } else {
        dialect.lower(&extracted)
    };

    if exact_match {
        format!("{} = {}", lhs, placeholder)
    } else {
        format!("{} LIKE {} ESCAPE '\\'", lhs, placeholder)
    }
}

/// Build the fragment for a string strategy
///
/// LIKE wildcards are constants in the SQL text around the placeholder.
pub fn build_strategy(
    dialect: &dyn SqlDialect,
    column_ref: &str,
    key: &str,
    strategy: Strategy,
    placeholder: &str,
) -> String {
    let cs = strategy.case_sensitive;
    let like = |pattern: String| build_comparison(dialect, column_ref, key, false, &pattern, cs);

    match strategy.base {
        BaseStrategy::Exact => build_comparison(dialect, column_ref, key, true, placeholder, cs),
        BaseStrategy::Partial => like(dialect.concat(&["'%'", placeholder, "'%'"])),
        BaseStrategy::Start => like(dialect.concat(&[placeholder, "'%'"])),
        BaseStrategy::End => like(dialect.concat(&["'%'", placeholder])),
        BaseStrategy::WordStart => format!(
            "({} OR {})",
            like(dialect.concat(&[placeholder, "'%'"])),
            like(dialect.concat(&["'% '", placeholder, "'%'"]))
        ),
    }
}

/// OR-join fragments into one parenthesized group
pub fn or_group(fragments: &[String]) -> String {
    format!("({})", fragments.join(" OR "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sql::PostgresDialect;

    fn strategy(base: BaseStrategy, case_sensitive: bool) -> Strategy {
        Strategy {
            base,
            case_sensitive,
        }
    }

    #[test]
    fn comparison_exact_case_sensitive() {
        let sql = build_comparison(&PostgresDialect, "o.config", "type", true, ":p", true);
        assert_eq!(sql, "o.config #>> '{type}' = :p");
    }

    #[test]
    fn comparison_like_case_insensitive() {
        let sql = build_comparison(&PostgresDialect, "o.config", "a,b", false, ":p", false);
        assert_eq!(sql, r"LOWER(o.config #>> '{a,b}') LIKE :p ESCAPE '\'");
    }

    #[test]
    fn comparison_never_references_bare_column() {
        for exact in [true, false] {
            for cs in [true, false] {
                let sql = build_comparison(&PostgresDialect, "o.config", "k", exact, ":p", cs);
                assert!(sql.contains("o.config #>> '{k}'"), "{}", sql);
            }
        }
    }

    #[test]
    fn strategy_partial() {
        let sql = build_strategy(
            &PostgresDialect,
            "o.config",
            "type",
            strategy(BaseStrategy::Partial, true),
            ":p",
        );
        assert_eq!(
            sql,
            r"o.config #>> '{type}' LIKE CONCAT('%', :p, '%') ESCAPE '\'"
        );
    }

    #[test]
    fn strategy_start_and_end() {
        let start = build_strategy(
            &PostgresDialect,
            "o.config",
            "type",
            strategy(BaseStrategy::Start, true),
            ":p",
        );
        assert_eq!(start, r"o.config #>> '{type}' LIKE CONCAT(:p, '%') ESCAPE '\'");

        let end = build_strategy(
            &PostgresDialect,
            "o.config",
            "type",
            strategy(BaseStrategy::End, false),
            ":p",
        );
        assert_eq!(
            end,
            r"LOWER(o.config #>> '{type}') LIKE CONCAT('%', :p) ESCAPE '\'"
        );
    }

    #[test]
    fn strategy_word_start_has_two_branches() {
        let sql = build_strategy(
            &PostgresDialect,
            "o.config",
            "name",
            strategy(BaseStrategy::WordStart, true),
            ":p",
        );
        assert_eq!(
            sql,
            "(o.config #>> '{name}' LIKE CONCAT(:p, '%') ESCAPE '\\' \
             OR o.config #>> '{name}' LIKE CONCAT('% ', :p, '%') ESCAPE '\\')"
        );
    }

    #[test]
    fn or_group_joins() {
        let sql = or_group(&["a = :x".to_string(), "a = :y".to_string()]);
        assert_eq!(sql, "(a = :x OR a = :y)");
    }

    #[test]
    fn predicate_bind_appends() {
        let mut predicate = Predicate::default();
        predicate.bind("p0", ParamValue::Int(1));
        predicate.bind("p1", ParamValue::Text("a".into()));
        assert_eq!(predicate.params.len(), 2);
        assert_eq!(predicate.params[0].name, "p0");
    }
}
