//! PostgreSQL SQL dialect implementation

use super::SqlDialect;

/// PostgreSQL SQL dialect
pub struct PostgresDialect;

impl SqlDialect for PostgresDialect {
    fn placeholder(&self, index: usize) -> String {
        format!("${}", index)
    }

    fn json_extract_text(&self, col: &str, key: &str) -> String {
        // #>> works on both json and jsonb and takes a text[] path
        format!("{} #>> '{{{}}}'", col, key)
    }

    fn cast_to_string(&self, expr: &str) -> String {
        format!("{}::TEXT", expr)
    }
}
