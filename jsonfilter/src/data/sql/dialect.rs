//! SQL dialect trait for JSON filter generation
//!
//! This trait defines the interface for generating database-specific SQL syntax
//! used by the JSON filter compiler.

/// SQL dialect trait for generating database-specific SQL
///
/// Different databases have different syntax for:
/// - Parameter placeholders (? vs $1)
/// - Extracting text from a JSON document
/// - Type casting
pub trait SqlDialect: Send + Sync {
    /// Generate a parameter placeholder for the given index (1-based)
    ///
    /// - PostgreSQL: Returns "$1", "$2", etc.
    fn placeholder(&self, index: usize) -> String;

    /// Extract the value at a JSON key path as text
    ///
    /// `key` holds the path segments joined with `,`.
    ///
    /// - PostgreSQL: `col #>> '{a,b}'`
    fn json_extract_text(&self, col: &str, key: &str) -> String;

    /// Cast an expression to string type
    ///
    /// - PostgreSQL: `expr::TEXT`
    fn cast_to_string(&self, expr: &str) -> String;

    /// Lower-case a text expression
    fn lower(&self, expr: &str) -> String {
        format!("LOWER({})", expr)
    }

    /// Concatenate text expressions
    fn concat(&self, parts: &[&str]) -> String {
        format!("CONCAT({})", parts.join(", "))
    }
}
