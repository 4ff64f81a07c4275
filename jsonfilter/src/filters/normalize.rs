//! Value normalization
//!
//! Coerces raw request values into typed sequences. Rejection is all or
//! nothing: one bad element drops the whole filter.

use super::outcome::IgnoredReason;
use super::types::{PropertyType, Scalar};

/// Type-checked filter values
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedValues {
    Strings(Vec<String>),
    Ints(Vec<i64>),
    /// Validated decimal literals, kept as written
    Floats(Vec<String>),
    Bool(bool),
}

/// Normalize raw values for the declared property type
pub fn normalize_values(
    values: &[Scalar],
    kind: PropertyType,
) -> Result<NormalizedValues, IgnoredReason> {
    let Some(first) = values.first() else {
        return Err(IgnoredReason::EmptyValue);
    };

    match kind {
        PropertyType::String => Ok(NormalizedValues::Strings(
            values.iter().map(|v| v.to_string()).collect(),
        )),
        PropertyType::Int => values
            .iter()
            .map(as_integer)
            .collect::<Option<Vec<_>>>()
            .map(NormalizedValues::Ints)
            .ok_or(IgnoredReason::InvalidNumeric),
        PropertyType::Float => values
            .iter()
            .map(as_decimal_text)
            .collect::<Option<Vec<_>>>()
            .map(NormalizedValues::Floats)
            .ok_or(IgnoredReason::InvalidNumeric),
        PropertyType::Bool => as_boolean(first)
            .map(NormalizedValues::Bool)
            .ok_or(IgnoredReason::InvalidBoolean),
    }
}

/// Decimal number text: optional sign, digits with optional fraction,
/// optional exponent, surrounding whitespace allowed
fn parse_numeric_text(s: &str) -> Option<f64> {
    let s = s.trim();
    let well_formed = s.chars().any(|c| c.is_ascii_digit())
        && s
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'));
    if !well_formed {
        return None;
    }
    s.parse::<f64>().ok().filter(|x| x.is_finite())
}

fn as_decimal_text(value: &Scalar) -> Option<String> {
    match value {
        Scalar::Int(i) => Some(i.to_string()),
        Scalar::Float(x) => x.is_finite().then(|| format!("{:?}", x)),
        Scalar::Text(s) => parse_numeric_text(s).map(|_| s.trim().to_string()),
        Scalar::Bool(_) => None,
    }
}

/// Integral values outside the `i64` range are rejected
fn float_to_integer(x: f64) -> Option<i64> {
    let in_range = x >= i64::MIN as f64 && x < i64::MAX as f64;
    (x.fract() == 0.0 && in_range).then_some(x as i64)
}

fn as_integer(value: &Scalar) -> Option<i64> {
    match value {
        Scalar::Int(i) => Some(*i),
        Scalar::Float(x) => float_to_integer(*x),
        Scalar::Text(s) => s
            .trim()
            .parse::<i64>()
            .ok()
            .or_else(|| parse_numeric_text(s).and_then(float_to_integer)),
        Scalar::Bool(_) => None,
    }
}

fn as_boolean(value: &Scalar) -> Option<bool> {
    match value {
        Scalar::Bool(b) => Some(*b),
        Scalar::Text(s) if s == "true" || s == "1" => Some(true),
        Scalar::Text(s) if s == "false" || s == "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(values: &[&str]) -> Vec<Scalar> {
        values.iter().map(|v| Scalar::text(*v)).collect()
    }

    #[test]
    fn empty_input_is_rejected_for_every_type() {
        for kind in [
            PropertyType::String,
            PropertyType::Int,
            PropertyType::Float,
            PropertyType::Bool,
        ] {
            assert_eq!(
                normalize_values(&[], kind),
                Err(IgnoredReason::EmptyValue),
                "{}",
                kind
            );
        }
    }

    #[test]
    fn strings_pass_through() {
        let values = vec![Scalar::text("Foo"), Scalar::Int(3), Scalar::Bool(true)];
        assert_eq!(
            normalize_values(&values, PropertyType::String),
            Ok(NormalizedValues::Strings(vec![
                "Foo".to_string(),
                "3".to_string(),
                "true".to_string()
            ]))
        );
    }

    #[test]
    fn ints_accept_numeric_text() {
        assert_eq!(
            normalize_values(&texts(&["1", " 2", "3.0", "-4", "5e1"]), PropertyType::Int),
            Ok(NormalizedValues::Ints(vec![1, 2, 3, -4, 50]))
        );
    }

    #[test]
    fn ints_reject_fractions() {
        assert_eq!(
            normalize_values(&texts(&["2.5"]), PropertyType::Int),
            Err(IgnoredReason::InvalidNumeric)
        );
    }

    #[test]
    fn one_bad_element_rejects_the_set() {
        assert_eq!(
            normalize_values(&texts(&["1", "two", "3"]), PropertyType::Int),
            Err(IgnoredReason::InvalidNumeric)
        );
        assert_eq!(
            normalize_values(&texts(&["1.5", "abc"]), PropertyType::Float),
            Err(IgnoredReason::InvalidNumeric)
        );
    }

    #[test]
    fn floats_accept_numbers_and_text() {
        let values = vec![Scalar::Int(1), Scalar::Float(2.5), Scalar::text(".5")];
        assert_eq!(
            normalize_values(&values, PropertyType::Float),
            Ok(NormalizedValues::Floats(vec![
                "1".to_string(),
                "2.5".to_string(),
                ".5".to_string()
            ]))
        );
    }

    #[test]
    fn floats_keep_written_form() {
        assert_eq!(
            normalize_values(&texts(&[" 1.0", "1.50", "2e3"]), PropertyType::Float),
            Ok(NormalizedValues::Floats(vec![
                "1.0".to_string(),
                "1.50".to_string(),
                "2e3".to_string()
            ]))
        );
        assert_eq!(
            normalize_values(&[Scalar::Float(1.0)], PropertyType::Float),
            Ok(NormalizedValues::Floats(vec!["1.0".to_string()]))
        );
    }

    #[test]
    fn ints_outside_i64_are_rejected() {
        assert_eq!(
            normalize_values(&texts(&["99999999999999999999"]), PropertyType::Int),
            Err(IgnoredReason::InvalidNumeric)
        );
        assert_eq!(
            normalize_values(&texts(&["9223372036854775807"]), PropertyType::Int),
            Ok(NormalizedValues::Ints(vec![i64::MAX]))
        );
    }

    #[test]
    fn non_decimal_text_is_not_numeric() {
        for text in ["inf", "NaN", "0x1A", "", " ", "1e", "--1", "1,5"] {
            assert_eq!(
                normalize_values(&texts(&[text]), PropertyType::Float),
                Err(IgnoredReason::InvalidNumeric),
                "{:?}",
                text
            );
        }
    }

    #[test]
    fn booleans_are_not_numeric() {
        assert_eq!(
            normalize_values(&[Scalar::Bool(true)], PropertyType::Int),
            Err(IgnoredReason::InvalidNumeric)
        );
    }

    #[test]
    fn bool_tokens() {
        let truthy = [Scalar::Bool(true), Scalar::text("true"), Scalar::text("1")];
        for value in truthy {
            assert_eq!(
                normalize_values(&[value.clone()], PropertyType::Bool),
                Ok(NormalizedValues::Bool(true)),
                "{:?}",
                value
            );
        }

        let falsy = [Scalar::Bool(false), Scalar::text("false"), Scalar::text("0")];
        for value in falsy {
            assert_eq!(
                normalize_values(&[value.clone()], PropertyType::Bool),
                Ok(NormalizedValues::Bool(false)),
                "{:?}",
                value
            );
        }
    }

    #[test]
    fn bool_is_case_sensitive_and_strict() {
        for text in ["TRUE", "False", "2", "yes", ""] {
            assert_eq!(
                normalize_values(&texts(&[text]), PropertyType::Bool),
                Err(IgnoredReason::InvalidBoolean),
                "{:?}",
                text
            );
        }
    }

    #[test]
    fn bool_rejects_json_integers() {
        for value in [Scalar::Int(1), Scalar::Int(0)] {
            assert_eq!(
                normalize_values(&[value.clone()], PropertyType::Bool),
                Err(IgnoredReason::InvalidBoolean),
                "{:?}",
                value
            );
        }
    }

    #[test]
    fn bool_uses_only_first_element() {
        assert_eq!(
            normalize_values(&texts(&["0", "garbage"]), PropertyType::Bool),
            Ok(NormalizedValues::Bool(false))
        );
    }
}
