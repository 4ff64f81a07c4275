//! Filter request parsing
//!
//! Groups `name=value` query pairs by property. `name[]=a&name[]=b` collects
//! into a multi-value entry; a plain `name=value` repeated keeps the last one.

use std::collections::BTreeMap;

use super::describe::COLLECTION_SUFFIX;
use super::types::{RawValue, Scalar};

/// Build filter values from query pairs, in order
pub fn parse_pairs<I, K, V>(pairs: I) -> BTreeMap<String, RawValue>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let mut request: BTreeMap<String, RawValue> = BTreeMap::new();

    for (key, value) in pairs {
        let key = key.as_ref();
        let value = Scalar::Text(value.into());

        match key.strip_suffix(COLLECTION_SUFFIX) {
            Some(property) => match request.get_mut(property) {
                Some(RawValue::Many(values)) => values.push(value),
                _ => {
                    request.insert(property.to_string(), RawValue::Many(vec![value]));
                }
            },
            None => {
                request.insert(key.to_string(), RawValue::One(value));
            }
        }
    }

    request
}

/// Split `name=value`; a missing `=` yields an empty value
pub fn split_pair(pair: &str) -> (&str, &str) {
    pair.split_once('=').unwrap_or((pair, ""))
}
