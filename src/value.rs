use std::collections::hash_map::{self, HashMap};
use std::ops::Index;

use crate::{errors::ParseError, query::PARSER};

#[cfg(feature = "serde")]
use serde::Serialize;

/// One `key[nested]...=value` fragment of a query string.
///
/// `nested_keys` is `None` when the key had no (well formed) bracket
/// nesting, and never `Some` of an empty list.
#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Value {
    pub top_level_key: String,
    pub nested_keys: Option<Vec<String>>,
    pub value: String,
}

impl Value {
    pub fn new(top_level_key: String, nested_keys: Option<Vec<String>>, value: String) -> Self {
        Self {
            top_level_key,
            nested_keys,
            value,
        }
    }

    pub fn nested_keys(&self) -> &[String] {
        self.nested_keys.as_deref().unwrap_or_default()
    }

    pub fn has_nested_keys(&self) -> bool {
        !self.nested_keys().is_empty()
    }

    /// The single nested key, if there is exactly one.
    pub fn single_nested_key(&self) -> Option<&str> {
        match self.nested_keys() {
            [key] => Some(key.as_str()),
            _ => None,
        }
    }
}

/// Query string fragments grouped by top level key, in occurrence order.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Values {
    map: HashMap<String, Vec<Value>>,
}

impl Values {
    /// Tokenize a raw query string with the standard parser.
    pub fn new(query: &str) -> Result<Self, ParseError> {
        PARSER.parse_values(query)
    }

    pub fn push(&mut self, value: Value) {
        self.map
            .entry(value.top_level_key.clone())
            .or_default()
            .push(value);
    }

    /// All fragments for `top_key`, or an empty slice.
    pub fn all(&self, top_key: &str) -> &[Value] {
        self.map.get(top_key).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn contains_key(&self, top_key: &str) -> bool {
        self.map.contains_key(top_key)
    }

    /// The first value stored under `top_key` whose nested keys are exactly
    /// `nested_keys`, or the empty string. An empty `nested_keys` matches
    /// only fragments without nesting.
    pub fn get(&self, top_key: &str, nested_keys: &[&str]) -> &str {
        self.all(top_key)
            .iter()
            .find(|item| {
                let keys = item.nested_keys();
                keys.len() == nested_keys.len()
                    && keys.iter().zip(nested_keys).all(|(a, b)| a == b)
            })
            .map(|item| item.value.as_str())
            .unwrap_or_default()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, Vec<Value>> {
        self.map.iter()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl Index<&str> for Values {
    type Output = [Value];

    fn index(&self, top_key: &str) -> &Self::Output {
        self.all(top_key)
    }
}

impl<'a> IntoIterator for &'a Values {
    type Item = (&'a String, &'a Vec<Value>);
    type IntoIter = hash_map::Iter<'a, String, Vec<Value>>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.iter()
    }
}

impl FromIterator<Value> for Values {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        let mut values = Values::default();
        for value in iter {
            values.push(value);
        }
        values
    }
}
