//! Equality queries over stored documents
//!
//! A query is a list of `path = value` conditions, all of which must hold.
//! Paths are dotted (`customer.city`). Arrays along the path match when any
//! element matches, so `pizzas.toppings=ham` finds orders with at least one
//! ham pizza.

use serde_json::Value;

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Condition {
    path: Vec<String>,
    value: String,
}

/// Conjunction of equality conditions. An empty query matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentQuery {
    conditions: Vec<Condition>,
}

impl DocumentQuery {
    /// Query that matches every document
    pub fn all() -> Self {
        Self::default()
    }

    /// Build a query from `(path, value)` pairs, e.g. a decoded query string
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut query = Self::default();
        for (path, value) in pairs {
            query = query.and(path.as_ref(), value)?;
        }
        Ok(query)
    }

    /// Add a condition
    pub fn and(mut self, path: &str, value: impl Into<String>) -> Result<Self> {
        let segments: Vec<String> = path.split('.').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(Error::invalid_request(format!(
                "invalid query path '{}'",
                path
            )));
        }

        self.conditions.push(Condition {
            path: segments,
            value: value.into(),
        });
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Evaluate the query against a document's JSON representation
    pub fn matches(&self, document: &Value) -> bool {
        self.conditions.iter().all(|condition| {
            let segments: Vec<&str> = condition.path.iter().map(String::as_str).collect();
            matches_at(document, &segments, &condition.value)
        })
    }
}

fn matches_at(value: &Value, segments: &[&str], expected: &str) -> bool {
    match segments.split_first() {
        None => scalar_matches(value, expected),
        Some((head, rest)) => match value {
            Value::Object(map) => map
                .get(*head)
                .is_some_and(|child| matches_at(child, rest, expected)),
            Value::Array(items) => items
                .iter()
                .any(|item| matches_at(item, segments, expected)),
            _ => false,
        },
    }
}

fn scalar_matches(value: &Value, expected: &str) -> bool {
    match value {
        Value::String(s) => s == expected,
        Value::Number(n) => n.to_string() == expected,
        Value::Bool(b) => b.to_string() == expected,
        Value::Array(items) => items.iter().any(|item| scalar_matches(item, expected)),
        Value::Null | Value::Object(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "_id": "0b6c7c1e-8a53-4f55-9a55-0f4e3c1f2a10",
            "customer": { "name": "Ronald", "city": "Anytown" },
            "pizzas": [
                { "crust": "thin", "toppings": ["ham"] },
                { "crust": "hand tossed", "toppings": ["pepperoni", "olives"] }
            ],
            "notes": [{ "timestamp": 1607120034, "note": "back door" }]
        })
    }

    #[test]
    fn test_empty_query_matches_all() {
        assert!(DocumentQuery::all().matches(&sample()));
        assert!(DocumentQuery::all().matches(&json!({})));
    }

    #[test]
    fn test_nested_object_path() {
        let query = DocumentQuery::from_pairs([("customer.city", "Anytown")]).unwrap();
        assert!(query.matches(&sample()));

        let query = DocumentQuery::from_pairs([("customer.city", "Elsewhere")]).unwrap();
        assert!(!query.matches(&sample()));
    }

    #[test]
    fn test_arrays_match_any_element() {
        let query = DocumentQuery::from_pairs([("pizzas.crust", "hand tossed")]).unwrap();
        assert!(query.matches(&sample()));

        let query = DocumentQuery::from_pairs([("pizzas.toppings", "olives")]).unwrap();
        assert!(query.matches(&sample()));

        let query = DocumentQuery::from_pairs([("pizzas.toppings", "anchovies")]).unwrap();
        assert!(!query.matches(&sample()));
    }

    #[test]
    fn test_numbers_compare_as_text() {
        let query = DocumentQuery::from_pairs([("notes.timestamp", "1607120034")]).unwrap();
        assert!(query.matches(&sample()));
    }

    #[test]
    fn test_all_conditions_must_hold() {
        let query = DocumentQuery::from_pairs([
            ("customer.name", "Ronald"),
            ("pizzas.crust", "deep dish"),
        ])
        .unwrap();
        assert!(!query.matches(&sample()));
    }

    #[test]
    fn test_missing_path_does_not_match() {
        let query = DocumentQuery::from_pairs([("driver", "Sam")]).unwrap();
        assert!(!query.matches(&sample()));
    }

    #[test]
    fn test_rejects_empty_segments() {
        assert!(DocumentQuery::from_pairs([("customer..city", "x")]).is_err());
        assert!(DocumentQuery::from_pairs([("", "x")]).is_err());
    }
}
