//! # Rich Query Selectors
//!
//! The world state understands a small subset of the Mango query language used by
//! document-backed ledgers:
//!
//! ```json
//! {"selector": {"id": "r1"}}
//! {"selector": {"id": {"$ne": "-"}}}
//! {"selector": {"active": {"$eq": true}, "resource_type_id": "rt1"}}
//! ```
//!
//! Every field condition must hold for a record to match. A record that does not carry
//! the field never matches, whatever the operator.

use crate::ledger::LedgerError;
use serde_json::{json, Map, Value};

/// A single field test.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq(Value),
    Ne(Value),
}

impl Condition {
    fn holds(&self, field: &Value) -> bool {
        match self {
            Condition::Eq(expected) => field == expected,
            Condition::Ne(excluded) => field != excluded,
        }
    }

    fn to_json(&self) -> Value {
        match self {
            Condition::Eq(value) => value.clone(),
            Condition::Ne(value) => json!({ "$ne": value }),
        }
    }
}

/// A conjunction of field conditions over JSON records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selector {
    conditions: Vec<(String, Condition)>,
}

impl Selector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an equality test on `field`.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions
            .push((field.into(), Condition::Eq(value.into())));
        self
    }

    /// Adds a not-equal test on `field`.
    pub fn ne(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions
            .push((field.into(), Condition::Ne(value.into())));
        self
    }

    /// Renders the selector as a rich query string.
    pub fn to_query(&self) -> String {
        let fields: Map<String, Value> = self
            .conditions
            .iter()
            .map(|(field, condition)| (field.clone(), condition.to_json()))
            .collect();
        json!({ "selector": fields }).to_string()
    }

    /// Parses a rich query string.
    pub fn parse(query: &str) -> Result<Self, LedgerError> {
        let document: Value = serde_json::from_str(query)
            .map_err(|e| LedgerError::InvalidQuery(e.to_string()))?;

        let fields = document
            .get("selector")
            .and_then(Value::as_object)
            .ok_or_else(|| LedgerError::InvalidQuery("missing \"selector\" object".into()))?;

        let mut selector = Self::new();
        for (field, test) in fields {
            let condition = match test {
                Value::Object(operators) => Self::parse_operator(field, operators)?,
                literal => Condition::Eq(literal.clone()),
            };
            selector.conditions.push((field.clone(), condition));
        }
        Ok(selector)
    }

    fn parse_operator(field: &str, operators: &Map<String, Value>) -> Result<Condition, LedgerError> {
        let mut entries = operators.iter();
        match (entries.next(), entries.next()) {
            (Some((op, value)), None) => match op.as_str() {
                "$eq" => Ok(Condition::Eq(value.clone())),
                "$ne" => Ok(Condition::Ne(value.clone())),
                other => Err(LedgerError::InvalidQuery(format!(
                    "unsupported operator {other} on field {field}"
                ))),
            },
            _ => Err(LedgerError::InvalidQuery(format!(
                "field {field} must have exactly one operator"
            ))),
        }
    }

    /// Tests a decoded record against every condition.
    pub fn matches(&self, record: &Value) -> bool {
        self.conditions.iter().all(|(field, condition)| {
            record
                .get(field)
                .is_some_and(|value| condition.holds(value))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_selector_round_trips_through_query_text() {
        let selector = Selector::new().eq("id", "r1");
        assert_eq!(selector.to_query(), r#"{"selector":{"id":"r1"}}"#);
        assert_eq!(Selector::parse(&selector.to_query()).unwrap(), selector);
    }

    #[test]
    fn test_match_all_sentinel() {
        let selector = Selector::parse(r#"{"selector": {"id": {"$ne": "-"}}}"#).unwrap();
        assert!(selector.matches(&json!({"id": "rt1", "name": "Vehicle"})));
        assert!(!selector.matches(&json!({"id": "-"})));
        // records without the field never match
        assert!(!selector.matches(&json!({"name": "orphan"})));
    }

    #[test]
    fn test_conditions_are_anded() {
        let selector = Selector::parse(
            r#"{"selector": {"resource_type_id": "rt1", "active": {"$eq": true}}}"#,
        )
        .unwrap();
        assert!(selector.matches(&json!({"resource_type_id": "rt1", "active": true})));
        assert!(!selector.matches(&json!({"resource_type_id": "rt1", "active": false})));
        assert!(!selector.matches(&json!({"resource_type_id": "rt2", "active": true})));
    }

    #[test]
    fn test_rejects_unsupported_queries() {
        assert!(matches!(
            Selector::parse(r#"{"selector": {"id": {"$gt": "a"}}}"#),
            Err(LedgerError::InvalidQuery(_))
        ));
        assert!(matches!(
            Selector::parse(r#"{"fields": ["id"]}"#),
            Err(LedgerError::InvalidQuery(_))
        ));
        assert!(matches!(Selector::parse("not json"), Err(LedgerError::InvalidQuery(_))));
    }
}
