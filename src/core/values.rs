use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ValueKind {
    Nominal,
    Numeric,
    Missing,
}

/// A single scalar of an instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Value {
    Nominal(String),
    Numeric(f64),
    Missing,
}

/// Untyped payload handed to [`Value::with_kind`].
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Text(String),
    Number(f64),
    None,
}

impl Value {
    pub fn nominal<S: Into<String>>(category: S) -> Self {
        Value::Nominal(category.into())
    }

    pub fn numeric(x: f64) -> Self {
        Value::Numeric(x)
    }

    pub fn missing() -> Self {
        Value::Missing
    }

    /// Builds a value of the requested kind. `Missing` ignores the payload,
    /// and a payload that does not fit the kind yields `None`.
    pub fn with_kind(kind: ValueKind, payload: Payload) -> Option<Self> {
        match (kind, payload) {
            (ValueKind::Missing, _) => Some(Value::Missing),
            (ValueKind::Nominal, Payload::Text(s)) => Some(Value::Nominal(s)),
            (ValueKind::Numeric, Payload::Number(x)) => Some(Value::Numeric(x)),
            _ => None,
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Nominal(_) => ValueKind::Nominal,
            Value::Numeric(_) => ValueKind::Numeric,
            Value::Missing => ValueKind::Missing,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    pub fn as_nominal(&self) -> Option<&str> {
        match self {
            Value::Nominal(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_numeric(&self) -> Option<f64> {
        match self {
            Value::Numeric(x) => Some(*x),
            _ => None,
        }
    }

    /// Numeric view of the payload; missing values read as NaN.
    pub fn numeric_payload(&self) -> f64 {
        match self {
            Value::Numeric(x) => *x,
            _ => f64::NAN,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nominal(s) => write!(f, "{s}"),
            Value::Numeric(x) => write!(f, "{x}"),
            Value::Missing => write!(f, "?"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Nominal(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Nominal(s)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Numeric(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_ignores_requested_payload() {
        let v = Value::with_kind(ValueKind::Missing, Payload::Number(3.0)).unwrap();
        assert_eq!(v, Value::Missing);
        assert!(v.numeric_payload().is_nan());

        let v = Value::with_kind(ValueKind::Missing, Payload::Text("a".into())).unwrap();
        assert!(v.is_missing());
    }

    #[test]
    fn payload_must_match_kind() {
        assert!(Value::with_kind(ValueKind::Nominal, Payload::Number(1.0)).is_none());
        assert!(Value::with_kind(ValueKind::Numeric, Payload::Text("1".into())).is_none());
        assert_eq!(
            Value::with_kind(ValueKind::Numeric, Payload::Number(1.5)),
            Some(Value::Numeric(1.5))
        );
    }

    #[test]
    fn kinds_and_accessors() {
        assert_eq!(Value::from("yes").kind(), ValueKind::Nominal);
        assert_eq!(Value::from(2.0).kind(), ValueKind::Numeric);
        assert_eq!(Value::missing().kind(), ValueKind::Missing);
        assert_eq!(Value::from("yes").as_nominal(), Some("yes"));
        assert_eq!(Value::from("yes").as_numeric(), None);
        assert_eq!(Value::from(2.0).numeric_payload(), 2.0);
    }

    #[test]
    fn serializes_with_kind_tag() {
        let json = serde_json::to_string(&Value::nominal("a")).unwrap();
        assert_eq!(json, r#"{"kind":"nominal","value":"a"}"#);
        let back: Value = serde_json::from_str(r#"{"kind":"missing"}"#).unwrap();
        assert_eq!(back, Value::Missing);
    }
}
