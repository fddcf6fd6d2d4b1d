//! Scalar values held by record fields

use std::fmt;

use serde::{Deserialize, Serialize};

/// A validated scalar field value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// 64-bit signed integer
    Int(i64),
    /// UTF-8 text
    Str(String),
}

impl Value {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Str(_) => "string",
        }
    }

    /// Returns the integer payload, if any
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Str(_) => None,
        }
    }

    /// Returns the text payload, if any
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Int(_) => None,
            Value::Str(s) => Some(s),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        assert_eq!(Value::from(25), Value::Int(25));
        assert_eq!(Value::from(7i64), Value::Int(7));
        assert_eq!(Value::from("Ivan"), Value::Str("Ivan".into()));
        assert_eq!(Value::from(String::from("x")).as_str(), Some("x"));
        assert_eq!(Value::Int(3).as_str(), None);
    }

    #[test]
    fn test_untagged_json() {
        let v: Value = serde_json::from_str("42").unwrap();
        assert_eq!(v, Value::Int(42));

        let v: Value = serde_json::from_str("\"anon\"").unwrap();
        assert_eq!(v, Value::Str("anon".into()));
    }
}
