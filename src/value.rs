//! Attribute values held by variable nodes.
//!
//! Event fields are read out of variable nodes as `Value`s. `Value::Null` is
//! the empty placeholder used when a select clause cannot be resolved: field
//! lists always keep their full length, holes stay `Null`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::node::NodeId;

/// Possible values of a variable node's value attribute.
///
/// # Examples
///
/// ```
/// use opaline::Value;
///
/// let bytes = Value::Bytes(vec![0u8; 16]);
/// assert!(bytes.is_bytes());
/// assert!(Value::Null.is_null());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
    NodeId(NodeId),
    Time(DateTime<Utc>),
    Null,
}

impl Value {
    /// Returns true if this is a boolean value.
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Self::Bool(_))
    }

    /// Returns true if this is an integer value.
    #[must_use]
    pub const fn is_int(&self) -> bool {
        matches!(self, Self::Int(_))
    }

    /// Returns true if this is a byte-string value.
    #[must_use]
    pub const fn is_bytes(&self) -> bool {
        matches!(self, Self::Bytes(_))
    }

    /// Returns true if this is a node-id value.
    #[must_use]
    pub const fn is_node_id(&self) -> bool {
        matches!(self, Self::NodeId(_))
    }

    /// Returns true if this is a timestamp value.
    #[must_use]
    pub const fn is_time(&self) -> bool {
        matches!(self, Self::Time(_))
    }

    /// Returns true if this is the empty placeholder.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the boolean payload, if any.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the integer payload, if any.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the float payload, widening integers.
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Returns the string payload, if any.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the byte-string payload, if any.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the node-id payload, if any.
    #[must_use]
    pub const fn as_node_id(&self) -> Option<NodeId> {
        match self {
            Self::NodeId(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the timestamp payload, if any.
    #[must_use]
    pub const fn as_time(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Time(v) => Some(*v),
            _ => None,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::Null
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_predicates() {
        assert!(Value::Bool(true).is_bool());
        assert!(Value::Int(7).is_int());
        assert!(Value::Bytes(vec![1, 2]).is_bytes());
        assert!(Value::NodeId(NodeId::new()).is_node_id());
        assert!(Value::Time(Utc::now()).is_time());
        assert!(Value::Null.is_null());
        assert!(!Value::Int(7).is_null());
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Int(3).as_int(), Some(3));
        assert_eq!(Value::Int(3).as_float(), Some(3.0));
        assert_eq!(Value::String("x".to_string()).as_str(), Some("x"));
        assert_eq!(Value::Bytes(vec![9]).as_bytes(), Some(&[9u8][..]));
        assert_eq!(Value::Null.as_bytes(), None);

        let id = NodeId::new();
        assert_eq!(Value::NodeId(id).as_node_id(), Some(id));
    }

    #[test]
    fn test_value_default_is_null() {
        assert!(Value::default().is_null());
    }

    #[test]
    fn test_value_serde_is_tagged() {
        let json = serde_json::to_value(Value::Int(5)).unwrap();
        assert_eq!(json["type"], "int");
        assert_eq!(json["value"], 5);

        let decoded: Value = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, Value::Int(5));

        let null = serde_json::to_value(Value::Null).unwrap();
        assert_eq!(null["type"], "null");
    }
}
