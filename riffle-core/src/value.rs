//! Owned tree value.
//!
//! The generic tree type the materializer produces by default. Objects
//! preserve insertion order (ordering/allocator policy is deliberately not
//! part of the event model); duplicate keys overwrite, last wins.

use std::borrow::Cow;

use crate::error::DecodeError;
use crate::event::{half_to_f64, Event};
use crate::tree::TreeValue;

/// Discriminant of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Uint,
    Double,
    String,
    Bytes,
    Array,
    Object,
}

/// A complete in-memory tree.
///
/// Every descendant is owned uniquely - a strict hierarchy with no shared
/// or back references, so a finished tree can be read concurrently without
/// synchronization.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Double(f64),
    String(String),
    Bytes(Vec<u8>),
    Array(Vec<Value>),
    Object(Vec<(String, Value)>),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Uint(_) => ValueKind::Uint,
            Value::Double(_) => ValueKind::Double,
            Value::String(_) => ValueKind::String,
            Value::Bytes(_) => ValueKind::Bytes,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Signed view of an integer value, if it fits.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Uint(u) => i64::try_from(*u).ok(),
            _ => None,
        }
    }

    /// Unsigned view of an integer value, if non-negative.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Uint(u) => Some(*u),
            Value::Int(i) => u64::try_from(*i).ok(),
            _ => None,
        }
    }

    /// Numeric view: integers widen, doubles pass through.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Double(d) => Some(*d),
            Value::Int(i) => Some(*i as f64),
            Value::Uint(u) => Some(*u as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&[(String, Value)]> {
        match self {
            Value::Object(members) => Some(members),
            _ => None,
        }
    }

    /// Member lookup by key; `None` for non-objects and absent keys.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(members) => members
                .iter()
                .find(|(name, _)| name == key)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    /// Element lookup by index; `None` for non-arrays and out of range.
    pub fn at(&self, index: usize) -> Option<&Value> {
        match self {
            Value::Array(items) => items.get(index),
            _ => None,
        }
    }
}

impl TreeValue for Value {
    fn new_object() -> Self {
        Value::Object(Vec::new())
    }

    fn new_array() -> Self {
        Value::Array(Vec::new())
    }

    fn kind(&self) -> ValueKind {
        // Same answer as the inherent method.
        Value::kind(self)
    }

    fn insert(&mut self, key: &str, child: Self) {
        if let Value::Object(members) = self {
            match members.iter_mut().find(|(name, _)| name == key) {
                Some((_, slot)) => *slot = child,
                None => members.push((key.to_string(), child)),
            }
        }
    }

    fn push(&mut self, child: Self) {
        if let Value::Array(items) = self {
            items.push(child);
        }
    }

    fn from_scalar(event: &Event<'_>) -> Result<Self, DecodeError> {
        match event {
            Event::Null { .. } => Ok(Value::Null),
            Event::Bool { value, .. } => Ok(Value::Bool(*value)),
            Event::Int64 { value, .. } => Ok(Value::Int(*value)),
            Event::Uint64 { value, .. } => Ok(Value::Uint(*value)),
            Event::Half { value, .. } => Ok(Value::Double(half_to_f64(*value))),
            Event::Double { value, .. } => Ok(Value::Double(*value)),
            Event::String { value, .. } => Ok(Value::String(value.clone().into_owned())),
            Event::ByteString { value, .. } => Ok(Value::Bytes(value.clone().into_owned())),
            _ => Err(DecodeError::ConversionFailed),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Uint(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Cow<'_, str>> for Value {
    fn from(v: Cow<'_, str>) -> Self {
        Value::String(v.into_owned())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}
