//! Call-convention values
//!
//! Arguments and return values of method implementations. The runtime has
//! no garbage-collected heap, so heap payloads are reference-counted and
//! values clone cheaply into closures and across threads.

use std::fmt;
use std::sync::Arc;

/// Argument/return value for method calls
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value
    Null,
    /// Boolean
    Bool(bool),
    /// 32-bit signed integer
    I32(i32),
    /// 64-bit float
    F64(f64),
    /// Immutable shared string
    Str(Arc<str>),
}

impl Value {
    /// Create a null value
    #[inline]
    pub const fn null() -> Self {
        Value::Null
    }

    /// Create a boolean value
    #[inline]
    pub const fn bool(b: bool) -> Self {
        Value::Bool(b)
    }

    /// Create an i32 value
    #[inline]
    pub const fn i32(i: i32) -> Self {
        Value::I32(i)
    }

    /// Create an f64 value
    #[inline]
    pub const fn f64(f: f64) -> Self {
        Value::F64(f)
    }

    /// Create a string value
    pub fn str(s: &str) -> Self {
        Value::Str(Arc::from(s))
    }

    /// Check if this value is null
    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Extract a boolean, if this value is one
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extract an i32, if this value is one
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::I32(i) => Some(*i),
            _ => None,
        }
    }

    /// Extract an f64, if this value is one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::F64(f) => Some(*f),
            _ => None,
        }
    }

    /// Extract a string slice, if this value is one
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::I32(i) => write!(f, "{}", i),
            Value::F64(x) => write!(f, "{}", x),
            Value::Str(s) => write!(f, "{}", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        assert!(Value::null().is_null());
        assert_eq!(Value::bool(true).as_bool(), Some(true));
        assert_eq!(Value::i32(42).as_i32(), Some(42));
        assert_eq!(Value::f64(1.5).as_f64(), Some(1.5));
        assert_eq!(Value::str("hi").as_str(), Some("hi"));
    }

    #[test]
    fn test_accessor_mismatch() {
        assert_eq!(Value::i32(1).as_bool(), None);
        assert_eq!(Value::null().as_i32(), None);
        assert_eq!(Value::bool(false).as_str(), None);
    }

    #[test]
    fn test_equality() {
        assert_eq!(Value::str("a"), Value::str("a"));
        assert_ne!(Value::str("a"), Value::str("b"));
        assert_eq!(Value::i32(3), Value::i32(3));
        assert_ne!(Value::i32(3), Value::f64(3.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::null().to_string(), "null");
        assert_eq!(Value::i32(7).to_string(), "7");
        assert_eq!(Value::str("x").to_string(), "x");
    }
}
