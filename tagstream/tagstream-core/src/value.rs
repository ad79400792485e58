//! Generic document value built from an event stream.

use std::sync::Arc;

use crate::{
    error::ValueTypeError,
    ser_context::SerContext,
    tag::SemanticTag,
    visitor::{VisitResult, Visitor},
};

/// Materialized document.
///
/// Integers keep the signedness of the event that produced them; object
/// members keep their input order. Semantic tags are not retained.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    I64(i64),
    U64(u64),
    F64(f64),
    String(Arc<str>),
    Bytes(Arc<[u8]>),
    Array(Vec<Value>),
    Object(Vec<(Arc<str>, Value)>),
}

impl Value {
    pub fn string(s: impl AsRef<str>) -> Self {
        Self::String(Arc::from(s.as_ref()))
    }

    pub fn bytes(b: impl AsRef<[u8]>) -> Self {
        Self::Bytes(Arc::from(b.as_ref()))
    }

    pub fn object<K, I>(members: I) -> Self
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Self::Object(
            members
                .into_iter()
                .map(|(k, v)| (Arc::from(k.as_ref()), v))
                .collect(),
        )
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// First member named `key`, if this is an object.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(members) => members
                .iter()
                .find(|(k, _)| k.as_ref() == key)
                .map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&[(Arc<str>, Value)]> {
        match self {
            Value::Object(members) => Some(members),
            _ => None,
        }
    }

    pub fn try_bool(&self) -> Result<Option<bool>, ValueTypeError> {
        match self {
            Value::Bool(v) => Ok(Some(*v)),
            Value::Null => Ok(None),
            _ => Err(self.type_mismatch("Bool")),
        }
    }

    pub fn try_i64(&self) -> Result<Option<i64>, ValueTypeError> {
        match self {
            Value::I64(v) => Ok(Some(*v)),
            Value::Null => Ok(None),
            _ => Err(self.type_mismatch("I64")),
        }
    }

    pub fn try_u64(&self) -> Result<Option<u64>, ValueTypeError> {
        match self {
            Value::U64(v) => Ok(Some(*v)),
            Value::Null => Ok(None),
            _ => Err(self.type_mismatch("U64")),
        }
    }

    pub fn try_f64(&self) -> Result<Option<f64>, ValueTypeError> {
        match self {
            Value::F64(v) => Ok(Some(*v)),
            Value::Null => Ok(None),
            _ => Err(self.type_mismatch("F64")),
        }
    }

    pub fn try_str(&self) -> Result<Option<&str>, ValueTypeError> {
        match self {
            Value::String(v) => Ok(Some(v.as_ref())),
            Value::Null => Ok(None),
            _ => Err(self.type_mismatch("String")),
        }
    }

    pub fn try_bytes(&self) -> Result<Option<&[u8]>, ValueTypeError> {
        match self {
            Value::Bytes(v) => Ok(Some(v.as_ref())),
            Value::Null => Ok(None),
            _ => Err(self.type_mismatch("Bytes")),
        }
    }

    pub fn type_mismatch(&self, expected: impl Into<String>) -> ValueTypeError {
        ValueTypeError::new(expected, self.variant_name())
    }

    fn variant_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::I64(_) => "I64",
            Value::U64(_) => "U64",
            Value::F64(_) => "F64",
            Value::String(_) => "String",
            Value::Bytes(_) => "Bytes",
            Value::Array(_) => "Array",
            Value::Object(_) => "Object",
        }
    }

    /// Replay this value into `visitor` as untagged events.
    ///
    /// Stops at the first `false` or error, leaving any open containers
    /// unterminated. Returns `Ok(false)` if the visitor stopped.
    pub fn emit<V: Visitor + ?Sized>(&self, visitor: &mut V) -> VisitResult {
        self.emit_with(visitor, &SerContext::default())
    }

    fn emit_with<V: Visitor + ?Sized>(&self, visitor: &mut V, ctx: &SerContext) -> VisitResult {
        let tag = SemanticTag::None;
        match self {
            Value::Null => visitor.visit_null(tag, ctx),
            Value::Bool(v) => visitor.visit_bool(*v, tag, ctx),
            Value::I64(v) => visitor.visit_int64(*v, tag, ctx),
            Value::U64(v) => visitor.visit_uint64(*v, tag, ctx),
            Value::F64(v) => visitor.visit_double(*v, tag, ctx),
            Value::String(v) => visitor.visit_string(v, tag, ctx),
            Value::Bytes(v) => visitor.visit_byte_string(v, tag, ctx),
            Value::Array(items) => {
                if !visitor.visit_begin_array(Some(items.len()), tag, ctx)? {
                    return Ok(false);
                }
                for item in items {
                    if !item.emit_with(visitor, ctx)? {
                        return Ok(false);
                    }
                }
                visitor.visit_end_array(ctx)
            }
            Value::Object(members) => {
                if !visitor.visit_begin_object(Some(members.len()), tag, ctx)? {
                    return Ok(false);
                }
                for (key, value) in members {
                    if !visitor.visit_key(key, ctx)? || !value.emit_with(visitor, ctx)? {
                        return Ok(false);
                    }
                }
                visitor.visit_end_object(ctx)
            }
        }
    }
}
