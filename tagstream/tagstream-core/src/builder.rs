//! Visitor that materializes a [`Value`] tree.

use std::sync::Arc;

use crate::{
    error::ErrorCode,
    ser_context::SerContext,
    tag::SemanticTag,
    value::Value,
    visitor::{VisitResult, Visitor},
};

// Size hints come from untrusted input; never preallocate more than this.
const MAX_PREALLOCATED: usize = 4096;

#[derive(Debug)]
enum Frame {
    Array(Vec<Value>),
    Object {
        members: Vec<(Arc<str>, Value)>,
        key: Option<Arc<str>>,
    },
}

/// Builds a [`Value`] from exactly one root value's worth of events.
///
/// Only the primitive operations are implemented: half floats, typed arrays
/// and multi-dimensional arrays arrive through the default decompositions,
/// the latter materializing as `[shape, data]`.
///
/// Misordered events (a value without a key inside an object, an end event
/// for the wrong container, a second root) are rejected with an error kind of
/// [`ConsumerRejected`](crate::ErrorKind::ConsumerRejected). The builder can
/// be reused after [`reset`](Self::reset).
#[derive(Debug, Default)]
pub struct ValueBuilder {
    stack: Vec<Frame>,
    result: Option<Value>,
}

impl ValueBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once a root value has been fully built.
    pub fn is_complete(&self) -> bool {
        self.stack.is_empty() && self.result.is_some()
    }

    /// Depth of currently open containers.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// The finished root value, or `None` if the traversal was incomplete.
    pub fn into_value(self) -> Option<Value> {
        if self.stack.is_empty() {
            self.result
        } else {
            None
        }
    }

    /// Take the finished root value, leaving the builder ready for reuse.
    pub fn take_value(&mut self) -> Option<Value> {
        if self.stack.is_empty() {
            self.result.take()
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        self.stack.clear();
        self.result = None;
    }

    fn check_value_slot(&self) -> Result<(), ErrorCode> {
        match self.stack.last() {
            None if self.result.is_some() => Err(ErrorCode::UnexpectedEvent),
            Some(Frame::Object { key: None, .. }) => Err(ErrorCode::MissingKey),
            _ => Ok(()),
        }
    }

    fn push_value(&mut self, value: Value) -> VisitResult {
        self.check_value_slot()?;
        match self.stack.last_mut() {
            None => self.result = Some(value),
            Some(Frame::Array(items)) => items.push(value),
            Some(Frame::Object { members, key }) => {
                let key = key.take().ok_or(ErrorCode::MissingKey)?;
                members.push((key, value));
            }
        }
        Ok(true)
    }

    fn open(&mut self, frame: Frame) -> VisitResult {
        self.check_value_slot()?;
        self.stack.push(frame);
        Ok(true)
    }
}

fn capacity(len: Option<usize>) -> usize {
    len.unwrap_or(0).min(MAX_PREALLOCATED)
}

impl Visitor for ValueBuilder {
    fn visit_begin_object(
        &mut self,
        len: Option<usize>,
        _tag: SemanticTag,
        _context: &SerContext,
    ) -> VisitResult {
        self.open(Frame::Object {
            members: Vec::with_capacity(capacity(len)),
            key: None,
        })
    }

    fn visit_end_object(&mut self, _context: &SerContext) -> VisitResult {
        match self.stack.pop() {
            Some(Frame::Object { members, key: None }) => self.push_value(Value::Object(members)),
            Some(Frame::Object { .. }) => Err(ErrorCode::UnexpectedEvent),
            Some(Frame::Array(_)) | None => Err(ErrorCode::UnbalancedEnd),
        }
    }

    fn visit_begin_array(
        &mut self,
        len: Option<usize>,
        _tag: SemanticTag,
        _context: &SerContext,
    ) -> VisitResult {
        self.open(Frame::Array(Vec::with_capacity(capacity(len))))
    }

    fn visit_end_array(&mut self, _context: &SerContext) -> VisitResult {
        match self.stack.pop() {
            Some(Frame::Array(items)) => self.push_value(Value::Array(items)),
            Some(Frame::Object { .. }) | None => Err(ErrorCode::UnbalancedEnd),
        }
    }

    fn visit_key(&mut self, name: &str, _context: &SerContext) -> VisitResult {
        match self.stack.last_mut() {
            Some(Frame::Object { key, .. }) if key.is_none() => {
                *key = Some(Arc::from(name));
                Ok(true)
            }
            _ => Err(ErrorCode::UnexpectedEvent),
        }
    }

    fn visit_null(&mut self, _tag: SemanticTag, _context: &SerContext) -> VisitResult {
        self.push_value(Value::Null)
    }

    fn visit_bool(&mut self, value: bool, _tag: SemanticTag, _context: &SerContext) -> VisitResult {
        self.push_value(Value::Bool(value))
    }

    fn visit_string(
        &mut self,
        value: &str,
        _tag: SemanticTag,
        _context: &SerContext,
    ) -> VisitResult {
        self.push_value(Value::string(value))
    }

    fn visit_byte_string(
        &mut self,
        value: &[u8],
        _tag: SemanticTag,
        _context: &SerContext,
    ) -> VisitResult {
        self.push_value(Value::bytes(value))
    }

    fn visit_uint64(
        &mut self,
        value: u64,
        _tag: SemanticTag,
        _context: &SerContext,
    ) -> VisitResult {
        self.push_value(Value::U64(value))
    }

    fn visit_int64(&mut self, value: i64, _tag: SemanticTag, _context: &SerContext) -> VisitResult {
        self.push_value(Value::I64(value))
    }

    fn visit_double(
        &mut self,
        value: f64,
        _tag: SemanticTag,
        _context: &SerContext,
    ) -> VisitResult {
        self.push_value(Value::F64(value))
    }
}
