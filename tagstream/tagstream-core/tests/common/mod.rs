#![allow(dead_code)]

use tagstream_core::{ErrorCode, SemanticTag, SerContext, VisitResult, Visitor};

/// Owned copy of a primitive event, for comparing sequences value-for-value.
#[derive(Debug, Clone, PartialEq)]
pub enum Recorded {
    BeginObject(Option<usize>, SemanticTag),
    EndObject,
    BeginArray(Option<usize>, SemanticTag),
    EndArray,
    Key(String),
    Null(SemanticTag),
    Bool(bool, SemanticTag),
    String(String, SemanticTag),
    ByteString(Vec<u8>, SemanticTag),
    UInt64(u64, SemanticTag),
    Int64(i64, SemanticTag),
    Double(f64, SemanticTag),
}

/// Primitive-only visitor that records every event it receives.
///
/// Optionally returns `false` on the n-th event (1-based) or fails it with
/// an error code.
#[derive(Debug, Default)]
pub struct Recorder {
    pub events: Vec<Recorded>,
    stop_at: Option<usize>,
    fail_at: Option<(usize, ErrorCode)>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stopping_at(n: usize) -> Self {
        Self {
            stop_at: Some(n),
            ..Self::default()
        }
    }

    pub fn failing_at(n: usize, code: ErrorCode) -> Self {
        Self {
            fail_at: Some((n, code)),
            ..Self::default()
        }
    }

    fn record(&mut self, event: Recorded) -> VisitResult {
        self.events.push(event);
        let n = self.events.len();
        if let Some((at, code)) = self.fail_at
            && at == n
        {
            return Err(code);
        }
        Ok(self.stop_at != Some(n))
    }
}

impl Visitor for Recorder {
    fn visit_begin_object(
        &mut self,
        len: Option<usize>,
        tag: SemanticTag,
        _: &SerContext,
    ) -> VisitResult {
        self.record(Recorded::BeginObject(len, tag))
    }

    fn visit_end_object(&mut self, _: &SerContext) -> VisitResult {
        self.record(Recorded::EndObject)
    }

    fn visit_begin_array(
        &mut self,
        len: Option<usize>,
        tag: SemanticTag,
        _: &SerContext,
    ) -> VisitResult {
        self.record(Recorded::BeginArray(len, tag))
    }

    fn visit_end_array(&mut self, _: &SerContext) -> VisitResult {
        self.record(Recorded::EndArray)
    }

    fn visit_key(&mut self, name: &str, _: &SerContext) -> VisitResult {
        self.record(Recorded::Key(name.to_string()))
    }

    fn visit_null(&mut self, tag: SemanticTag, _: &SerContext) -> VisitResult {
        self.record(Recorded::Null(tag))
    }

    fn visit_bool(&mut self, value: bool, tag: SemanticTag, _: &SerContext) -> VisitResult {
        self.record(Recorded::Bool(value, tag))
    }

    fn visit_string(&mut self, value: &str, tag: SemanticTag, _: &SerContext) -> VisitResult {
        self.record(Recorded::String(value.to_string(), tag))
    }

    fn visit_byte_string(&mut self, value: &[u8], tag: SemanticTag, _: &SerContext) -> VisitResult {
        self.record(Recorded::ByteString(value.to_vec(), tag))
    }

    fn visit_uint64(&mut self, value: u64, tag: SemanticTag, _: &SerContext) -> VisitResult {
        self.record(Recorded::UInt64(value, tag))
    }

    fn visit_int64(&mut self, value: i64, tag: SemanticTag, _: &SerContext) -> VisitResult {
        self.record(Recorded::Int64(value, tag))
    }

    fn visit_double(&mut self, value: f64, tag: SemanticTag, _: &SerContext) -> VisitResult {
        self.record(Recorded::Double(value, tag))
    }
}
