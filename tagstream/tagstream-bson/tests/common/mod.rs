#![allow(dead_code)]

use tagstream_core::{ErrorCode, SemanticTag, SerContext, VisitResult, Visitor};

/// Builds BSON documents element by element.
#[derive(Debug, Default, Clone)]
pub struct Doc {
    body: Vec<u8>,
}

impl Doc {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element with a raw, unchecked payload.
    pub fn raw(mut self, element_type: u8, key: &str, payload: &[u8]) -> Self {
        self.body.push(element_type);
        self.body.extend_from_slice(key.as_bytes());
        self.body.push(0);
        self.body.extend_from_slice(payload);
        self
    }

    pub fn double(self, key: &str, v: f64) -> Self {
        self.raw(0x01, key, &v.to_le_bytes())
    }

    pub fn string(self, key: &str, v: &str) -> Self {
        self.raw(0x02, key, &string_payload(v))
    }

    pub fn document(self, key: &str, doc: Doc) -> Self {
        self.raw(0x03, key, &doc.finish())
    }

    /// Array from a document whose keys are `"0"`, `"1"`, ...
    pub fn array(self, key: &str, items: Doc) -> Self {
        self.raw(0x04, key, &items.finish())
    }

    pub fn binary(self, key: &str, subtype: u8, data: &[u8]) -> Self {
        let mut payload = len_prefix(data.len());
        payload.push(subtype);
        payload.extend_from_slice(data);
        self.raw(0x05, key, &payload)
    }

    pub fn bool(self, key: &str, v: bool) -> Self {
        self.raw(0x08, key, &[u8::from(v)])
    }

    pub fn datetime(self, key: &str, millis: i64) -> Self {
        self.raw(0x09, key, &millis.to_le_bytes())
    }

    pub fn null(self, key: &str) -> Self {
        self.raw(0x0a, key, &[])
    }

    pub fn int32(self, key: &str, v: i32) -> Self {
        self.raw(0x10, key, &v.to_le_bytes())
    }

    pub fn timestamp(self, key: &str, v: u64) -> Self {
        self.raw(0x11, key, &v.to_le_bytes())
    }

    pub fn int64(self, key: &str, v: i64) -> Self {
        self.raw(0x12, key, &v.to_le_bytes())
    }

    pub fn finish(self) -> Vec<u8> {
        let mut out = len_prefix(self.body.len() + 5);
        out.extend_from_slice(&self.body);
        out.push(0);
        out
    }
}

pub fn len_prefix(len: usize) -> Vec<u8> {
    (len as i32).to_le_bytes().to_vec()
}

pub fn string_payload(v: &str) -> Vec<u8> {
    let mut payload = len_prefix(v.len() + 1);
    payload.extend_from_slice(v.as_bytes());
    payload.push(0);
    payload
}

/// Owned copy of a primitive event.
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

/// Records events and the column each one arrived with.
#[derive(Debug, Default)]
pub struct Recorder {
    pub events: Vec<Recorded>,
    pub columns: Vec<usize>,
    pub flushes: usize,
    stop_at: Option<usize>,
    fail_at: Option<(usize, ErrorCode)>,
    flush_error: Option<ErrorCode>,
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

    pub fn failing_flush(code: ErrorCode) -> Self {
        Self {
            flush_error: Some(code),
            ..Self::default()
        }
    }

    fn record(&mut self, event: Recorded, context: &SerContext) -> VisitResult {
        self.events.push(event);
        self.columns.push(context.column());
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
        context: &SerContext,
    ) -> VisitResult {
        self.record(Recorded::BeginObject(len, tag), context)
    }

    fn visit_end_object(&mut self, context: &SerContext) -> VisitResult {
        self.record(Recorded::EndObject, context)
    }

    fn visit_begin_array(
        &mut self,
        len: Option<usize>,
        tag: SemanticTag,
        context: &SerContext,
    ) -> VisitResult {
        self.record(Recorded::BeginArray(len, tag), context)
    }

    fn visit_end_array(&mut self, context: &SerContext) -> VisitResult {
        self.record(Recorded::EndArray, context)
    }

    fn visit_key(&mut self, name: &str, context: &SerContext) -> VisitResult {
        self.record(Recorded::Key(name.to_string()), context)
    }

    fn visit_null(&mut self, tag: SemanticTag, context: &SerContext) -> VisitResult {
        self.record(Recorded::Null(tag), context)
    }

    fn visit_bool(&mut self, value: bool, tag: SemanticTag, context: &SerContext) -> VisitResult {
        self.record(Recorded::Bool(value, tag), context)
    }

    fn visit_string(&mut self, value: &str, tag: SemanticTag, context: &SerContext) -> VisitResult {
        self.record(Recorded::String(value.to_string(), tag), context)
    }

    fn visit_byte_string(
        &mut self,
        value: &[u8],
        tag: SemanticTag,
        context: &SerContext,
    ) -> VisitResult {
        self.record(Recorded::ByteString(value.to_vec(), tag), context)
    }

    fn visit_uint64(&mut self, value: u64, tag: SemanticTag, context: &SerContext) -> VisitResult {
        self.record(Recorded::UInt64(value, tag), context)
    }

    fn visit_int64(&mut self, value: i64, tag: SemanticTag, context: &SerContext) -> VisitResult {
        self.record(Recorded::Int64(value, tag), context)
    }

    fn visit_double(&mut self, value: f64, tag: SemanticTag, context: &SerContext) -> VisitResult {
        self.record(Recorded::Double(value, tag), context)
    }

    fn visit_flush(&mut self) -> Result<(), ErrorCode> {
        self.flushes += 1;
        match self.flush_error {
            Some(code) => Err(code),
            None => Ok(()),
        }
    }
}
