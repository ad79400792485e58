//! Configurable sink visitor.

use crate::{
    error::ErrorCode,
    ser_context::SerContext,
    tag::SemanticTag,
    visitor::{VisitResult, Visitor},
};

/// Visitor that discards every event.
///
/// Every primitive returns the same configured outcome: the continuation
/// signal (default: continue) or, when set, the injected error code. Half
/// floats, typed arrays and multi-dimensional arrays are left to the default
/// decompositions, so driving a producer into this sink exercises them too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultVisitor {
    accept_more: bool,
    error: Option<ErrorCode>,
}

impl DefaultVisitor {
    pub fn new() -> Self {
        Self {
            accept_more: true,
            error: None,
        }
    }

    /// Return `accept_more` from every operation. `false` turns the sink into
    /// a probe that stops after the first event.
    pub fn with_continuation(mut self, accept_more: bool) -> Self {
        self.accept_more = accept_more;
        self
    }

    /// Fail every operation with `code`.
    pub fn with_error(mut self, code: ErrorCode) -> Self {
        self.error = Some(code);
        self
    }

    fn outcome(&self) -> VisitResult {
        match self.error {
            Some(code) => Err(code),
            None => Ok(self.accept_more),
        }
    }
}

impl Default for DefaultVisitor {
    fn default() -> Self {
        Self::new()
    }
}

impl Visitor for DefaultVisitor {
    fn visit_begin_object(
        &mut self,
        _: Option<usize>,
        _: SemanticTag,
        _: &SerContext,
    ) -> VisitResult {
        self.outcome()
    }

    fn visit_end_object(&mut self, _: &SerContext) -> VisitResult {
        self.outcome()
    }

    fn visit_begin_array(
        &mut self,
        _: Option<usize>,
        _: SemanticTag,
        _: &SerContext,
    ) -> VisitResult {
        self.outcome()
    }

    fn visit_end_array(&mut self, _: &SerContext) -> VisitResult {
        self.outcome()
    }

    fn visit_key(&mut self, _: &str, _: &SerContext) -> VisitResult {
        self.outcome()
    }

    fn visit_null(&mut self, _: SemanticTag, _: &SerContext) -> VisitResult {
        self.outcome()
    }

    fn visit_bool(&mut self, _: bool, _: SemanticTag, _: &SerContext) -> VisitResult {
        self.outcome()
    }

    fn visit_string(&mut self, _: &str, _: SemanticTag, _: &SerContext) -> VisitResult {
        self.outcome()
    }

    fn visit_byte_string(&mut self, _: &[u8], _: SemanticTag, _: &SerContext) -> VisitResult {
        self.outcome()
    }

    fn visit_uint64(&mut self, _: u64, _: SemanticTag, _: &SerContext) -> VisitResult {
        self.outcome()
    }

    fn visit_int64(&mut self, _: i64, _: SemanticTag, _: &SerContext) -> VisitResult {
        self.outcome()
    }

    fn visit_double(&mut self, _: f64, _: SemanticTag, _: &SerContext) -> VisitResult {
        self.outcome()
    }
}
