//! Visitor contract and the positional error layer built on top of it.

use crate::{
    decompose,
    error::{ErrorCode, SerError},
    ser_context::SerContext,
    tag::SemanticTag,
    typed_array::TypedArrayView,
};

/// Outcome of a single visitor operation.
///
/// `Ok(true)` asks the producer to continue, `Ok(false)` to stop the current
/// traversal. An `Err` is terminal and carries no continuation signal.
pub type VisitResult = Result<bool, ErrorCode>;

/// Consumer side of the event protocol.
///
/// Implementors supply the ten primitive operations. Half floats, typed
/// arrays and multi-dimensional arrays have default bodies in
/// [`decompose`] that re-express them as primitive events, so a visitor that
/// only understands the primitives still receives every event. Override a
/// default to consume the compound form directly.
///
/// The `visit_*` methods are the positionless form: errors come back as a bare
/// [`ErrorCode`]. [`VisitorExt`] wraps each of them into a form that reports
/// [`SerError`] with the caller's position.
///
/// Producers must stop emitting as soon as an operation returns `Ok(false)`
/// or `Err`, without closing containers that are still open.
pub trait Visitor {
    /// `len` is a size hint; `None` means the count is known only once the
    /// matching end event arrives.
    fn visit_begin_object(
        &mut self,
        len: Option<usize>,
        tag: SemanticTag,
        context: &SerContext,
    ) -> VisitResult;

    fn visit_end_object(&mut self, context: &SerContext) -> VisitResult;

    fn visit_begin_array(
        &mut self,
        len: Option<usize>,
        tag: SemanticTag,
        context: &SerContext,
    ) -> VisitResult;

    fn visit_end_array(&mut self, context: &SerContext) -> VisitResult;

    fn visit_key(&mut self, name: &str, context: &SerContext) -> VisitResult;

    fn visit_null(&mut self, tag: SemanticTag, context: &SerContext) -> VisitResult;

    fn visit_bool(
        &mut self,
        value: bool,
        tag: SemanticTag,
        context: &SerContext,
    ) -> VisitResult;

    fn visit_string(
        &mut self,
        value: &str,
        tag: SemanticTag,
        context: &SerContext,
    ) -> VisitResult;

    fn visit_byte_string(
        &mut self,
        value: &[u8],
        tag: SemanticTag,
        context: &SerContext,
    ) -> VisitResult;

    fn visit_uint64(
        &mut self,
        value: u64,
        tag: SemanticTag,
        context: &SerContext,
    ) -> VisitResult;

    fn visit_int64(
        &mut self,
        value: i64,
        tag: SemanticTag,
        context: &SerContext,
    ) -> VisitResult;

    fn visit_double(
        &mut self,
        value: f64,
        tag: SemanticTag,
        context: &SerContext,
    ) -> VisitResult;

    /// `value` is an IEEE-754 binary16 bit pattern.
    fn visit_half(&mut self, value: u16, tag: SemanticTag, context: &SerContext) -> VisitResult {
        decompose::half(self, value, tag, context)
    }

    fn visit_typed_array(
        &mut self,
        data: TypedArrayView<'_>,
        tag: SemanticTag,
        context: &SerContext,
    ) -> VisitResult {
        decompose::typed_array(self, data, tag, context)
    }

    /// Opens a multi-dimensional array. The caller emits the flattened
    /// payload next and closes with [`visit_end_multi_dim`](Self::visit_end_multi_dim).
    fn visit_begin_multi_dim(
        &mut self,
        shape: &[usize],
        tag: SemanticTag,
        context: &SerContext,
    ) -> VisitResult {
        decompose::begin_multi_dim(self, shape, tag, context)
    }

    fn visit_end_multi_dim(&mut self, context: &SerContext) -> VisitResult {
        decompose::end_multi_dim(self, context)
    }

    /// Must be safe to call any number of times.
    fn visit_flush(&mut self) -> Result<(), ErrorCode> {
        Ok(())
    }
}

impl<V: Visitor + ?Sized> Visitor for &mut V {
    fn visit_begin_object(
        &mut self,
        len: Option<usize>,
        tag: SemanticTag,
        context: &SerContext,
    ) -> VisitResult {
        (**self).visit_begin_object(len, tag, context)
    }

    fn visit_end_object(&mut self, context: &SerContext) -> VisitResult {
        (**self).visit_end_object(context)
    }

    fn visit_begin_array(
        &mut self,
        len: Option<usize>,
        tag: SemanticTag,
        context: &SerContext,
    ) -> VisitResult {
        (**self).visit_begin_array(len, tag, context)
    }

    fn visit_end_array(&mut self, context: &SerContext) -> VisitResult {
        (**self).visit_end_array(context)
    }

    fn visit_key(&mut self, name: &str, context: &SerContext) -> VisitResult {
        (**self).visit_key(name, context)
    }

    fn visit_null(&mut self, tag: SemanticTag, context: &SerContext) -> VisitResult {
        (**self).visit_null(tag, context)
    }

    fn visit_bool(
        &mut self,
        value: bool,
        tag: SemanticTag,
        context: &SerContext,
    ) -> VisitResult {
        (**self).visit_bool(value, tag, context)
    }

    fn visit_string(
        &mut self,
        value: &str,
        tag: SemanticTag,
        context: &SerContext,
    ) -> VisitResult {
        (**self).visit_string(value, tag, context)
    }

    fn visit_byte_string(
        &mut self,
        value: &[u8],
        tag: SemanticTag,
        context: &SerContext,
    ) -> VisitResult {
        (**self).visit_byte_string(value, tag, context)
    }

    fn visit_uint64(
        &mut self,
        value: u64,
        tag: SemanticTag,
        context: &SerContext,
    ) -> VisitResult {
        (**self).visit_uint64(value, tag, context)
    }

    fn visit_int64(
        &mut self,
        value: i64,
        tag: SemanticTag,
        context: &SerContext,
    ) -> VisitResult {
        (**self).visit_int64(value, tag, context)
    }

    fn visit_double(
        &mut self,
        value: f64,
        tag: SemanticTag,
        context: &SerContext,
    ) -> VisitResult {
        (**self).visit_double(value, tag, context)
    }

    fn visit_half(&mut self, value: u16, tag: SemanticTag, context: &SerContext) -> VisitResult {
        (**self).visit_half(value, tag, context)
    }

    fn visit_typed_array(
        &mut self,
        data: TypedArrayView<'_>,
        tag: SemanticTag,
        context: &SerContext,
    ) -> VisitResult {
        (**self).visit_typed_array(data, tag, context)
    }

    fn visit_begin_multi_dim(
        &mut self,
        shape: &[usize],
        tag: SemanticTag,
        context: &SerContext,
    ) -> VisitResult {
        (**self).visit_begin_multi_dim(shape, tag, context)
    }

    fn visit_end_multi_dim(&mut self, context: &SerContext) -> VisitResult {
        (**self).visit_end_multi_dim(context)
    }

    fn visit_flush(&mut self) -> Result<(), ErrorCode> {
        (**self).visit_flush()
    }
}

/// Positional form of every [`Visitor`] operation.
///
/// Each method forwards to the matching `visit_*` method unchanged and only
/// converts an `Err(code)` into a [`SerError`] carrying `context`.
pub trait VisitorExt: Visitor {
    fn begin_object(
        &mut self,
        len: Option<usize>,
        tag: SemanticTag,
        context: &SerContext,
    ) -> Result<bool, SerError> {
        locate(self.visit_begin_object(len, tag, context), context)
    }

    fn end_object(&mut self, context: &SerContext) -> Result<bool, SerError> {
        locate(self.visit_end_object(context), context)
    }

    fn begin_array(
        &mut self,
        len: Option<usize>,
        tag: SemanticTag,
        context: &SerContext,
    ) -> Result<bool, SerError> {
        locate(self.visit_begin_array(len, tag, context), context)
    }

    fn end_array(&mut self, context: &SerContext) -> Result<bool, SerError> {
        locate(self.visit_end_array(context), context)
    }

    fn key(&mut self, name: &str, context: &SerContext) -> Result<bool, SerError> {
        locate(self.visit_key(name, context), context)
    }

    fn null_value(&mut self, tag: SemanticTag, context: &SerContext) -> Result<bool, SerError> {
        locate(self.visit_null(tag, context), context)
    }

    fn bool_value(
        &mut self,
        value: bool,
        tag: SemanticTag,
        context: &SerContext,
    ) -> Result<bool, SerError> {
        locate(self.visit_bool(value, tag, context), context)
    }

    fn string_value(
        &mut self,
        value: &str,
        tag: SemanticTag,
        context: &SerContext,
    ) -> Result<bool, SerError> {
        locate(self.visit_string(value, tag, context), context)
    }

    fn byte_string_value(
        &mut self,
        value: &[u8],
        tag: SemanticTag,
        context: &SerContext,
    ) -> Result<bool, SerError> {
        locate(self.visit_byte_string(value, tag, context), context)
    }

    fn uint64_value(
        &mut self,
        value: u64,
        tag: SemanticTag,
        context: &SerContext,
    ) -> Result<bool, SerError> {
        locate(self.visit_uint64(value, tag, context), context)
    }

    fn int64_value(
        &mut self,
        value: i64,
        tag: SemanticTag,
        context: &SerContext,
    ) -> Result<bool, SerError> {
        locate(self.visit_int64(value, tag, context), context)
    }

    fn half_value(
        &mut self,
        value: u16,
        tag: SemanticTag,
        context: &SerContext,
    ) -> Result<bool, SerError> {
        locate(self.visit_half(value, tag, context), context)
    }

    fn double_value(
        &mut self,
        value: f64,
        tag: SemanticTag,
        context: &SerContext,
    ) -> Result<bool, SerError> {
        locate(self.visit_double(value, tag, context), context)
    }

    fn typed_array(
        &mut self,
        data: TypedArrayView<'_>,
        tag: SemanticTag,
        context: &SerContext,
    ) -> Result<bool, SerError> {
        locate(self.visit_typed_array(data, tag, context), context)
    }

    fn begin_multi_dim(
        &mut self,
        shape: &[usize],
        tag: SemanticTag,
        context: &SerContext,
    ) -> Result<bool, SerError> {
        locate(self.visit_begin_multi_dim(shape, tag, context), context)
    }

    fn end_multi_dim(&mut self, context: &SerContext) -> Result<bool, SerError> {
        locate(self.visit_end_multi_dim(context), context)
    }

    /// Flush carries no position; failures report the unknown position
    /// `SerContext::default()`, indistinguishable from `at_offset(0)`.
    fn flush(&mut self) -> Result<(), SerError> {
        self.visit_flush()
            .map_err(|code| SerError::new(code, &SerContext::default()))
    }
}

impl<V: Visitor + ?Sized> VisitorExt for V {}

fn locate(result: VisitResult, context: &SerContext) -> Result<bool, SerError> {
    result.map_err(|code| SerError::new(code, context))
}
