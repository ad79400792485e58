//! Owned-enum view of protocol events and the pull-side cursor contract.

use crate::{
    error::{ErrorCode, SerError},
    ser_context::SerContext,
    tag::SemanticTag,
    typed_array::TypedArrayView,
    visitor::{VisitResult, Visitor},
};

/// One protocol event. Payloads borrow from the producer's input.
#[derive(Debug, Clone, PartialEq)]
pub enum Event<'a> {
    BeginObject {
        len: Option<usize>,
        tag: SemanticTag,
    },
    EndObject,
    BeginArray {
        len: Option<usize>,
        tag: SemanticTag,
    },
    EndArray,
    Key(&'a str),
    Null(SemanticTag),
    Bool(bool, SemanticTag),
    String(&'a str, SemanticTag),
    ByteString(&'a [u8], SemanticTag),
    UInt64(u64, SemanticTag),
    Int64(i64, SemanticTag),
    /// IEEE-754 binary16 bit pattern.
    Half(u16, SemanticTag),
    Double(f64, SemanticTag),
    TypedArray(TypedArrayView<'a>, SemanticTag),
    BeginMultiDim {
        shape: &'a [usize],
        tag: SemanticTag,
    },
    EndMultiDim,
    Flush,
}

impl Event<'_> {
    /// Deliver this event to `visitor` through the matching positionless
    /// operation. `Flush` reports `Ok(true)` on success.
    pub fn visit<V: Visitor + ?Sized>(
        &self,
        visitor: &mut V,
        context: &SerContext,
    ) -> VisitResult {
        match *self {
            Event::BeginObject { len, tag } => visitor.visit_begin_object(len, tag, context),
            Event::EndObject => visitor.visit_end_object(context),
            Event::BeginArray { len, tag } => visitor.visit_begin_array(len, tag, context),
            Event::EndArray => visitor.visit_end_array(context),
            Event::Key(name) => visitor.visit_key(name, context),
            Event::Null(tag) => visitor.visit_null(tag, context),
            Event::Bool(v, tag) => visitor.visit_bool(v, tag, context),
            Event::String(v, tag) => visitor.visit_string(v, tag, context),
            Event::ByteString(v, tag) => visitor.visit_byte_string(v, tag, context),
            Event::UInt64(v, tag) => visitor.visit_uint64(v, tag, context),
            Event::Int64(v, tag) => visitor.visit_int64(v, tag, context),
            Event::Half(v, tag) => visitor.visit_half(v, tag, context),
            Event::Double(v, tag) => visitor.visit_double(v, tag, context),
            Event::TypedArray(data, tag) => visitor.visit_typed_array(data, tag, context),
            Event::BeginMultiDim { shape, tag } => {
                visitor.visit_begin_multi_dim(shape, tag, context)
            }
            Event::EndMultiDim => visitor.visit_end_multi_dim(context),
            Event::Flush => visitor.visit_flush().map(|()| true),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Event::BeginObject { .. } => "BeginObject",
            Event::EndObject => "EndObject",
            Event::BeginArray { .. } => "BeginArray",
            Event::EndArray => "EndArray",
            Event::Key(_) => "Key",
            Event::Null(_) => "Null",
            Event::Bool(..) => "Bool",
            Event::String(..) => "String",
            Event::ByteString(..) => "ByteString",
            Event::UInt64(..) => "UInt64",
            Event::Int64(..) => "Int64",
            Event::Half(..) => "Half",
            Event::Double(..) => "Double",
            Event::TypedArray(..) => "TypedArray",
            Event::BeginMultiDim { .. } => "BeginMultiDim",
            Event::EndMultiDim => "EndMultiDim",
            Event::Flush => "Flush",
        }
    }

    /// True for events that open a container.
    pub fn is_begin(&self) -> bool {
        matches!(
            self,
            Event::BeginObject { .. } | Event::BeginArray { .. } | Event::BeginMultiDim { .. }
        )
    }
}

/// Pull-style event source: the consumer asks for one event at a time.
pub trait EventCursor<'de> {
    /// Next event, or `None` once the traversal is complete.
    fn next_event(&mut self) -> Result<Option<Event<'de>>, ErrorCode>;

    /// Position of the most recently returned event (or of the failure).
    fn context(&self) -> SerContext;

    /// Push the remaining events into `visitor` until the cursor is exhausted
    /// or the visitor asks to stop. Returns `false` when the visitor stopped.
    fn read_to<V: Visitor + ?Sized>(&mut self, visitor: &mut V) -> Result<bool, SerError>
    where
        Self: Sized,
    {
        while let Some(event) = self
            .next_event()
            .map_err(|code| SerError::new(code, &self.context()))?
        {
            let context = self.context();
            let more = event
                .visit(visitor, &context)
                .map_err(|code| SerError::new(code, &context))?;
            if !more {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
