//! Default expansions of compound events into primitive events.
//!
//! These back the default bodies of [`Visitor`]'s optional methods and are
//! public so an overriding visitor can still fall back to them for the cases
//! it does not handle itself.
//!
//! Every expansion checks the continuation signal after each emitted event
//! and returns as soon as it reads `false` or an error. Containers opened
//! before that point are left open.

use crate::{
    ser_context::SerContext,
    tag::SemanticTag,
    typed_array::TypedArrayView,
    visitor::{VisitResult, Visitor},
};

const HALF_EXPONENT_BIAS: u64 = 15;
const DOUBLE_EXPONENT_BIAS: u64 = 1023;

/// Widen an IEEE-754 binary16 bit pattern to `f64`.
///
/// Exact for every input. Subnormals are normalized, the all-ones exponent
/// maps to infinity or NaN with the mantissa payload kept in the high bits.
pub fn decode_half(bits: u16) -> f64 {
    let sign = u64::from(bits & 0x8000) << 48;
    let exponent = u64::from((bits >> 10) & 0x1f);
    let mantissa = u64::from(bits & 0x03ff);

    let magnitude = match (exponent, mantissa) {
        (0, 0) => 0,
        (0, _) => {
            // Shift the leading 1 into the implicit bit position (bit 10).
            let shift = u64::from(mantissa.leading_zeros()) - 53;
            let mantissa = (mantissa << shift) & 0x03ff;
            let exponent = DOUBLE_EXPONENT_BIAS - HALF_EXPONENT_BIAS + 1 - shift;
            (exponent << 52) | (mantissa << 42)
        }
        (0x1f, _) => (0x7ff << 52) | (mantissa << 42),
        _ => ((exponent + DOUBLE_EXPONENT_BIAS - HALF_EXPONENT_BIAS) << 52) | (mantissa << 42),
    };
    f64::from_bits(sign | magnitude)
}

/// Forward a half float to the double primitive with the same tag.
pub fn half<V: Visitor + ?Sized>(
    visitor: &mut V,
    value: u16,
    tag: SemanticTag,
    context: &SerContext,
) -> VisitResult {
    visitor.visit_double(decode_half(value), tag, context)
}

/// Emit `begin_array(len, tag)`, one untagged scalar per element, then
/// `end_array`.
///
/// Unsigned elements go to `visit_uint64`, signed to `visit_int64`, half
/// elements to `visit_half` and `f32`/`f64` to `visit_double`.
pub fn typed_array<V: Visitor + ?Sized>(
    visitor: &mut V,
    data: TypedArrayView<'_>,
    tag: SemanticTag,
    context: &SerContext,
) -> VisitResult {
    match data {
        TypedArrayView::U8(s) => emit_elements(visitor, s, tag, context, |v, x, ctx| {
            v.visit_uint64(u64::from(x), SemanticTag::None, ctx)
        }),
        TypedArrayView::U16(s) => emit_elements(visitor, s, tag, context, |v, x, ctx| {
            v.visit_uint64(u64::from(x), SemanticTag::None, ctx)
        }),
        TypedArrayView::U32(s) => emit_elements(visitor, s, tag, context, |v, x, ctx| {
            v.visit_uint64(u64::from(x), SemanticTag::None, ctx)
        }),
        TypedArrayView::U64(s) => emit_elements(visitor, s, tag, context, |v, x, ctx| {
            v.visit_uint64(x, SemanticTag::None, ctx)
        }),
        TypedArrayView::I8(s) => emit_elements(visitor, s, tag, context, |v, x, ctx| {
            v.visit_int64(i64::from(x), SemanticTag::None, ctx)
        }),
        TypedArrayView::I16(s) => emit_elements(visitor, s, tag, context, |v, x, ctx| {
            v.visit_int64(i64::from(x), SemanticTag::None, ctx)
        }),
        TypedArrayView::I32(s) => emit_elements(visitor, s, tag, context, |v, x, ctx| {
            v.visit_int64(i64::from(x), SemanticTag::None, ctx)
        }),
        TypedArrayView::I64(s) => emit_elements(visitor, s, tag, context, |v, x, ctx| {
            v.visit_int64(x, SemanticTag::None, ctx)
        }),
        TypedArrayView::Half(s) => emit_elements(visitor, s, tag, context, |v, x, ctx| {
            v.visit_half(x, SemanticTag::None, ctx)
        }),
        TypedArrayView::F32(s) => emit_elements(visitor, s, tag, context, |v, x, ctx| {
            v.visit_double(f64::from(x), SemanticTag::None, ctx)
        }),
        TypedArrayView::F64(s) => emit_elements(visitor, s, tag, context, |v, x, ctx| {
            v.visit_double(x, SemanticTag::None, ctx)
        }),
    }
}

fn emit_elements<V, T, F>(
    visitor: &mut V,
    items: &[T],
    tag: SemanticTag,
    context: &SerContext,
    mut emit: F,
) -> VisitResult
where
    V: Visitor + ?Sized,
    T: Copy,
    F: FnMut(&mut V, T, &SerContext) -> VisitResult,
{
    if !visitor.visit_begin_array(Some(items.len()), tag, context)? {
        return Ok(false);
    }
    for &item in items {
        if !emit(visitor, item, context)? {
            return Ok(false);
        }
    }
    visitor.visit_end_array(context)
}

/// Open a multi-dimensional array as `[shape, data]`.
///
/// Emits `begin_array(2, tag)`, then the shape as `begin_array(rank, tag)`,
/// one untagged `uint64` per dimension and `end_array`. The outer array stays
/// open for the caller's flattened payload; [`end_multi_dim`] closes it.
pub fn begin_multi_dim<V: Visitor + ?Sized>(
    visitor: &mut V,
    shape: &[usize],
    tag: SemanticTag,
    context: &SerContext,
) -> VisitResult {
    if !visitor.visit_begin_array(Some(2), tag, context)? {
        return Ok(false);
    }
    if !visitor.visit_begin_array(Some(shape.len()), tag, context)? {
        return Ok(false);
    }
    for &dim in shape {
        if !visitor.visit_uint64(dim as u64, SemanticTag::None, context)? {
            return Ok(false);
        }
    }
    visitor.visit_end_array(context)
}

/// Close the outer array opened by [`begin_multi_dim`].
pub fn end_multi_dim<V: Visitor + ?Sized>(visitor: &mut V, context: &SerContext) -> VisitResult {
    visitor.visit_end_array(context)
}
