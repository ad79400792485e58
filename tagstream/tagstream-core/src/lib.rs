//! Format-agnostic event protocol for tagged hierarchical data.
//!
//! This crate provides the [`Visitor`] contract that format readers push
//! events into, the default decompositions that let a minimal visitor handle
//! half floats, typed numeric arrays and multi-dimensional arrays, and the
//! positional error layer ([`VisitorExt`]). It also ships a generic document
//! [`Value`] together with the [`ValueBuilder`] visitor that materializes it.

mod builder;
pub mod decompose;
mod default_visitor;
mod error;
mod event;
#[cfg(feature = "serde")]
mod serde_impl;
mod ser_context;
mod tag;
mod typed_array;
mod value;
mod visitor;

pub use builder::ValueBuilder;
pub use decompose::decode_half;
pub use default_visitor::DefaultVisitor;
pub use error::{ErrorCode, ErrorKind, SerError, ValueTypeError};
pub use event::{Event, EventCursor};
pub use ser_context::SerContext;
pub use tag::SemanticTag;
pub use typed_array::TypedArrayView;
pub use value::Value;
pub use visitor::{VisitResult, Visitor, VisitorExt};
