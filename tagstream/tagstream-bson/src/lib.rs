//! BSON event source for tagstream visitors.
//!
//! [`BsonCursor`] hands out one event at a time; [`BsonReader`] pushes a whole
//! document into a [`Visitor`](tagstream_core::Visitor). Both run the same
//! parser, so a document produces identical events either way.
//!
//! Supported element types: double, string, embedded document, array, binary,
//! boolean, UTC datetime (as `Int64` tagged `EpochMilli`), null, int32, timestamp
//! and int64.

mod cursor;
mod options;
mod parser;
mod reader;

pub use cursor::BsonCursor;
pub use options::{BsonDecodeOptions, DEFAULT_MAX_NESTING_DEPTH};
pub use parser::FrameStack;
pub use reader::BsonReader;
