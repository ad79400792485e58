//! Decode BSON over the tagstream event protocol.
//!
//! Two explicit strategies:
//!
//! - `decode_document*` drives a [`BsonReader`](bson::BsonReader) into a
//!   [`ValueBuilder`](core::ValueBuilder) and returns the generic [`Value`].
//! - `decode*::<T>` pulls events from a [`BsonCursor`](bson::BsonCursor)
//!   through the serde [`Deserializer`] and builds `T` directly.
//!
//! Both accept a reusable [`Scratch`] for their temporary buffers.

mod de;
mod decode;
mod error;

pub use de::{Deserializer, from_cursor};
pub use decode::{BsonDecoder, BsonDecoderBuilder, Scratch, decode_bson, decode_bson_document};
pub use error::DecodeError;
pub use tagstream_bson as bson;
pub use tagstream_core as core;
pub use tagstream_core::Value;
