//! Decode entry points: BSON bytes to a generic [`Value`] or to any
//! `Deserialize` type.

use std::{
    io::{self, Read},
    mem,
};

use rayon::prelude::*;
use serde::de::{Deserialize, DeserializeOwned};
use tagstream_bson::{BsonCursor, BsonDecodeOptions, BsonReader, FrameStack};
use tagstream_core::{ErrorCode, SerContext, SerError, Value, ValueBuilder};
use tracing::debug;

use crate::{de::Deserializer, error::DecodeError};

// Length prefixes come from untrusted input; grow past this only as bytes arrive.
const MAX_PREALLOCATED: usize = 64 * 1024;

/// Temporary storage reused across decodes: the stream input buffer and the
/// parser's container stack. Never part of a returned value.
#[derive(Debug, Default)]
pub struct Scratch {
    buffer: Vec<u8>,
    frames: FrameStack,
}

impl Scratch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preallocate room for `bytes` of stream input.
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(bytes),
            frames: FrameStack::new(),
        }
    }

    pub fn buffer_capacity(&self) -> usize {
        self.buffer.capacity()
    }
}

/// Decodes BSON documents, either into a [`Value`] tree (`decode_document*`)
/// or straight into a `Deserialize` type (`decode*`).
#[derive(Debug, Clone, Default)]
pub struct BsonDecoder {
    options: BsonDecodeOptions,
}

/// Builder for configuring [`BsonDecoder`].
#[derive(Debug, Clone, Default)]
pub struct BsonDecoderBuilder {
    options: BsonDecodeOptions,
}

impl BsonDecoderBuilder {
    pub fn with_options(mut self, options: BsonDecodeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn build(self) -> BsonDecoder {
        BsonDecoder {
            options: self.options,
        }
    }
}

impl BsonDecoder {
    /// Create a builder for [`BsonDecoder`].
    pub fn builder() -> BsonDecoderBuilder {
        BsonDecoderBuilder::default()
    }

    pub fn new() -> Self {
        Self::default()
    }

    pub fn options(&self) -> &BsonDecodeOptions {
        &self.options
    }

    /// Materialize one in-memory document.
    pub fn decode_document(&self, input: &[u8]) -> Result<Value, DecodeError> {
        self.decode_document_with_scratch(input, &mut Scratch::new())
    }

    pub fn decode_document_with_scratch(
        &self,
        input: &[u8],
        scratch: &mut Scratch,
    ) -> Result<Value, DecodeError> {
        debug!(
            target: "tagstream::decode",
            input_len = input.len(),
            strategy = "document",
            "decoding"
        );
        let frames = mem::take(&mut scratch.frames);
        let mut reader =
            BsonReader::with_frames(input, ValueBuilder::new(), &self.options, frames);
        let outcome = reader.read();
        let (builder, frames) = reader.into_parts();
        scratch.frames = frames;

        let result = outcome.map_err(DecodeError::from).and_then(|_| {
            builder.into_value().ok_or_else(|| {
                SerError::new(ErrorCode::UnexpectedEof, &SerContext::at_offset(input.len())).into()
            })
        });
        log_outcome("document", &result);
        result
    }

    /// Read one length-prefixed document from `reader` and materialize it.
    pub fn decode_document_from_reader<R: Read>(&self, reader: R) -> Result<Value, DecodeError> {
        self.decode_document_from_reader_with_scratch(reader, &mut Scratch::new())
    }

    pub fn decode_document_from_reader_with_scratch<R: Read>(
        &self,
        reader: R,
        scratch: &mut Scratch,
    ) -> Result<Value, DecodeError> {
        let mut buffer = mem::take(&mut scratch.buffer);
        let result = read_document(reader, &mut buffer)
            .and_then(|()| self.decode_document_with_scratch(&buffer, scratch));
        scratch.buffer = buffer;
        result
    }

    /// Deserialize `T` from one in-memory document. `T` may borrow strings
    /// and byte strings from `input`.
    pub fn decode<'de, T: Deserialize<'de>>(&self, input: &'de [u8]) -> Result<T, DecodeError> {
        self.decode_with_scratch(input, &mut Scratch::new())
    }

    pub fn decode_with_scratch<'de, T: Deserialize<'de>>(
        &self,
        input: &'de [u8],
        scratch: &mut Scratch,
    ) -> Result<T, DecodeError> {
        debug!(
            target: "tagstream::decode",
            input_len = input.len(),
            strategy = "typed",
            "decoding"
        );
        let frames = mem::take(&mut scratch.frames);
        let mut de = Deserializer::new(BsonCursor::with_frames(input, &self.options, frames));
        let result = de.read_value();
        scratch.frames = de.into_cursor().into_frames();
        log_outcome("typed", &result);
        result
    }

    /// Read one length-prefixed document from `reader` and deserialize `T`.
    pub fn decode_from_reader<T: DeserializeOwned, R: Read>(
        &self,
        reader: R,
    ) -> Result<T, DecodeError> {
        self.decode_from_reader_with_scratch(reader, &mut Scratch::new())
    }

    pub fn decode_from_reader_with_scratch<T: DeserializeOwned, R: Read>(
        &self,
        reader: R,
        scratch: &mut Scratch,
    ) -> Result<T, DecodeError> {
        let mut buffer = mem::take(&mut scratch.buffer);
        let result = read_document(reader, &mut buffer)
            .and_then(|()| self.decode_with_scratch(&buffer, scratch));
        scratch.buffer = buffer;
        result
    }

    /// Materialize independent documents on the rayon thread pool. Results
    /// keep the input order.
    pub fn decode_documents_par(&self, inputs: &[&[u8]]) -> Vec<Result<Value, DecodeError>> {
        debug!(
            target: "tagstream::decode",
            documents = inputs.len(),
            "decoding documents in parallel"
        );
        inputs
            .par_iter()
            .map(|input| self.decode_document(input))
            .collect()
    }
}

/// Materialize one document with default options.
pub fn decode_bson_document(input: &[u8]) -> Result<Value, DecodeError> {
    BsonDecoder::new().decode_document(input)
}

/// Deserialize `T` from one document with default options.
pub fn decode_bson<'de, T: Deserialize<'de>>(input: &'de [u8]) -> Result<T, DecodeError> {
    BsonDecoder::new().decode(input)
}

fn log_outcome<T>(strategy: &'static str, result: &Result<T, DecodeError>) {
    match result {
        Ok(_) => debug!(target: "tagstream::decode", strategy, "decoded"),
        Err(err) => debug!(
            target: "tagstream::decode",
            strategy,
            error = %err,
            "decode failed"
        ),
    }
}

/// Read a length-prefixed document into `buffer`, replacing its contents.
fn read_document<R: Read>(mut reader: R, buffer: &mut Vec<u8>) -> Result<(), DecodeError> {
    buffer.clear();
    let mut prefix = [0u8; 4];
    reader
        .read_exact(&mut prefix)
        .map_err(|err| premature_end(err, 0))?;
    let len = usize::try_from(i32::from_le_bytes(prefix))
        .ok()
        .filter(|&len| len >= 5)
        .ok_or_else(|| SerError::new(ErrorCode::InvalidLength, &SerContext::at_offset(0)))?;

    buffer.reserve(len.min(MAX_PREALLOCATED));
    buffer.extend_from_slice(&prefix);
    let body = (len - prefix.len()) as u64;
    let read = reader.take(body).read_to_end(buffer)?;
    if (read as u64) < body {
        return Err(premature_end(
            io::ErrorKind::UnexpectedEof.into(),
            buffer.len(),
        ));
    }
    Ok(())
}

fn premature_end(err: io::Error, offset: usize) -> DecodeError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        SerError::new(ErrorCode::UnexpectedEof, &SerContext::at_offset(offset)).into()
    } else {
        err.into()
    }
}
