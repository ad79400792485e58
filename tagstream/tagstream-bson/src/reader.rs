use tagstream_core::{EventCursor, SerError, Visitor};
use tracing::{debug, warn};

use crate::{cursor::BsonCursor, options::BsonDecodeOptions, parser::FrameStack};

/// Push-style BSON reader: parses one document and drives a [`Visitor`].
pub struct BsonReader<'a, V> {
    cursor: BsonCursor<'a>,
    input_len: usize,
    visitor: V,
}

impl<'a, V: Visitor> BsonReader<'a, V> {
    pub fn new(input: &'a [u8], visitor: V) -> Self {
        Self::with_options(input, visitor, &BsonDecodeOptions::default())
    }

    pub fn with_options(input: &'a [u8], visitor: V, options: &BsonDecodeOptions) -> Self {
        Self::with_frames(input, visitor, options, FrameStack::new())
    }

    pub fn with_frames(
        input: &'a [u8],
        visitor: V,
        options: &BsonDecodeOptions,
        frames: FrameStack,
    ) -> Self {
        Self {
            cursor: BsonCursor::with_frames(input, options, frames),
            input_len: input.len(),
            visitor,
        }
    }

    /// Deliver the document's events to the visitor.
    ///
    /// Returns `Ok(false)` if the visitor asked to stop; open containers are
    /// then left unterminated and no flush happens. On completion the visitor
    /// is flushed and `Ok(true)` returned. Parse and visitor errors are
    /// reported with the byte offset of the offending event.
    pub fn read(&mut self) -> Result<bool, SerError> {
        debug!(
            target: "tagstream::bson",
            input_len = self.input_len,
            "reading document"
        );
        let completed = self
            .cursor
            .read_to(&mut self.visitor)
            .inspect_err(|err| {
                debug!(target: "tagstream::bson", error = %err, "document rejected");
            })?;
        if !completed {
            warn!(
                target: "tagstream::bson",
                offset = self.cursor.offset(),
                depth = self.cursor.depth(),
                "traversal cancelled by visitor"
            );
            return Ok(false);
        }
        self.visitor
            .visit_flush()
            .map_err(|code| SerError::new(code, &self.cursor.context()))?;
        Ok(true)
    }

    pub fn visitor(&self) -> &V {
        &self.visitor
    }

    pub fn visitor_mut(&mut self) -> &mut V {
        &mut self.visitor
    }

    pub fn into_visitor(self) -> V {
        self.visitor
    }

    /// Split into the visitor and the container stack for reuse.
    pub fn into_parts(self) -> (V, FrameStack) {
        (self.visitor, self.cursor.into_frames())
    }
}
