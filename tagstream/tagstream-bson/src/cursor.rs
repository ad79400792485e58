use tagstream_core::{ErrorCode, Event, EventCursor, SerContext};

use crate::{
    options::BsonDecodeOptions,
    parser::{BsonParser, FrameStack},
};

/// Pull-style BSON event source over an in-memory document.
///
/// Events borrow keys, strings and binary payloads from the input. Positions
/// are reported as byte offsets (line 0).
pub struct BsonCursor<'a> {
    parser: BsonParser<'a>,
}

impl<'a> BsonCursor<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_options(input, &BsonDecodeOptions::default())
    }

    pub fn with_options(input: &'a [u8], options: &BsonDecodeOptions) -> Self {
        Self::with_frames(input, options, FrameStack::new())
    }

    /// Like [`with_options`](Self::with_options), reusing a container stack
    /// from an earlier traversal.
    pub fn with_frames(input: &'a [u8], options: &BsonDecodeOptions, frames: FrameStack) -> Self {
        Self {
            parser: BsonParser::new(input, options, frames),
        }
    }

    /// Bytes consumed so far.
    pub fn offset(&self) -> usize {
        self.parser.offset()
    }

    /// Number of currently open documents and arrays.
    pub fn depth(&self) -> usize {
        self.parser.depth()
    }

    pub fn into_frames(self) -> FrameStack {
        self.parser.into_frames()
    }
}

impl<'a> EventCursor<'a> for BsonCursor<'a> {
    fn next_event(&mut self) -> Result<Option<Event<'a>>, ErrorCode> {
        self.parser.next_event()
    }

    fn context(&self) -> SerContext {
        SerContext::at_offset(self.parser.event_start())
    }
}
