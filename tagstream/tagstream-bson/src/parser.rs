//! BSON pull parser shared by the cursor and the push reader.

use bytes::Buf;
use tagstream_core::{ErrorCode, Event, SemanticTag};
use tracing::{trace, warn};

use crate::options::BsonDecodeOptions;

mod element {
    pub(super) const DOUBLE: u8 = 0x01;
    pub(super) const STRING: u8 = 0x02;
    pub(super) const DOCUMENT: u8 = 0x03;
    pub(super) const ARRAY: u8 = 0x04;
    pub(super) const BINARY: u8 = 0x05;
    pub(super) const BOOL: u8 = 0x08;
    pub(super) const DATETIME: u8 = 0x09;
    pub(super) const NULL: u8 = 0x0a;
    pub(super) const INT32: u8 = 0x10;
    pub(super) const TIMESTAMP: u8 = 0x11;
    pub(super) const INT64: u8 = 0x12;
}

// Length prefix plus terminator.
const MIN_DOCUMENT_LEN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Document,
    Array,
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    /// Offset of the container's terminating zero byte.
    end: usize,
    container: Container,
}

/// Container stack of a BSON traversal.
///
/// Take it back from a finished cursor or reader and hand it to the next one
/// to reuse its allocation.
#[derive(Debug, Clone, Default)]
pub struct FrameStack(Vec<Frame>);

impl FrameStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(depth: usize) -> Self {
        Self(Vec::with_capacity(depth))
    }

    pub fn capacity(&self) -> usize {
        self.0.capacity()
    }
}

#[derive(Debug, Clone, Copy)]
enum State {
    Start,
    Body,
    /// A document key was returned; its value comes next.
    Value(u8),
    Done,
    Failed(ErrorCode),
}

fn eof<E>(_: E) -> ErrorCode {
    ErrorCode::UnexpectedEof
}

pub(crate) struct BsonParser<'a> {
    input: &'a [u8],
    buf: &'a [u8],
    frames: Vec<Frame>,
    max_depth: usize,
    state: State,
    event_start: usize,
}

impl<'a> BsonParser<'a> {
    pub(crate) fn new(input: &'a [u8], options: &BsonDecodeOptions, frames: FrameStack) -> Self {
        let mut frames = frames.0;
        frames.clear();
        Self {
            input,
            buf: input,
            frames,
            max_depth: options.max_nesting_depth(),
            state: State::Start,
            event_start: 0,
        }
    }

    pub(crate) fn offset(&self) -> usize {
        self.input.len() - self.buf.remaining()
    }

    /// Byte offset where the last returned event (or failure) starts.
    pub(crate) fn event_start(&self) -> usize {
        self.event_start
    }

    pub(crate) fn depth(&self) -> usize {
        self.frames.len()
    }

    pub(crate) fn into_frames(self) -> FrameStack {
        FrameStack(self.frames)
    }

    pub(crate) fn next_event(&mut self) -> Result<Option<Event<'a>>, ErrorCode> {
        self.event_start = self.offset();
        let result = match self.state {
            State::Done => return Ok(None),
            State::Failed(code) => return Err(code),
            State::Start => self.root(),
            State::Body => match self.frames.last().copied() {
                Some(frame) => self.element(frame),
                None => {
                    self.state = State::Done;
                    return Ok(None);
                }
            },
            State::Value(element_type) => {
                self.state = State::Body;
                self.value(element_type)
            }
        };
        match result {
            Ok(event) => Ok(Some(event)),
            Err(code) => {
                self.state = State::Failed(code);
                Err(code)
            }
        }
    }

    fn root(&mut self) -> Result<Event<'a>, ErrorCode> {
        let end = self.container_len()?;
        if end >= self.input.len() {
            return Err(ErrorCode::UnexpectedEof);
        }
        self.push(Frame {
            end,
            container: Container::Document,
        })?;
        self.state = State::Body;
        Ok(Event::BeginObject {
            len: None,
            tag: SemanticTag::None,
        })
    }

    fn element(&mut self, frame: Frame) -> Result<Event<'a>, ErrorCode> {
        let at_end = self.offset() == frame.end;
        let element_type = self.buf.try_get_u8().map_err(eof)?;
        if at_end {
            if element_type != 0 {
                return Err(ErrorCode::MissingTerminator);
            }
            return self.close(frame);
        }
        if element_type == 0 {
            return Err(ErrorCode::LengthMismatch);
        }
        let key = self.cstring(frame.end)?;
        match frame.container {
            Container::Document => {
                let key = std::str::from_utf8(key).map_err(|_| ErrorCode::InvalidUtf8)?;
                self.state = State::Value(element_type);
                Ok(Event::Key(key))
            }
            // array keys are positional and carry nothing
            Container::Array => self.value(element_type),
        }
    }

    fn value(&mut self, element_type: u8) -> Result<Event<'a>, ErrorCode> {
        let none = SemanticTag::None;
        let event = match element_type {
            element::DOUBLE => Event::Double(self.bytes(8)?.try_get_f64_le().map_err(eof)?, none),
            element::STRING => Event::String(self.string()?, none),
            element::DOCUMENT => self.open_child(Container::Document)?,
            element::ARRAY => self.open_child(Container::Array)?,
            element::BINARY => {
                let len = self.length_prefix()?;
                // subtype
                self.bytes(1)?;
                Event::ByteString(self.bytes(len)?, none)
            }
            element::BOOL => Event::Bool(self.bytes(1)?.try_get_u8().map_err(eof)? != 0, none),
            element::DATETIME => Event::Int64(
                self.bytes(8)?.try_get_i64_le().map_err(eof)?,
                SemanticTag::EpochMilli,
            ),
            element::NULL => Event::Null(none),
            element::INT32 => Event::Int64(
                i64::from(self.bytes(4)?.try_get_i32_le().map_err(eof)?),
                none,
            ),
            element::TIMESTAMP => {
                Event::UInt64(self.bytes(8)?.try_get_u64_le().map_err(eof)?, none)
            }
            element::INT64 => Event::Int64(self.bytes(8)?.try_get_i64_le().map_err(eof)?, none),
            other => return Err(ErrorCode::UnknownElementType(other)),
        };
        Ok(event)
    }

    fn open_child(&mut self, container: Container) -> Result<Event<'a>, ErrorCode> {
        let end = self.container_len()?;
        if end >= self.limit() {
            return Err(ErrorCode::LengthMismatch);
        }
        self.push(Frame { end, container })?;
        let tag = SemanticTag::None;
        Ok(match container {
            Container::Document => Event::BeginObject { len: None, tag },
            Container::Array => Event::BeginArray { len: None, tag },
        })
    }

    fn close(&mut self, frame: Frame) -> Result<Event<'a>, ErrorCode> {
        self.frames.pop();
        trace!(
            target: "tagstream::bson",
            depth = self.frames.len(),
            offset = frame.end,
            "container closed"
        );
        if self.frames.is_empty() {
            self.state = State::Done;
            if self.buf.has_remaining() {
                return Err(ErrorCode::TrailingData);
            }
        }
        Ok(match frame.container {
            Container::Document => Event::EndObject,
            Container::Array => Event::EndArray,
        })
    }

    fn push(&mut self, frame: Frame) -> Result<(), ErrorCode> {
        if self.frames.len() >= self.max_depth {
            warn!(
                target: "tagstream::bson",
                max_nesting_depth = self.max_depth,
                offset = self.event_start,
                "nesting depth limit exceeded"
            );
            return Err(ErrorCode::MaxNestingDepthExceeded);
        }
        self.frames.push(frame);
        trace!(
            target: "tagstream::bson",
            depth = self.frames.len(),
            container = ?frame.container,
            end = frame.end,
            "container opened"
        );
        Ok(())
    }

    /// Read a document or array length prefix and return the offset of the
    /// container's terminator.
    fn container_len(&mut self) -> Result<usize, ErrorCode> {
        let start = self.offset();
        let len = self.bytes(4)?.try_get_i32_le().map_err(eof)?;
        match usize::try_from(len) {
            Ok(len) if len >= MIN_DOCUMENT_LEN => Ok(start + len - 1),
            _ => Err(ErrorCode::InvalidLength),
        }
    }

    fn length_prefix(&mut self) -> Result<usize, ErrorCode> {
        let len = self.bytes(4)?.try_get_i32_le().map_err(eof)?;
        usize::try_from(len).map_err(|_| ErrorCode::InvalidLength)
    }

    fn string(&mut self) -> Result<&'a str, ErrorCode> {
        let len = self.length_prefix()?;
        if len == 0 {
            return Err(ErrorCode::InvalidLength);
        }
        let bytes = self.bytes(len)?;
        let (text, terminator) = bytes.split_at(len - 1);
        if terminator != [0] {
            return Err(ErrorCode::MissingTerminator);
        }
        std::str::from_utf8(text).map_err(|_| ErrorCode::InvalidUtf8)
    }

    /// Zero-terminated string ending before `limit`; returns it without the
    /// terminator.
    fn cstring(&mut self, limit: usize) -> Result<&'a [u8], ErrorCode> {
        let buf = self.buf;
        let window = limit.saturating_sub(self.offset()).min(buf.len());
        let nul = memchr::memchr(0, &buf[..window]).ok_or(ErrorCode::MissingTerminator)?;
        self.buf = &buf[nul + 1..];
        Ok(&buf[..nul])
    }

    /// Where the innermost open container's content ends.
    fn limit(&self) -> usize {
        self.frames
            .last()
            .map_or(self.input.len(), |frame| frame.end)
    }

    /// Take `n` bytes that must lie within the innermost open container.
    fn bytes(&mut self, n: usize) -> Result<&'a [u8], ErrorCode> {
        if self.buf.remaining() < n {
            return Err(ErrorCode::UnexpectedEof);
        }
        if self.offset() + n > self.limit() {
            return Err(ErrorCode::LengthMismatch);
        }
        let (head, tail) = self.buf.split_at(n);
        self.buf = tail;
        Ok(head)
    }
}
