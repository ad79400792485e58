//! Error types for the visitor layer.

use std::fmt;

use crate::ser_context::SerContext;

/// Coarse classification of an [`ErrorCode`].
///
/// Cancellation is not a kind: it travels through the continuation signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The producer met an invalid byte sequence or grammar violation.
    MalformedInput,
    /// The input ended before the traversal was complete.
    PrematureEnd,
    /// A well-formed construct this layer or the consumer cannot represent.
    UnsupportedStructure,
    /// The visitor refused an event for reasons unrelated to input validity.
    ConsumerRejected,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MalformedInput => "malformed input",
            Self::PrematureEnd => "premature end of input",
            Self::UnsupportedStructure => "unsupported structure",
            Self::ConsumerRejected => "rejected by consumer",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by [`Visitor`](crate::Visitor) operations in place of the
/// continuation signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ErrorCode {
    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("invalid UTF-8 in string data")]
    InvalidUtf8,

    /// A length prefix is negative or smaller than the minimum encoding.
    #[error("invalid length prefix")]
    InvalidLength,

    /// A length prefix disagrees with where the content actually ends.
    #[error("length prefix does not match content")]
    LengthMismatch,

    #[error("missing terminator")]
    MissingTerminator,

    #[error("maximum nesting depth exceeded")]
    MaxNestingDepthExceeded,

    #[error("unexpected data after the root value")]
    TrailingData,

    #[error("unknown element type 0x{0:02x}")]
    UnknownElementType(u8),

    #[error("unsupported typed array element type")]
    UnsupportedTypedArray,

    #[error("multi-dimensional arrays are not supported here")]
    UnsupportedMultiDim,

    #[error("value rejected by consumer")]
    Rejected,

    #[error("value out of range")]
    OutOfRange,

    /// The event is not valid in the consumer's current state.
    #[error("unexpected event")]
    UnexpectedEvent,

    #[error("object member without a preceding key")]
    MissingKey,

    /// An end event does not close the innermost open container.
    #[error("end event does not match the open container")]
    UnbalancedEnd,
}

impl ErrorCode {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnexpectedEof => ErrorKind::PrematureEnd,
            Self::InvalidUtf8
            | Self::InvalidLength
            | Self::LengthMismatch
            | Self::MissingTerminator
            | Self::TrailingData => ErrorKind::MalformedInput,
            Self::MaxNestingDepthExceeded
            | Self::UnknownElementType(_)
            | Self::UnsupportedTypedArray
            | Self::UnsupportedMultiDim => ErrorKind::UnsupportedStructure,
            Self::Rejected
            | Self::OutOfRange
            | Self::UnexpectedEvent
            | Self::MissingKey
            | Self::UnbalancedEnd => ErrorKind::ConsumerRejected,
        }
    }
}

/// An [`ErrorCode`] bound to the source position active when it was raised.
///
/// Produced by the positional operations of
/// [`VisitorExt`](crate::VisitorExt) and by format readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{code} at line {line}, column {column}")]
pub struct SerError {
    code: ErrorCode,
    line: usize,
    column: usize,
}

impl SerError {
    pub fn new(code: ErrorCode, context: &SerContext) -> Self {
        Self {
            code,
            line: context.line(),
            column: context.column(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn kind(&self) -> ErrorKind {
        self.code.kind()
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }
}

/// Returned by the `try_*` accessors of [`Value`](crate::Value) when the
/// variant does not match.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("type mismatch: expected {expected}, found {actual}")]
pub struct ValueTypeError {
    expected: String,
    actual: &'static str,
}

impl ValueTypeError {
    pub fn new(expected: impl Into<String>, actual: &'static str) -> Self {
        Self {
            expected: expected.into(),
            actual,
        }
    }

    pub fn expected(&self) -> &str {
        &self.expected
    }

    pub fn actual(&self) -> &'static str {
        self.actual
    }
}
