//! Error types for the decode entry points.

use std::fmt;

use tagstream_core::{ErrorKind, SerContext, SerError};

/// Errors produced by [`BsonDecoder`](crate::BsonDecoder) and the typed
/// [`Deserializer`](crate::Deserializer).
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Parse or consumer error at a source position.
    #[error(transparent)]
    Ser(#[from] SerError),

    /// A `Deserialize` implementation rejected the input (wrong type, missing
    /// field, ...).
    #[error("{message} at line {line}, column {column}")]
    Custom {
        message: String,
        line: usize,
        column: usize,
    },

    /// Message from `Deserialize` that has not been given a position yet.
    /// The deserializer turns it into [`Custom`](Self::Custom) before it
    /// reaches the caller.
    #[error("{0}")]
    Message(String),

    /// I/O error while reading a document from a stream.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DecodeError {
    /// Taxonomy of the failure; `None` for I/O errors.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Ser(err) => Some(err.kind()),
            Self::Custom { .. } | Self::Message(_) => Some(ErrorKind::ConsumerRejected),
            Self::Io(_) => None,
        }
    }

    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Ser(err) => Some(err.line()),
            Self::Custom { line, .. } => Some(*line),
            Self::Message(_) | Self::Io(_) => None,
        }
    }

    pub fn column(&self) -> Option<usize> {
        match self {
            Self::Ser(err) => Some(err.column()),
            Self::Custom { column, .. } => Some(*column),
            Self::Message(_) | Self::Io(_) => None,
        }
    }

    /// Attach `context` to an unpositioned message; other errors are returned
    /// unchanged.
    pub(crate) fn locate(self, context: &SerContext) -> Self {
        match self {
            Self::Message(message) => Self::Custom {
                message,
                line: context.line(),
                column: context.column(),
            },
            other => other,
        }
    }
}

impl serde::de::Error for DecodeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self::Message(msg.to_string())
    }
}
