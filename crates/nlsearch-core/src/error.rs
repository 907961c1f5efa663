// SPDX-FileCopyrightText: 2026 nlsearch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for nlsearch.

use std::time::Duration;

use thiserror::Error;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// The error type returned by every fallible nlsearch operation.
///
/// Each error is scoped to a single request; none of them are fatal to the
/// process.
#[derive(Debug, Error)]
pub enum NlsearchError {
    /// Invalid configuration or a client that could not be constructed from it.
    #[error("configuration error: {0}")]
    Config(String),

    /// The caller supplied input the operation cannot work with.
    #[error("{0}")]
    InvalidInput(String),

    /// Network or connection failure while talking to the upstream API.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<BoxedSource>,
    },

    /// The upstream API answered with a status outside the accepted set.
    /// The raw body is kept verbatim for diagnostics.
    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// The response body did not match the expected shape.
    #[error("decode error: {message}")]
    Decode {
        message: String,
        source: Option<BoxedSource>,
    },

    /// The upstream service marked the question as failed.
    #[error("question processing failed")]
    QuestionFailed,

    /// The upstream service marked the question as cancelled.
    #[error("question was cancelled")]
    QuestionCancelled,

    /// The local polling deadline elapsed before a terminal status was seen.
    #[error("timeout waiting for response after {duration:?}")]
    Timeout { duration: Duration },

    /// The caller's cancellation token fired.
    #[error("request cancelled by caller")]
    Cancelled,

    /// The HTTP listener could not be bound or stopped unexpectedly.
    #[error("server error: {message}")]
    Server {
        message: String,
        source: Option<BoxedSource>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl NlsearchError {
    /// Wraps a transport-level failure with call-site context.
    pub fn transport<E>(context: &str, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Transport {
            message: format!("{context}: {err}"),
            source: Some(Box::new(err)),
        }
    }

    /// Wraps a body decoding failure with call-site context.
    pub fn decode<E>(context: &str, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Decode {
            message: format!("{context}: {err}"),
            source: Some(Box::new(err)),
        }
    }

    /// True for the local deadline error.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// True when the caller's own cancellation signal ended the operation.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
