//! Errors reported by a [`Session`](crate::Session).
use std::io;

use thiserror::Error;

use crate::params::Tunable;

/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while driving a session.
///
/// A failed call never invalidates the session: the same session can be used
/// again right away.
#[derive(Debug, Error)]
pub enum Error {
    /// zstd could not allocate a context.
    #[error("failed to allocate {0}")]
    Initialization(&'static str),

    /// A parameter value was rejected, either by the parameter set or by the
    /// compression context.
    #[error("cannot set {tunable:?} to {value}: {reason}")]
    Configuration {
        /// The tunable being written.
        tunable: Tunable,
        /// The rejected value.
        value: i32,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// The destination cannot hold the worst case output.
    #[error("destination buffer too small: need {required} bytes, got {provided}")]
    BufferTooSmall {
        /// Bytes required.
        required: usize,
        /// Bytes available.
        provided: usize,
    },

    /// The decompressed size could not be read from the frame header.
    #[error("cannot determine decompressed size: {0}")]
    FrameInspection(&'static str),

    /// zstd itself reported a failure.
    #[error("{operation} failed: {reason}")]
    Engine {
        /// Name of the zstd entry point that failed.
        operation: &'static str,
        /// zstd's description of the error code.
        reason: &'static str,
    },

    /// A byte length does not map onto whole elements of the requested type.
    #[error("{len} bytes is not a whole number of {width}-byte elements")]
    ElementSize {
        /// Length in bytes.
        len: usize,
        /// Width of one element.
        width: usize,
    },

    /// The input ended before the frame was complete.
    #[error("incomplete frame")]
    IncompleteFrame,

    /// The output buffer could not be allocated.
    #[error("allocation failed: could not allocate {requested_bytes} bytes")]
    Allocation {
        /// Bytes requested.
        requested_bytes: usize,
    },
}

impl Error {
    /// Builds the closure used with `map_err` around zstd calls.
    pub(crate) fn engine(
        operation: &'static str,
    ) -> impl Fn(zstd_safe::ErrorCode) -> Error {
        move |code| Error::Engine {
            operation,
            reason: zstd_safe::get_error_name(code),
        }
    }
}

impl From<Error> for io::Error {
    fn from(error: Error) -> Self {
        let kind = match error {
            Error::Initialization(_) | Error::Allocation { .. } => {
                io::ErrorKind::OutOfMemory
            }
            Error::Configuration { .. }
            | Error::BufferTooSmall { .. }
            | Error::ElementSize { .. } => io::ErrorKind::InvalidInput,
            Error::FrameInspection(_) | Error::Engine { .. } => {
                io::ErrorKind::InvalidData
            }
            Error::IncompleteFrame => io::ErrorKind::UnexpectedEof,
        };
        io::Error::new(kind, error)
    }
}
