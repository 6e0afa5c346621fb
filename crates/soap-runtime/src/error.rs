//! Invocation error taxonomy.
//!
//! Every failed invocation surfaces as exactly one of these. Nothing here is
//! retried automatically; retry policy belongs to the transport
//! implementation.

use thiserror::Error;

use soap_wire::{Fault, TransportError};

/// Result type alias for invocation paths.
pub type CallResult<T> = Result<T, CallError>;

#[derive(Debug, Error)]
pub enum CallError {
    /// The remote side signaled a structured fault.
    #[error("remote fault: {0}")]
    Fault(#[from] Fault),

    /// Transport-level failure: non-success response or I/O failure.
    #[error("transport failure: {0}")]
    Transport(TransportError),

    /// The transport response was structurally successful but its body could
    /// not be turned into the declared return type.
    #[error("failed to decode response body: {0}")]
    Decode(String),

    /// An argument did not match the declared parameter shape.
    #[error("invalid argument: {0}")]
    Arguments(String),

    /// No generated class exists for the interface.
    #[error("unknown interface `{0}`")]
    UnknownInterface(String),

    /// The interface chain declares no such method.
    #[error("unknown method: {0}")]
    UnknownMethod(String),

    /// The dispatch task could not run to completion.
    #[error("dispatch failed: {0}")]
    Dispatch(String),
}

impl From<TransportError> for CallError {
    fn from(err: TransportError) -> Self {
        match err {
            // A parse failure on a structurally successful response is
            // surfaced distinctly from transport errors.
            TransportError::Decode(message) => CallError::Decode(message),
            other => CallError::Transport(other),
        }
    }
}
