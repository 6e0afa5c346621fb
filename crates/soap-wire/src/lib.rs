//! Wire layer for soap-proxygen.
//!
//! This crate defines the structured messages exchanged with the transport
//! and the transport contract itself. The concrete network client (sockets,
//! HTTP, XML encoding) is an external collaborator; it implements
//! [`Transport`] and owns connection lifecycle.
//!
//! - [`bag`]: the generic order- and name-addressable property bag, plus the
//!   wire's canonical empty sentinel
//! - [`envelope`]: request/response envelopes and wire properties
//! - [`transport`]: the [`Transport`] trait, pending-call handle with cancel
//!   hook, faults and transport errors
//! - [`encoding`]: base64 helpers for byte-buffer wire text
//! - [`testing`]: scripted in-memory transport for tests

pub mod bag;
pub mod encoding;
pub mod envelope;
pub mod testing;
pub mod transport;

// Re-export main types for convenience
pub use bag::{BagEntry, BagValue, PropertyBag, EMPTY_SENTINEL};
pub use envelope::{
    OperationName, RequestEnvelope, ResponseBody, ResponseEnvelope, WireProperty, WireValue,
};
pub use transport::{CallCompletion, Fault, PendingCall, Transport, TransportError};
