//! Transport contract.
//!
//! The transport is an opaque, externally owned, thread-safe collaborator.
//! Dispatching a request is a non-blocking enqueue returning a
//! [`PendingCall`]: a single-fire completion channel plus a cancellation
//! hook. Dropping a pending call before completion cancels the in-flight
//! network call; after completion the hook is disarmed. Retry policy is
//! deliberately left to the transport implementation; nothing here retries.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::oneshot;

use crate::envelope::{RequestEnvelope, ResponseEnvelope};

/// Structured fault signaled by the remote side inside a structurally
/// successful response.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("remote fault {code}: {reason}")]
pub struct Fault {
    pub code: String,
    pub reason: String,
}

impl Fault {
    pub fn new(code: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            reason: reason.into(),
        }
    }
}

/// Errors produced by the transport itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Non-success transport response.
    #[error("transport returned non-success status {status}")]
    Status { status: u16 },

    /// I/O failure while issuing the call.
    #[error("transport I/O failure: {0}")]
    Io(String),

    /// The response arrived but its envelope could not be decoded.
    #[error("failed to decode response envelope: {0}")]
    Decode(String),

    /// The transport dropped the call without delivering a completion.
    #[error("transport abandoned the call without completing it")]
    Abandoned,
}

type CompletionResult = Result<ResponseEnvelope, TransportError>;

/// Sending half of a pending call. Completing consumes it, so a completion
/// can be delivered at most once.
pub struct CallCompletion {
    sender: oneshot::Sender<CompletionResult>,
}

impl CallCompletion {
    /// Deliver a decoded response envelope.
    pub fn succeed(self, envelope: ResponseEnvelope) {
        let _ = self.sender.send(Ok(envelope));
    }

    /// Deliver a transport failure.
    pub fn fail(self, error: TransportError) {
        let _ = self.sender.send(Err(error));
    }

    /// Whether the caller has already abandoned the call.
    pub fn is_abandoned(&self) -> bool {
        self.sender.is_closed()
    }
}

type CancelHook = Box<dyn FnOnce() + Send + 'static>;

/// Handle to one in-flight network call.
pub struct PendingCall {
    completion: oneshot::Receiver<CompletionResult>,
    cancel: Option<CancelHook>,
}

impl PendingCall {
    /// Create a pending call with no cancellation hook.
    pub fn channel() -> (CallCompletion, PendingCall) {
        let (sender, receiver) = oneshot::channel();
        (
            CallCompletion { sender },
            PendingCall {
                completion: receiver,
                cancel: None,
            },
        )
    }

    /// Create a pending call whose hook is invoked if the call is abandoned
    /// before a completion arrives.
    pub fn with_cancel_hook(
        hook: impl FnOnce() + Send + 'static,
    ) -> (CallCompletion, PendingCall) {
        let (completion, mut pending) = Self::channel();
        pending.cancel = Some(Box::new(hook));
        (completion, pending)
    }

    /// Await the completion. The cancellation hook is disarmed on any
    /// delivered outcome; it only fires when this future (or the pending
    /// call itself) is dropped while the call is still in flight.
    pub async fn join(mut self) -> CompletionResult {
        let outcome = (&mut self.completion).await;
        self.cancel = None;
        match outcome {
            Ok(result) => result,
            Err(_closed) => Err(TransportError::Abandoned),
        }
    }
}

impl Drop for PendingCall {
    fn drop(&mut self) {
        if let Some(hook) = self.cancel.take() {
            tracing::trace!("cancelling in-flight call");
            hook();
        }
    }
}

impl fmt::Debug for PendingCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingCall")
            .field("cancellable", &self.cancel.is_some())
            .finish()
    }
}

/// The externally owned network client. Implementations own connection and
/// socket lifecycle; callers only copy the handle's identity.
pub trait Transport: Send + Sync {
    /// Enqueue a request. Must not block on network I/O.
    fn dispatch(&self, request: RequestEnvelope) -> PendingCall;
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::bag::PropertyBag;

    #[tokio::test]
    async fn completion_is_single_fire() {
        let (completion, pending) = PendingCall::channel();
        completion.succeed(ResponseEnvelope::bag(PropertyBag::new()));
        // The sender is consumed by succeed(); only one outcome can arrive.
        let outcome = pending.join().await.unwrap();
        assert_eq!(outcome, ResponseEnvelope::bag(PropertyBag::new()));
    }

    #[tokio::test]
    async fn dropped_sender_surfaces_as_abandoned() {
        let (completion, pending) = PendingCall::channel();
        drop(completion);
        assert_eq!(pending.join().await, Err(TransportError::Abandoned));
    }

    #[tokio::test]
    async fn cancel_hook_fires_on_abandonment_only() {
        let fired = Arc::new(AtomicUsize::new(0));

        // Abandoned before completion: hook fires once.
        let counter = fired.clone();
        let (_completion, pending) =
            PendingCall::with_cancel_hook(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        drop(pending);
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        // Completed normally: hook never fires.
        let counter = fired.clone();
        let (completion, pending) = PendingCall::with_cancel_hook(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        completion.fail(TransportError::Io("reset".into()));
        let _ = pending.join().await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}
