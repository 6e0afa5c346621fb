//! Scripted in-memory transport for tests.
//!
//! Replies are queued ahead of time; each dispatch consumes one. A `Hang`
//! reply keeps the call in flight forever so cancellation behavior can be
//! observed.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::envelope::{RequestEnvelope, ResponseEnvelope};
use crate::transport::{CallCompletion, PendingCall, Transport, TransportError};

/// One scripted outcome for a dispatched call.
pub enum ScriptedReply {
    Respond(ResponseEnvelope),
    Fail(TransportError),
    /// Never complete; the completion sender is parked so the call stays in
    /// flight until the caller cancels.
    Hang,
}

#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<ScriptedReply>>,
    requests: Mutex<Vec<RequestEnvelope>>,
    cancelled: Arc<AtomicUsize>,
    parked: Mutex<Vec<CallCompletion>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn enqueue(&self, reply: ScriptedReply) {
        self.replies.lock().push_back(reply);
    }

    pub fn enqueue_response(&self, envelope: ResponseEnvelope) {
        self.enqueue(ScriptedReply::Respond(envelope));
    }

    pub fn enqueue_failure(&self, error: TransportError) {
        self.enqueue(ScriptedReply::Fail(error));
    }

    pub fn enqueue_hang(&self) {
        self.enqueue(ScriptedReply::Hang);
    }

    /// Number of requests dispatched so far.
    pub fn dispatch_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Copy of the `index`-th dispatched request.
    pub fn request(&self, index: usize) -> Option<RequestEnvelope> {
        self.requests.lock().get(index).cloned()
    }

    /// Number of in-flight calls the caller has cancelled.
    pub fn cancelled_count(&self) -> usize {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl Transport for ScriptedTransport {
    fn dispatch(&self, request: RequestEnvelope) -> PendingCall {
        self.requests.lock().push(request);
        let reply = self
            .replies
            .lock()
            .pop_front()
            .unwrap_or(ScriptedReply::Fail(TransportError::Io(
                "no scripted reply queued".to_string(),
            )));

        let cancelled = Arc::clone(&self.cancelled);
        let (completion, pending) = PendingCall::with_cancel_hook(move || {
            cancelled.fetch_add(1, Ordering::SeqCst);
        });

        match reply {
            ScriptedReply::Respond(envelope) => completion.succeed(envelope),
            ScriptedReply::Fail(error) => completion.fail(error),
            ScriptedReply::Hang => self.parked.lock().push(completion),
        }
        pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bag::PropertyBag;

    #[tokio::test]
    async fn scripted_replies_are_consumed_in_order() {
        let transport = ScriptedTransport::new();
        transport.enqueue_response(ResponseEnvelope::bag(
            PropertyBag::new().with_unnamed(crate::bag::BagValue::text("first")),
        ));
        transport.enqueue_failure(TransportError::Status { status: 500 });

        let req =
            RequestEnvelope::new(crate::envelope::OperationName::new("urn:test", "IMachine_getName"));
        let first = transport.dispatch(req.clone()).join().await;
        assert!(first.is_ok());
        let second = transport.dispatch(req).join().await;
        assert_eq!(second, Err(TransportError::Status { status: 500 }));
        assert_eq!(transport.dispatch_count(), 2);
    }

    #[tokio::test]
    async fn hung_call_records_cancellation_when_dropped() {
        let transport = ScriptedTransport::new();
        transport.enqueue_hang();
        let req =
            RequestEnvelope::new(crate::envelope::OperationName::new("urn:test", "IMachine_getName"));
        let pending = transport.dispatch(req);
        assert_eq!(transport.cancelled_count(), 0);
        drop(pending);
        assert_eq!(transport.cancelled_count(), 1);
    }
}
