use crate::error::AppError;
use crate::pipeline::types::GestureEvent;
use futures::future::{Ready, ready};
use std::task::{Context, Poll};
use tokio::sync::broadcast;
use tower::Service;
use tracing::debug;

/// Hands events to the consumer side without ever waiting on it.
///
/// Backed by a bounded broadcast channel: a slow consumer that falls more
/// than `capacity` events behind skips the oldest ones (last events win)
/// while everyone else keeps publish order.
#[derive(Clone)]
pub struct EventPublishingService {
    event_tx: broadcast::Sender<GestureEvent>,
}

impl EventPublishingService {
    pub fn new(capacity: usize) -> Self {
        let (event_tx, _) = broadcast::channel(capacity);
        Self { event_tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<GestureEvent> {
        self.event_tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.event_tx.receiver_count()
    }
}

impl Service<GestureEvent> for EventPublishingService {
    /// Number of subscribers the event was queued for.
    type Response = usize;
    type Error = AppError;
    type Future = Ready<Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, event: GestureEvent) -> Self::Future {
        match self.event_tx.send(event) {
            Ok(delivered) => ready(Ok(delivered)),
            Err(_) => {
                debug!("No consumers connected, dropping event");
                ready(Ok(0))
            }
        }
    }
}
