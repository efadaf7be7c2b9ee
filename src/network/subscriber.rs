use crate::{error::AppError, pipeline::types::GestureEvent};
use futures::{
    SinkExt, StreamExt,
    stream::{SplitSink, SplitStream},
};
use std::{net::SocketAddr, time::Duration};
use tokio::{
    net::TcpStream,
    sync::broadcast::{self, Sender},
    time::timeout,
};
use tokio_stream::wrappers::{BroadcastStream, errors::BroadcastStreamRecvError};
use tokio_tungstenite::{WebSocketStream, tungstenite::Message};
use tracing::{debug, error, info, trace, warn};
use uuid::Uuid;

const SEND_TIMEOUT: Duration = Duration::from_secs(2);

pub type ConsumerSocket = WebSocketStream<TcpStream>;

/// One connected consumer. Every published event is sent as a single
/// JSON text message, in publish order.
pub struct Subscriber {
    id: Uuid,
    peer: SocketAddr,
    sink: SplitSink<ConsumerSocket, Message>,
    inbound: SplitStream<ConsumerSocket>,
    events: BroadcastStream<GestureEvent>,
    shutdown_rx: broadcast::Receiver<()>,
}

#[derive(Debug, Clone)]
pub struct SubscriberHandle {
    pub id: Uuid,
    pub peer: SocketAddr,
    shutdown_tx: Sender<()>,
}

impl SubscriberHandle {
    pub fn send_shutdown(&self) -> Result<(), AppError> {
        match self.shutdown_tx.send(()) {
            Ok(_) => Ok(()),
            Err(e) => {
                debug!(
                    "Subscriber {:?} already stopped: {:?}",
                    self.id,
                    e.to_string()
                );
                Err(AppError::SubscriberShutdown(self.id))
            }
        }
    }
}

impl Subscriber {
    pub fn new(
        socket: ConsumerSocket,
        peer: SocketAddr,
        events: broadcast::Receiver<GestureEvent>,
    ) -> (Self, SubscriberHandle) {
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let id = Uuid::new_v4();
        let (sink, inbound) = socket.split();
        (
            Self {
                id,
                peer,
                sink,
                inbound,
                events: BroadcastStream::new(events),
                shutdown_rx,
            },
            SubscriberHandle {
                id,
                peer,
                shutdown_tx,
            },
        )
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Forwards events until shutdown, disconnect or a failed send.
    pub async fn run(&mut self) -> Result<(), AppError> {
        info!("Subscriber {:?} connected from {}", self.id, self.peer);
        let result = loop {
            tokio::select! {
                biased;
                _ = self.shutdown_rx.recv() => {
                    debug!("Subscriber {:?} received shutdown", self.id);
                    break Ok(());
                }
                message = self.inbound.next() => match message {
                    Some(Ok(Message::Close(frame))) => {
                        info!("Subscriber {:?} closed the connection: {:?}", self.id, frame);
                        break Ok(());
                    }
                    Some(Ok(message)) => {
                        trace!("Ignoring {} inbound bytes from {:?}", message.len(), self.id)
                    }
                    Some(Err(e)) => {
                        warn!("Subscriber {:?} read failed: {}", self.id, e);
                        break Ok(());
                    }
                    None => {
                        info!("Subscriber {:?} disconnected", self.id);
                        break Ok(());
                    }
                },
                event = self.events.next() => match event {
                    Some(Ok(event)) => {
                        if let Err(e) = self.send(&event).await {
                            break Err(e);
                        }
                    }
                    Some(Err(BroadcastStreamRecvError::Lagged(skipped))) => {
                        warn!(
                            "Subscriber {:?} lagging, skipped {} stale events",
                            self.id, skipped
                        );
                    }
                    None => {
                        debug!("Event stream closed for {:?}", self.id);
                        break Ok(());
                    }
                },
            }
        };

        match timeout(SEND_TIMEOUT, self.sink.close()).await {
            Ok(Err(e)) => debug!("Subscriber {:?} socket already closed: {}", self.id, e),
            Err(_) => debug!("Subscriber {:?} close handshake timed out", self.id),
            Ok(Ok(())) => {}
        }
        if let Err(e) = &result {
            error!("Dropping subscriber {:?}: {}", self.id, e);
        }
        result
    }

    async fn send(&mut self, event: &GestureEvent) -> Result<(), AppError> {
        let payload = serde_json::to_string(event).map_err(|e| AppError::Publish(e.to_string()))?;
        match timeout(SEND_TIMEOUT, self.sink.send(Message::text(payload))).await {
            Ok(result) => result.map_err(|e| AppError::Publish(e.to_string())),
            Err(_) => Err(AppError::Publish(format!(
                "send timed out after {:?}",
                SEND_TIMEOUT
            ))),
        }
    }
}
