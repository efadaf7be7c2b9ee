use crate::{
    error::AppError,
    network::{subscriber::Subscriber, supervisor::SubscriberSupervisorHandle},
    pipeline::services::EventPublishingService,
};
use std::{net::SocketAddr, time::Duration};
use tokio::{
    net::{TcpListener, TcpStream},
    time::timeout,
};
use tokio_tungstenite::accept_async;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(5);

/// Accepts WebSocket consumers and attaches each one to the event stream.
pub struct Server {
    listener: TcpListener,
    supervisor: SubscriberSupervisorHandle,
    publisher: EventPublishingService,
}

impl Server {
    pub async fn bind(
        address: &str,
        supervisor: SubscriberSupervisorHandle,
        publisher: EventPublishingService,
    ) -> Result<Self, AppError> {
        let listener = TcpListener::bind(address)
            .await
            .map_err(|e| AppError::Bind(e, address.to_string()))?;
        info!("Event server listening on {}", listener.local_addr()?);
        Ok(Self {
            listener,
            supervisor,
            publisher,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, AppError> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept loop. On cancellation, or when a consumer cannot be
    /// registered, every open connection is closed before this returns.
    pub async fn run(self, cancel_token: CancellationToken) -> Result<(), AppError> {
        let mut outcome = Ok(());
        loop {
            tokio::select! {
                _ = cancel_token.cancelled() => {
                    info!("Event server shutting down");
                    break;
                }
                result = self.listener.accept() => match result {
                    Ok((stream, peer)) => {
                        debug!("New consumer attempting to connect: {:?}", peer);
                        match self.handle_client(stream, peer).await {
                            Ok(id) => debug!("Consumer connected: {:?} for peer {:?}", id, peer),
                            Err(e @ AppError::Handshake(..)) => warn!("{}", e),
                            Err(e) => {
                                error!("Could not register consumer {:?}: {}", peer, e);
                                outcome = Err(e);
                                break;
                            }
                        }
                    }
                    Err(e) => {
                        error!("Error accepting connection: {:?}", e);
                    }
                },
            }
        }
        let shutdown = self.supervisor.shutdown().await;
        outcome.and(shutdown)
    }

    async fn handle_client(&self, stream: TcpStream, peer: SocketAddr) -> Result<Uuid, AppError> {
        if let Err(e) = stream.set_nodelay(true) {
            debug!("Could not disable Nagle for {:?}: {}", peer, e);
        }
        let socket = match timeout(HANDSHAKE_TIMEOUT, accept_async(stream)).await {
            Ok(Ok(socket)) => socket,
            Ok(Err(e)) => return Err(AppError::Handshake(peer, e.to_string())),
            Err(_) => return Err(AppError::Handshake(peer, "timed out".to_string())),
        };
        let (subscriber, handle) = Subscriber::new(socket, peer, self.publisher.subscribe());
        self.supervisor.add_subscriber(subscriber, handle).await
    }
}
