use crate::{
    error::AppError,
    network::subscriber::{Subscriber, SubscriberHandle},
};
use futures::future::join_all;
use indexmap::IndexMap;
use std::net::SocketAddr;
use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

const COMMAND_BUFFER_SIZE: usize = 100;

pub struct SubscriberEntry {
    pub handle: SubscriberHandle,
    pub task: JoinHandle<()>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberInfo {
    pub id: Uuid,
    pub peer: SocketAddr,
}

pub enum SupervisorCommand {
    AddSubscriber {
        subscriber: Subscriber,
        handle: SubscriberHandle,
        responder: oneshot::Sender<Uuid>,
    },
    RemoveSubscriber {
        id: Uuid,
    },
    ListSubscribers {
        responder: oneshot::Sender<Vec<SubscriberInfo>>,
    },
    Shutdown {
        responder: oneshot::Sender<()>,
    },
}

#[derive(Clone)]
pub struct SubscriberSupervisorHandle {
    command_tx: mpsc::Sender<SupervisorCommand>,
}

impl SubscriberSupervisorHandle {
    pub async fn add_subscriber(
        &self,
        subscriber: Subscriber,
        handle: SubscriberHandle,
    ) -> Result<Uuid, AppError> {
        let (responder, response_rx) = oneshot::channel();
        self.send(SupervisorCommand::AddSubscriber {
            subscriber,
            handle,
            responder,
        })
        .await?;
        response_rx.await.map_err(|_| supervisor_died())
    }

    pub async fn remove_subscriber(&self, id: Uuid) -> Result<(), AppError> {
        self.send(SupervisorCommand::RemoveSubscriber { id }).await
    }

    pub async fn list_subscribers(&self) -> Result<Vec<SubscriberInfo>, AppError> {
        let (responder, response_rx) = oneshot::channel();
        self.send(SupervisorCommand::ListSubscribers { responder })
            .await?;
        response_rx.await.map_err(|_| supervisor_died())
    }

    /// Stops every subscriber and waits until their sockets are closed.
    pub async fn shutdown(&self) -> Result<(), AppError> {
        let (responder, response_rx) = oneshot::channel();
        self.send(SupervisorCommand::Shutdown { responder }).await?;
        response_rx.await.map_err(|_| supervisor_died())
    }

    async fn send(&self, command: SupervisorCommand) -> Result<(), AppError> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| AppError::Supervisor("command channel closed".to_string()))
    }

    fn notify_removed(&self, id: Uuid) {
        if let Err(e) = self
            .command_tx
            .try_send(SupervisorCommand::RemoveSubscriber { id })
        {
            debug!("Could not report removal of {:?}: {}", id, e);
        }
    }
}

fn supervisor_died() -> AppError {
    AppError::Supervisor("supervisor task died".to_string())
}

/// Owns the set of connected consumers. Commands are processed one at a
/// time, so the set is never shared with another task.
pub struct SubscriberSupervisor {
    subscribers: IndexMap<Uuid, SubscriberEntry>,
    handle: SubscriberSupervisorHandle,
}

impl SubscriberSupervisor {
    pub fn spawn() -> (JoinHandle<()>, SubscriberSupervisorHandle) {
        let (command_tx, mut command_rx) = mpsc::channel(COMMAND_BUFFER_SIZE);
        let handle = SubscriberSupervisorHandle { command_tx };
        let mut supervisor = Self {
            subscribers: IndexMap::new(),
            handle: handle.clone(),
        };
        let task = tokio::spawn(async move {
            while let Some(command) = command_rx.recv().await {
                if !supervisor.handle_command(command).await {
                    break;
                }
            }
            debug!("Subscriber supervisor stopped");
        });
        (task, handle)
    }

    /// Returns `false` once the supervisor has shut down.
    async fn handle_command(&mut self, command: SupervisorCommand) -> bool {
        match command {
            SupervisorCommand::AddSubscriber {
                mut subscriber,
                handle,
                responder,
            } => {
                let id = handle.id;
                let supervisor = self.handle.clone();
                let task = tokio::spawn(async move {
                    // send failures are logged by the subscriber itself
                    let _ = subscriber.run().await;
                    supervisor.notify_removed(subscriber.id());
                });
                self.subscribers.insert(id, SubscriberEntry { handle, task });
                info!("{} subscriber(s) connected", self.subscribers.len());
                let _ = responder.send(id);
                true
            }
            SupervisorCommand::RemoveSubscriber { id } => {
                if let Some(entry) = self.subscribers.shift_remove(&id) {
                    let _ = entry.handle.send_shutdown();
                    info!(
                        "Subscriber {:?} ({}) removed, {} remaining",
                        id,
                        entry.handle.peer,
                        self.subscribers.len()
                    );
                }
                true
            }
            SupervisorCommand::ListSubscribers { responder } => {
                let subscribers = self
                    .subscribers
                    .values()
                    .map(|entry| SubscriberInfo {
                        id: entry.handle.id,
                        peer: entry.handle.peer,
                    })
                    .collect();
                let _ = responder.send(subscribers);
                true
            }
            SupervisorCommand::Shutdown { responder } => {
                info!("Closing {} subscriber(s)", self.subscribers.len());
                let mut tasks = Vec::with_capacity(self.subscribers.len());
                for (_, entry) in self.subscribers.drain(..) {
                    let _ = entry.handle.send_shutdown();
                    tasks.push(entry.task);
                }
                for result in join_all(tasks).await {
                    if let Err(e) = result {
                        warn!("Subscriber task failed during shutdown: {}", e);
                    }
                }
                let _ = responder.send(());
                false
            }
        }
    }
}
