use thiserror::Error;
use uuid::Uuid;

// Main Application Error Type

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to bind to {1}: {0}")]
    Bind(std::io::Error, String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Landmark source failed: {0}")]
    Source(String),
    #[error("Failed to decode landmark message: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("WebSocket handshake with {0} failed: {1}")]
    Handshake(std::net::SocketAddr, String),
    #[error("Failed to publish event: {0}")]
    Publish(String),
    #[error("Failed to send shutdown to subscriber: {0}")]
    SubscriberShutdown(Uuid),
    #[error("Subscriber supervisor unavailable: {0}")]
    Supervisor(String),
    #[error("Task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
