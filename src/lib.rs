pub mod config;
pub mod coordinator;
pub mod error;
pub mod intake;
pub mod network;
pub mod pipeline;

pub use crate::config::Configuration;
pub use coordinator::{Coordinator, CoordinatorBuilder};
pub use error::AppError;
pub use pipeline::{Gesture, GestureEvent, GesturePipeline, HandObservation};
