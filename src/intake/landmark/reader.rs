use crate::{error::AppError, pipeline::types::LandmarkFrame};
use async_trait::async_trait;

/// Source of per-frame detector results.
#[async_trait]
pub trait LandmarkReader: Send {
    /// Next frame, or `None` once the detector has finished.
    async fn read(&mut self) -> Result<Option<LandmarkFrame>, AppError>;
}
