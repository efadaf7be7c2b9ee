pub mod json_lines_reader;
pub mod reader;
pub mod subprocess;

pub use json_lines_reader::JsonLinesLandmarkReader;
pub use reader::LandmarkReader;
pub use subprocess::SubprocessLandmarkSource;

use crate::{config::SourceConfig, error::AppError};
use tracing::info;

/// Opens the configured detector, falling back to JSON lines on stdin.
pub async fn open_source(config: &SourceConfig) -> Result<Box<dyn LandmarkReader>, AppError> {
    if config.command.is_some() {
        let source = SubprocessLandmarkSource::spawn(config).await?;
        Ok(Box::new(source))
    } else {
        info!("Reading landmark frames from stdin");
        Ok(Box::new(JsonLinesLandmarkReader::new(tokio::io::stdin())))
    }
}
