use crate::{
    config::SourceConfig,
    error::AppError,
    intake::landmark::{json_lines_reader::JsonLinesLandmarkReader, reader::LandmarkReader},
    pipeline::types::LandmarkFrame,
};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    process::{Child, ChildStdout, Command},
};
use tracing::{error, info};

/// Runs the hand detector as a child process and streams its stdout.
///
/// The child owns the camera. It is killed when this source is dropped.
pub struct SubprocessLandmarkSource {
    child: Child,
    reader: JsonLinesLandmarkReader<ChildStdout>,
}

impl SubprocessLandmarkSource {
    pub async fn spawn(config: &SourceConfig) -> Result<Self, AppError> {
        let program = config
            .command
            .as_deref()
            .ok_or_else(|| AppError::Source("No detector command configured".to_string()))?;

        info!("Starting hand detector: {} {:?}", program, config.args);
        let mut child = Command::new(program)
            .args(&config.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| AppError::Source(format!("Failed to start {}: {}", program, e)))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| AppError::Source("Detector stdout unavailable".to_string()))?;
        let mut lines = BufReader::new(stdout).lines();

        match lines.next_line().await? {
            Some(line) if line.trim() == config.ready_line => {
                info!("Hand detector ready");
            }
            Some(line) => {
                return Err(AppError::Source(format!(
                    "Detector did not signal ready, got: {}",
                    line.trim()
                )));
            }
            None => {
                return Err(AppError::Source(
                    "Detector exited before signalling ready".to_string(),
                ));
            }
        }

        Ok(Self {
            child,
            reader: JsonLinesLandmarkReader::from_lines(lines),
        })
    }
}

#[async_trait]
impl LandmarkReader for SubprocessLandmarkSource {
    async fn read(&mut self) -> Result<Option<LandmarkFrame>, AppError> {
        if let Some(frame) = self.reader.read().await? {
            return Ok(Some(frame));
        }

        let status = self.child.wait().await?;
        if status.success() {
            info!("Hand detector finished");
            Ok(None)
        } else {
            error!("Hand detector exited with {}", status);
            Err(AppError::Source(format!("Detector exited with {}", status)))
        }
    }
}
