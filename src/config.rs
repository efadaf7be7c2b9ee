use crate::error::AppError;
use config::{Config, ConfigBuilder, Environment, File, builder::DefaultState};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "config/default";
pub const ENV_PREFIX: &str = "GESTURE";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8765;
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 16;
pub const DEFAULT_READY_LINE: &str = "READY";

/// Thumb/index tip distance below which the hand counts as clicking.
pub const DEFAULT_PINCH_THRESHOLD: f64 = 0.05;
/// Minimum vertical travel of the two-finger pose before a scroll is reported.
pub const DEFAULT_SCROLL_THRESHOLD: f64 = 0.01;
pub const DEFAULT_MAJORITY_FRACTION: f64 = 0.6;
pub const DEFAULT_COOLDOWN_MS: u64 = 500;
pub const DEFAULT_HISTORY_SIZE: usize = 3;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub server: ServerConfig,
    pub gesture: GestureConfig,
    pub source: SourceConfig,
    pub event_buffer_size: usize,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            gesture: GestureConfig::default(),
            source: SourceConfig::default(),
            event_buffer_size: DEFAULT_EVENT_BUFFER_SIZE,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Tuning knobs for the classifier, detectors and stabilizer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    pub pinch_threshold: f64,
    pub scroll_threshold: f64,
    pub majority_fraction: f64,
    pub cooldown_ms: u64,
    pub history_size: usize,
}

impl GestureConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    /// Number of matching history entries needed before a label is accepted.
    pub fn required_votes(&self) -> usize {
        let votes = (self.history_size as f64 * self.majority_fraction).ceil() as usize;
        votes.max(1)
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            pinch_threshold: DEFAULT_PINCH_THRESHOLD,
            scroll_threshold: DEFAULT_SCROLL_THRESHOLD,
            majority_fraction: DEFAULT_MAJORITY_FRACTION,
            cooldown_ms: DEFAULT_COOLDOWN_MS,
            history_size: DEFAULT_HISTORY_SIZE,
        }
    }
}

/// Where landmark observations come from. Without a command the detector
/// output is expected on stdin.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub command: Option<String>,
    pub args: Vec<String>,
    pub ready_line: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            command: None,
            args: Vec::new(),
            ready_line: DEFAULT_READY_LINE.to_string(),
        }
    }
}

impl Configuration {
    /// Loads defaults, then the optional config file, then `GESTURE__*`
    /// environment overrides.
    pub fn load(path: Option<&str>) -> Result<Self, AppError> {
        let builder = match path {
            Some(path) => Config::builder().add_source(File::with_name(path)),
            None => Config::builder()
                .add_source(File::with_name(DEFAULT_CONFIG_PATH).required(false)),
        };
        Self::from_builder(
            builder.add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            ),
        )
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, AppError> {
        let configuration: Configuration = builder.build()?.try_deserialize()?;
        configuration.validate()?;
        Ok(configuration)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let gesture = &self.gesture;
        if gesture.history_size == 0 {
            return Err(AppError::InvalidConfig(
                "Gesture history size must be greater than 0".to_string(),
            ));
        }

        if !(gesture.majority_fraction > 0.0 && gesture.majority_fraction <= 1.0) {
            return Err(AppError::InvalidConfig(
                "Majority fraction must be in (0.0, 1.0]".to_string(),
            ));
        }

        if gesture.pinch_threshold < 0.0 || gesture.scroll_threshold < 0.0 {
            return Err(AppError::InvalidConfig(
                "Pinch and scroll thresholds must not be negative".to_string(),
            ));
        }

        if self.event_buffer_size == 0 {
            return Err(AppError::InvalidConfig(
                "Event buffer size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
