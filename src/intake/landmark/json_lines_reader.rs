use crate::{
    error::AppError,
    intake::landmark::reader::LandmarkReader,
    pipeline::types::{HandObservation, Landmark, LandmarkFrame},
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Lines};
use tracing::{debug, trace, warn};

#[derive(Deserialize, Debug)]
struct HandMessage {
    #[serde(default)]
    handedness: Option<String>,
    #[serde(default)]
    score: Option<f64>,
    #[serde(default)]
    landmarks: Vec<Value>,
}

#[derive(Deserialize, Debug)]
struct DetectionMessage {
    #[serde(default)]
    hands: Vec<Value>,
    #[serde(default)]
    error: Option<String>,
}

/// Reads one JSON detection result per line:
///
/// `{"hands":[{"handedness":"Right","score":0.93,"landmarks":[{"x":..,"y":..,"z":..}, ...]}]}`
pub struct JsonLinesLandmarkReader<T>
where
    T: AsyncRead + Unpin + Send,
{
    lines: Lines<BufReader<T>>,
    frames_read: u64,
}

impl<T: AsyncRead + Unpin + Send> JsonLinesLandmarkReader<T> {
    pub fn new(stream: T) -> Self {
        Self::from_lines(BufReader::new(stream).lines())
    }

    pub fn from_lines(lines: Lines<BufReader<T>>) -> Self {
        Self {
            lines,
            frames_read: 0,
        }
    }

    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }
}

#[async_trait]
impl<T: AsyncRead + Unpin + Send> LandmarkReader for JsonLinesLandmarkReader<T> {
    async fn read(&mut self) -> Result<Option<LandmarkFrame>, AppError> {
        while let Some(line) = self.lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            self.frames_read += 1;
            return parse_detection(line).map(Some);
        }
        debug!("Landmark stream ended after {} frames", self.frames_read);
        Ok(None)
    }
}

/// Decodes one detector line. Only the first reported hand is kept.
///
/// A line that is not a detection message is an error. A hand whose fields
/// do not decode becomes an empty observation, which the pipeline reports
/// as `waiting` without a position.
pub fn parse_detection(line: &str) -> Result<LandmarkFrame, AppError> {
    let message: DetectionMessage = serde_json::from_str(line)?;

    if let Some(error) = message.error {
        warn!("Detector reported an error: {}", error);
        return Ok(LandmarkFrame::empty());
    }

    if message.hands.len() > 1 {
        debug!(
            "Detector reported {} hands, tracking the first",
            message.hands.len()
        );
    }

    let observation = message.hands.into_iter().next().map(decode_hand);
    Ok(LandmarkFrame::new(observation))
}

fn decode_hand(value: Value) -> HandObservation {
    let hand: HandMessage = match serde_json::from_value(value) {
        Ok(hand) => hand,
        Err(e) => {
            warn!("Dropping malformed hand: {}", e);
            return HandObservation::default();
        }
    };
    trace!(
        "Hand detected: {:?} score={:?} landmarks={}",
        hand.handedness,
        hand.score,
        hand.landmarks.len()
    );

    let points = hand
        .landmarks
        .into_iter()
        .map(serde_json::from_value::<Landmark>)
        .collect::<Result<Vec<_>, _>>();
    let mut observation = match points {
        Ok(points) => HandObservation::new(points),
        Err(e) => {
            warn!("Dropping hand with malformed landmark: {}", e);
            HandObservation::default()
        }
    };
    observation.handedness = hand.handedness;
    observation.score = hand.score;
    observation
}
