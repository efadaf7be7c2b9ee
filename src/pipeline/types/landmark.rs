use serde::{Deserialize, Serialize};

/// MediaPipe hand landmark indices.
pub mod landmarks {
    pub const WRIST: usize = 0;
    pub const THUMB_CMC: usize = 1;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_FINGER_MCP: usize = 5;
    pub const INDEX_FINGER_PIP: usize = 6;
    pub const INDEX_FINGER_DIP: usize = 7;
    pub const INDEX_FINGER_TIP: usize = 8;
    pub const MIDDLE_FINGER_MCP: usize = 9;
    pub const MIDDLE_FINGER_PIP: usize = 10;
    pub const MIDDLE_FINGER_DIP: usize = 11;
    pub const MIDDLE_FINGER_TIP: usize = 12;
    pub const RING_FINGER_MCP: usize = 13;
    pub const RING_FINGER_PIP: usize = 14;
    pub const RING_FINGER_DIP: usize = 15;
    pub const RING_FINGER_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_DIP: usize = 19;
    pub const PINKY_TIP: usize = 20;

    pub const COUNT: usize = 21;
}

/// A normalized image-space point. `x` and `y` are in [0, 1] with the
/// origin at the top-left corner, `z` is depth relative to the wrist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// The landmark set of one tracked hand for one frame.
///
/// Points are kept exactly as the detector reported them. A set that does
/// not carry all 21 points is still a valid value; consumers look points up
/// with [`HandObservation::get`] and fall back when an index is missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HandObservation {
    landmarks: Vec<Landmark>,
    pub handedness: Option<String>,
    pub score: Option<f64>,
}

impl HandObservation {
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self {
            landmarks,
            handedness: None,
            score: None,
        }
    }

    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.landmarks.get(index)
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.landmarks.len() == landmarks::COUNT
    }

    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }
}
