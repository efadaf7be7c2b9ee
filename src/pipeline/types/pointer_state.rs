use serde::{Deserialize, Serialize};

/// Index fingertip position for cursor control. `web_x` mirrors `x` for a
/// horizontally flipped camera preview.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerState {
    pub x: f64,
    pub web_x: f64,
    pub y: f64,
    pub is_clicking: bool,
}

impl PointerState {
    pub fn new(x: f64, y: f64, is_clicking: bool) -> Self {
        Self {
            x,
            web_x: 1.0 - x,
            y,
            is_clicking,
        }
    }
}
