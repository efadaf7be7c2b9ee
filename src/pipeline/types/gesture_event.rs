use crate::pipeline::types::{Gesture, PointerState, ScrollDirection};
use serde::{Deserialize, Serialize};

/// The per-frame message broadcast to every connected consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureEvent {
    pub gesture: Gesture,
    pub hand_position: Option<PointerState>,
    pub scroll: Option<ScrollDirection>,
}

impl GestureEvent {
    pub fn no_hand(gesture: Gesture) -> Self {
        Self {
            gesture,
            hand_position: None,
            scroll: None,
        }
    }
}
