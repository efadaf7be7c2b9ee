use crate::pipeline::services::geometry::is_above;
use crate::pipeline::types::{HandObservation, ScrollDirection, landmarks};

/// Tracks the two-finger scroll pose between frames. Cleared whenever the
/// pose is not held.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrollTrackerState {
    last_scroll_y: Option<f64>,
}

impl ScrollTrackerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_scroll_y(&self) -> Option<f64> {
        self.last_scroll_y
    }

    pub fn reset(&mut self) {
        self.last_scroll_y = None;
    }

    pub fn update(
        &mut self,
        observation: &HandObservation,
        threshold: f64,
    ) -> Option<ScrollDirection> {
        let avg_y = two_finger_height(observation);
        self.track(avg_y, threshold)
    }

    /// Feeds the averaged fingertip height of this frame, `None` when the
    /// pose is not held.
    pub fn track(&mut self, avg_y: Option<f64>, threshold: f64) -> Option<ScrollDirection> {
        let Some(avg_y) = avg_y else {
            self.reset();
            return None;
        };

        let direction = match self.last_scroll_y {
            Some(last_y) if (avg_y - last_y).abs() > threshold => {
                if avg_y < last_y {
                    Some(ScrollDirection::Up)
                } else {
                    Some(ScrollDirection::Down)
                }
            }
            _ => None,
        };
        self.last_scroll_y = Some(avg_y);
        direction
    }
}

/// Mean height of the index and middle tips while both point up.
pub fn two_finger_height(observation: &HandObservation) -> Option<f64> {
    let index_tip = observation.get(landmarks::INDEX_FINGER_TIP)?;
    let index_pip = observation.get(landmarks::INDEX_FINGER_PIP)?;
    let middle_tip = observation.get(landmarks::MIDDLE_FINGER_TIP)?;
    let middle_pip = observation.get(landmarks::MIDDLE_FINGER_PIP)?;

    if is_above(index_tip, index_pip) && is_above(middle_tip, middle_pip) {
        Some((index_tip.y + middle_tip.y) / 2.0)
    } else {
        None
    }
}
