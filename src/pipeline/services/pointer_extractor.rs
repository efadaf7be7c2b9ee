use crate::pipeline::services::pinch_detector::is_pinching;
use crate::pipeline::types::{HandObservation, PointerState, landmarks};

/// Cursor position from the index fingertip, or `None` when the tip is
/// missing from the observation.
pub fn pointer_state(observation: &HandObservation, pinch_threshold: f64) -> Option<PointerState> {
    let index_tip = observation.get(landmarks::INDEX_FINGER_TIP)?;
    Some(PointerState::new(
        index_tip.x,
        index_tip.y,
        is_pinching(observation, pinch_threshold),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::test_support::hand_points;
    use crate::pipeline::types::Landmark;

    #[test]
    fn test_pointer_tracks_index_tip() {
        let mut points = hand_points([false, true, false, false, false]);
        points[landmarks::INDEX_FINGER_TIP] = Landmark::new(0.2, 0.3, 0.0);
        let pointer = pointer_state(&HandObservation::new(points), 0.05).unwrap();
        assert_eq!(pointer.x, 0.2);
        assert_eq!(pointer.y, 0.3);
        assert!(!pointer.is_clicking);
    }

    #[test]
    fn test_web_x_mirrors_x() {
        for step in 0..=100 {
            let x = step as f64 / 100.0;
            let mut points = hand_points([true; 5]);
            points[landmarks::INDEX_FINGER_TIP] = Landmark::new(x, 0.5, 0.0);
            let pointer = pointer_state(&HandObservation::new(points), 0.05).unwrap();
            assert_eq!(pointer.web_x, 1.0 - x);
        }
    }

    #[test]
    fn test_pointer_reports_click() {
        let mut points = hand_points([true; 5]);
        points[landmarks::THUMB_TIP] = Landmark::new(0.45, 0.41, 0.0);
        let pointer = pointer_state(&HandObservation::new(points), 0.05).unwrap();
        assert!(pointer.is_clicking);
    }

    #[test]
    fn test_missing_index_tip_has_no_pointer() {
        let observation = HandObservation::new(vec![Landmark::default(); 4]);
        assert_eq!(pointer_state(&observation, 0.05), None);
    }
}
