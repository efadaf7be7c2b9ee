use crate::pipeline::services::geometry::distance;
use crate::pipeline::types::{HandObservation, landmarks};

/// Thumb tip and index tip closer than `threshold` count as a click.
pub fn is_pinching(observation: &HandObservation, threshold: f64) -> bool {
    match (
        observation.get(landmarks::THUMB_TIP),
        observation.get(landmarks::INDEX_FINGER_TIP),
    ) {
        (Some(thumb_tip), Some(index_tip)) => distance(thumb_tip, index_tip) < threshold,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_PINCH_THRESHOLD;
    use crate::pipeline::test_support::hand_points;
    use crate::pipeline::types::Landmark;

    fn with_tips(thumb: Landmark, index: Landmark) -> HandObservation {
        let mut points = hand_points([true; 5]);
        points[landmarks::THUMB_TIP] = thumb;
        points[landmarks::INDEX_FINGER_TIP] = index;
        HandObservation::new(points)
    }

    #[test]
    fn test_pinch_below_threshold() {
        let observation = with_tips(Landmark::new(0.5, 0.5, 0.0), Landmark::new(0.53, 0.5, 0.3));
        assert!(is_pinching(&observation, DEFAULT_PINCH_THRESHOLD));
    }

    #[test]
    fn test_no_pinch_at_or_above_threshold() {
        let observation = with_tips(Landmark::new(0.5, 0.5, 0.0), Landmark::new(0.5, 0.56, 0.0));
        assert!(!is_pinching(&observation, DEFAULT_PINCH_THRESHOLD));
        let observation = with_tips(Landmark::new(0.0, 0.0, 0.0), Landmark::new(0.3, 0.4, 0.0));
        assert!(!is_pinching(&observation, 0.5));
    }

    #[test]
    fn test_threshold_compared_at_full_precision() {
        let observation = with_tips(
            Landmark::new(0.5, 0.5, 0.0),
            Landmark::new(0.5 + 0.0499999999, 0.5, 0.0),
        );
        assert!(is_pinching(&observation, DEFAULT_PINCH_THRESHOLD));
    }

    #[test]
    fn test_missing_tips_never_click() {
        let observation = HandObservation::new(vec![Landmark::default(); 5]);
        assert!(!is_pinching(&observation, 1.0));
    }
}
