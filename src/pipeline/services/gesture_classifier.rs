use crate::pipeline::services::geometry::{is_extended, thumb_extended};
use crate::pipeline::types::{Gesture, HandObservation, landmarks};

/// Extension flags in thumb, index, middle, ring, pinky order.
pub type FingerStates = [bool; 5];

const FINGER_JOINTS: [(usize, usize, usize); 4] = [
    (
        landmarks::INDEX_FINGER_TIP,
        landmarks::INDEX_FINGER_PIP,
        landmarks::INDEX_FINGER_MCP,
    ),
    (
        landmarks::MIDDLE_FINGER_TIP,
        landmarks::MIDDLE_FINGER_PIP,
        landmarks::MIDDLE_FINGER_MCP,
    ),
    (
        landmarks::RING_FINGER_TIP,
        landmarks::RING_FINGER_PIP,
        landmarks::RING_FINGER_MCP,
    ),
    (landmarks::PINKY_TIP, landmarks::PINKY_PIP, landmarks::PINKY_MCP),
];

/// Per-finger extension flags, or `None` for an incomplete landmark set.
pub fn finger_states(observation: &HandObservation) -> Option<FingerStates> {
    if !observation.is_complete() {
        return None;
    }

    let mut states = [false; 5];
    states[0] = thumb_extended(
        observation.get(landmarks::THUMB_TIP)?,
        observation.get(landmarks::THUMB_IP)?,
        observation.get(landmarks::THUMB_MCP)?,
    );
    for (slot, (tip, pip, mcp)) in states[1..].iter_mut().zip(FINGER_JOINTS) {
        *slot = is_extended(
            observation.get(tip)?,
            observation.get(pip)?,
            observation.get(mcp)?,
        );
    }
    Some(states)
}

/// Maps extension flags to a shape. First matching rule wins.
pub fn classify_fingers(extended: &FingerStates) -> Gesture {
    let count = extended.iter().filter(|&&e| e).count();
    if count <= 1 {
        Gesture::Rock
    } else if count >= 4 {
        Gesture::Paper
    } else if extended[1] && extended[2] && !extended[3] && !extended[4] {
        Gesture::Scissors
    } else {
        Gesture::Waiting
    }
}

/// Stateless per-frame classification. Malformed observations classify as
/// [`Gesture::Waiting`] so a single bad frame cannot stall the stream.
pub fn classify(observation: &HandObservation) -> Gesture {
    match finger_states(observation) {
        Some(extended) => classify_fingers(&extended),
        None => {
            tracing::debug!(
                "Malformed observation with {} landmarks, classifying as waiting",
                observation.len()
            );
            Gesture::Waiting
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::test_support::{hand, hand_points, paper, rock, scissors};

    fn all_finger_states() -> impl Iterator<Item = FingerStates> {
        (0u8..32).map(|bits| {
            let mut states = [false; 5];
            for (i, slot) in states.iter_mut().enumerate() {
                *slot = bits & (1 << i) != 0;
            }
            states
        })
    }

    #[test]
    fn test_count_rules_cover_every_combination() {
        for states in all_finger_states() {
            let count = states.iter().filter(|&&e| e).count();
            let gesture = classify_fingers(&states);
            match count {
                0 | 1 => assert_eq!(gesture, Gesture::Rock, "{:?}", states),
                4 | 5 => assert_eq!(gesture, Gesture::Paper, "{:?}", states),
                _ => {
                    let is_scissors = states[1] && states[2] && !states[3] && !states[4];
                    let expected = if is_scissors {
                        Gesture::Scissors
                    } else {
                        Gesture::Waiting
                    };
                    assert_eq!(gesture, expected, "{:?}", states);
                }
            }
        }
    }

    #[test]
    fn test_scissors_ignores_thumb() {
        assert_eq!(
            classify_fingers(&[false, true, true, false, false]),
            Gesture::Scissors
        );
        assert_eq!(
            classify_fingers(&[true, true, true, false, false]),
            Gesture::Scissors
        );
        assert_eq!(
            classify_fingers(&[false, true, false, true, false]),
            Gesture::Waiting
        );
    }

    #[test]
    fn test_synthetic_hands_match_their_flags() {
        for states in all_finger_states() {
            assert_eq!(finger_states(&hand(states)), Some(states));
        }
    }

    #[test]
    fn test_classify_shapes() {
        assert_eq!(classify(&rock()), Gesture::Rock);
        assert_eq!(classify(&paper()), Gesture::Paper);
        assert_eq!(classify(&scissors()), Gesture::Scissors);
        assert_eq!(classify(&hand([false, true, false, false, true])), Gesture::Waiting);
    }

    #[test]
    fn test_malformed_observation_fails_closed() {
        let mut points = hand_points([true; 5]);
        points.truncate(12);
        assert_eq!(classify(&HandObservation::new(points)), Gesture::Waiting);
        assert_eq!(classify(&HandObservation::default()), Gesture::Waiting);

        let mut points = hand_points([true; 5]);
        points.push(points[0]);
        assert_eq!(classify(&HandObservation::new(points)), Gesture::Waiting);
    }
}
