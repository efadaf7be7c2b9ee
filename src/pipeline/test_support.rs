use crate::pipeline::types::{HandObservation, Landmark, landmarks};

const FINGER_BASES: [(usize, f64); 4] = [
    (landmarks::INDEX_FINGER_MCP, 0.45),
    (landmarks::MIDDLE_FINGER_MCP, 0.50),
    (landmarks::RING_FINGER_MCP, 0.55),
    (landmarks::PINKY_MCP, 0.60),
];

/// Upright synthetic hand. `extended` is thumb, index, middle, ring, pinky.
pub fn hand_points(extended: [bool; 5]) -> Vec<Landmark> {
    let mut points = vec![Landmark::default(); landmarks::COUNT];
    points[landmarks::WRIST] = Landmark::new(0.5, 0.9, 0.0);

    points[landmarks::THUMB_CMC] = Landmark::new(0.42, 0.8, 0.0);
    points[landmarks::THUMB_MCP] = Landmark::new(0.40, 0.70, 0.0);
    points[landmarks::THUMB_IP] = Landmark::new(0.35, 0.65, 0.0);
    points[landmarks::THUMB_TIP] = if extended[0] {
        Landmark::new(0.25, 0.55, 0.0)
    } else {
        Landmark::new(0.37, 0.66, 0.0)
    };

    for (finger, (mcp, x)) in FINGER_BASES.iter().enumerate() {
        points[*mcp] = Landmark::new(*x, 0.6, 0.0);
        points[mcp + 1] = Landmark::new(*x, 0.5, 0.0);
        if extended[finger + 1] {
            points[mcp + 2] = Landmark::new(*x, 0.45, 0.0);
            points[mcp + 3] = Landmark::new(*x, 0.4, 0.0);
        } else {
            points[mcp + 2] = Landmark::new(*x, 0.55, 0.0);
            points[mcp + 3] = Landmark::new(*x, 0.58, 0.0);
        }
    }
    points
}

pub fn hand(extended: [bool; 5]) -> HandObservation {
    HandObservation::new(hand_points(extended))
}

pub fn rock() -> HandObservation {
    hand([false; 5])
}

pub fn paper() -> HandObservation {
    hand([true; 5])
}

pub fn scissors() -> HandObservation {
    hand([false, true, true, false, false])
}
