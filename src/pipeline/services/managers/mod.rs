pub mod gesture_stabilizer;

pub use gesture_stabilizer::{GestureStabilizer, StabilizerPolicy, StabilizerState, stabilize};
