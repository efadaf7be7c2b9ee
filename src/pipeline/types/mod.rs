mod gesture;
mod gesture_event;
mod landmark;
mod landmark_frame;
mod pointer_state;

pub use gesture::{Gesture, ScrollDirection};
pub use gesture_event::GestureEvent;
pub use landmark::{HandObservation, Landmark, landmarks};
pub use landmark_frame::LandmarkFrame;
pub use pointer_state::PointerState;
