pub mod event_publish;
pub mod geometry;
pub mod gesture_classifier;
pub mod gesture_pipeline;
pub mod managers;
pub mod pinch_detector;
pub mod pointer_extractor;
pub mod scroll_detector;

pub use event_publish::EventPublishingService;
pub use gesture_classifier::{classify, classify_fingers, finger_states};
pub use gesture_pipeline::GesturePipeline;
pub use managers::{GestureStabilizer, StabilizerPolicy, StabilizerState};
pub use scroll_detector::ScrollTrackerState;
