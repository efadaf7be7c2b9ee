pub mod services;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use services::{EventPublishingService, GesturePipeline};
pub use types::{
    Gesture, GestureEvent, HandObservation, Landmark, LandmarkFrame, PointerState, ScrollDirection,
};
