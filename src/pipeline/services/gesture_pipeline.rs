use crate::config::GestureConfig;
use crate::pipeline::services::{
    gesture_classifier::classify,
    managers::{GestureStabilizer, StabilizerPolicy},
    pointer_extractor::pointer_state,
    scroll_detector::ScrollTrackerState,
};
use crate::pipeline::types::{Gesture, GestureEvent, HandObservation};
use std::time::Instant;
use tracing::{debug, trace};

/// Turns one detector result into the event published for that frame.
///
/// All temporal state lives here and is only touched by the task that owns
/// the pipeline. Tracking more than one hand would need one pipeline per
/// hand id.
pub struct GesturePipeline {
    config: GestureConfig,
    stabilizer: GestureStabilizer,
    scroll: ScrollTrackerState,
}

impl GesturePipeline {
    pub fn new(config: GestureConfig, now: Instant) -> Self {
        let policy = StabilizerPolicy::from(&config);
        Self {
            config,
            stabilizer: GestureStabilizer::new(policy, now),
            scroll: ScrollTrackerState::new(),
        }
    }

    pub fn process(&mut self, observation: Option<&HandObservation>, now: Instant) -> GestureEvent {
        let Some(observation) = observation else {
            self.scroll.reset();
            return GestureEvent::no_hand(self.stabilizer.current());
        };

        if !observation.is_complete() {
            debug!(
                "Incomplete hand with {} landmarks, reporting no position",
                observation.len()
            );
            self.scroll.reset();
            let gesture = self.stabilizer.update(Gesture::Waiting, now);
            return GestureEvent::no_hand(gesture);
        }

        let raw = classify(observation);
        let gesture = self.stabilizer.update(raw, now);
        let hand_position = pointer_state(observation, self.config.pinch_threshold);
        let scroll = self.scroll.update(observation, self.config.scroll_threshold);
        trace!(
            "Frame classified raw={} stable={} scroll={:?}",
            raw, gesture, scroll
        );

        GestureEvent {
            gesture,
            hand_position,
            scroll,
        }
    }

    pub fn stabilizer(&self) -> &GestureStabilizer {
        &self.stabilizer
    }

    pub fn scroll_tracker(&self) -> &ScrollTrackerState {
        &self.scroll
    }
}
