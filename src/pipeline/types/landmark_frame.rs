use crate::pipeline::types::HandObservation;
use uuid::Uuid;

/// One detector result: zero or one tracked hand.
#[derive(Debug, Clone)]
pub struct LandmarkFrame {
    pub id: Uuid,
    pub observation: Option<HandObservation>,
}

impl LandmarkFrame {
    pub fn new(observation: Option<HandObservation>) -> Self {
        Self {
            id: Uuid::new_v4(),
            observation,
        }
    }

    pub fn empty() -> Self {
        Self::new(None)
    }
}
