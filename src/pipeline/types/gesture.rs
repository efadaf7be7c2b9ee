use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gesture {
    Rock,
    Paper,
    Scissors,
    #[default]
    Waiting,
}

impl Gesture {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gesture::Rock => "rock",
            Gesture::Paper => "paper",
            Gesture::Scissors => "scissors",
            Gesture::Waiting => "waiting",
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    Up,
    Down,
}
