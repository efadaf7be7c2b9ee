use crate::config::GestureConfig;
use crate::pipeline::types::Gesture;
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Voting rules for the stabilizer, derived from [`GestureConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StabilizerPolicy {
    pub history_size: usize,
    pub required_votes: usize,
    pub cooldown: Duration,
}

impl From<&GestureConfig> for StabilizerPolicy {
    fn from(config: &GestureConfig) -> Self {
        Self {
            history_size: config.history_size.max(1),
            required_votes: config.required_votes(),
            cooldown: config.cooldown(),
        }
    }
}

impl Default for StabilizerPolicy {
    fn default() -> Self {
        Self::from(&GestureConfig::default())
    }
}

/// Debounce state for the raw gesture stream.
///
/// `last_transition_time` starts at construction, so the first cooldown
/// window is gated as well.
#[derive(Debug, Clone)]
pub struct StabilizerState {
    history: VecDeque<Gesture>,
    last_stable_gesture: Option<Gesture>,
    last_transition_time: Instant,
}

impl StabilizerState {
    pub fn new(now: Instant) -> Self {
        Self {
            history: VecDeque::new(),
            last_stable_gesture: None,
            last_transition_time: now,
        }
    }

    /// The gesture currently reported downstream.
    pub fn current(&self) -> Gesture {
        self.last_stable_gesture.unwrap_or(Gesture::Waiting)
    }

    pub fn last_stable_gesture(&self) -> Option<Gesture> {
        self.last_stable_gesture
    }

    pub fn last_transition_time(&self) -> Instant {
        self.last_transition_time
    }

    pub fn history(&self) -> Vec<Gesture> {
        self.history.iter().copied().collect()
    }

    fn is_cooling(&self, now: Instant, cooldown: Duration) -> bool {
        now.saturating_duration_since(self.last_transition_time) < cooldown
    }

    fn push(&mut self, raw: Gesture, capacity: usize) {
        if self.history.len() >= capacity {
            self.history.pop_front();
        }
        self.history.push_back(raw);
    }

    /// Most frequent label in the window. Ties resolve to the earliest entry.
    fn majority(&self) -> Option<(Gesture, usize)> {
        let mut best: Option<(Gesture, usize)> = None;
        for gesture in &self.history {
            let votes = self.history.iter().filter(|g| *g == gesture).count();
            if best.is_none_or(|(_, best_votes)| votes > best_votes) {
                best = Some((*gesture, votes));
            }
        }
        best
    }
}

/// Advances the stabilizer by one frame and returns the gesture to report.
///
/// While cooling down the raw label is dropped without touching the
/// history, so the window may still hold pre-cooldown labels when the gate
/// lifts.
pub fn stabilize(
    state: &mut StabilizerState,
    raw: Gesture,
    now: Instant,
    policy: &StabilizerPolicy,
) -> Gesture {
    if state.is_cooling(now, policy.cooldown) {
        return state.current();
    }

    state.push(raw, policy.history_size);
    if state.history.len() < policy.history_size {
        return state.current();
    }

    match state.majority() {
        Some((candidate, votes)) if votes >= policy.required_votes => {
            if state.last_stable_gesture != Some(candidate) {
                info!(
                    "Stable gesture changed: {} -> {} ({}/{} votes)",
                    state.current(),
                    candidate,
                    votes,
                    policy.history_size
                );
                state.last_stable_gesture = Some(candidate);
                state.last_transition_time = now;
            }
            candidate
        }
        _ => {
            debug!("No majority in {:?}", state.history);
            state.current()
        }
    }
}

/// Owns a [`StabilizerState`] together with its policy.
#[derive(Debug, Clone)]
pub struct GestureStabilizer {
    state: StabilizerState,
    policy: StabilizerPolicy,
}

impl GestureStabilizer {
    pub fn new(policy: StabilizerPolicy, now: Instant) -> Self {
        Self {
            state: StabilizerState::new(now),
            policy,
        }
    }

    pub fn update(&mut self, raw: Gesture, now: Instant) -> Gesture {
        stabilize(&mut self.state, raw, now, &self.policy)
    }

    pub fn current(&self) -> Gesture {
        self.state.current()
    }

    pub fn state(&self) -> &StabilizerState {
        &self.state
    }

    pub fn policy(&self) -> &StabilizerPolicy {
        &self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(33);

    fn after_cooldown(start: Instant) -> Instant {
        start + StabilizerPolicy::default().cooldown
    }

    fn feed(
        stabilizer: &mut GestureStabilizer,
        start: Instant,
        labels: &[Gesture],
    ) -> (Vec<Gesture>, Instant) {
        let mut now = start;
        let mut out = Vec::new();
        for label in labels {
            out.push(stabilizer.update(*label, now));
            now += FRAME;
        }
        (out, now)
    }

    #[test]
    fn test_initial_cooldown_reports_waiting() {
        let start = Instant::now();
        let mut stabilizer = GestureStabilizer::new(StabilizerPolicy::default(), start);
        let (out, _) = feed(&mut stabilizer, start, &[Gesture::Rock; 10]);
        assert!(out.iter().all(|g| *g == Gesture::Waiting));
        assert!(stabilizer.state().history().is_empty());
        assert_eq!(stabilizer.state().last_stable_gesture(), None);
    }

    #[test]
    fn test_majority_commits_after_full_window() {
        let start = Instant::now();
        let mut stabilizer = GestureStabilizer::new(StabilizerPolicy::default(), start);
        let (out, _) = feed(
            &mut stabilizer,
            after_cooldown(start),
            &[Gesture::Rock, Gesture::Rock, Gesture::Paper],
        );
        assert_eq!(out, vec![Gesture::Waiting, Gesture::Waiting, Gesture::Rock]);
        assert_eq!(stabilizer.state().last_stable_gesture(), Some(Gesture::Rock));
    }

    #[test]
    fn test_single_frame_spike_is_ignored() {
        let start = Instant::now();
        let mut stabilizer = GestureStabilizer::new(StabilizerPolicy::default(), start);
        let (out, _) = feed(
            &mut stabilizer,
            after_cooldown(start),
            &[Gesture::Rock, Gesture::Paper, Gesture::Rock],
        );
        assert_eq!(out[2], Gesture::Rock);

        // established rock, then a lone paper frame once the gate lifts
        let resume = stabilizer.state().last_transition_time() + Duration::from_secs(1);
        let (out, _) = feed(
            &mut stabilizer,
            resume,
            &[
                Gesture::Rock,
                Gesture::Rock,
                Gesture::Paper,
                Gesture::Rock,
                Gesture::Rock,
            ],
        );
        assert!(out.iter().all(|g| *g == Gesture::Rock));
        assert_eq!(stabilizer.state().last_stable_gesture(), Some(Gesture::Rock));
    }

    #[test]
    fn test_repeated_label_is_idempotent() {
        let start = Instant::now();
        let mut stabilizer = GestureStabilizer::new(StabilizerPolicy::default(), start);
        let (out, _) = feed(&mut stabilizer, after_cooldown(start), &[Gesture::Scissors; 200]);
        assert_eq!(out[2..].iter().filter(|g| **g != Gesture::Scissors).count(), 0);
        assert_eq!(
            stabilizer.state().last_stable_gesture(),
            Some(Gesture::Scissors)
        );
    }

    #[test]
    fn test_three_way_split_keeps_previous() {
        let start = Instant::now();
        let mut stabilizer = GestureStabilizer::new(StabilizerPolicy::default(), start);
        let (out, _) = feed(
            &mut stabilizer,
            after_cooldown(start),
            &[Gesture::Rock, Gesture::Paper, Gesture::Scissors],
        );
        assert_eq!(out[2], Gesture::Waiting);
        assert_eq!(stabilizer.state().last_stable_gesture(), None);
    }

    #[test]
    fn test_history_is_bounded() {
        let start = Instant::now();
        let mut stabilizer = GestureStabilizer::new(StabilizerPolicy::default(), start);
        let labels = [Gesture::Paper, Gesture::Rock, Gesture::Waiting, Gesture::Paper];
        let mut now = after_cooldown(start);
        for label in labels.iter().cycle().take(50) {
            stabilizer.update(*label, now);
            assert!(stabilizer.state().history().len() <= 3);
            now += FRAME;
        }
    }

    #[test]
    fn test_labels_during_cooldown_do_not_enter_history() {
        let start = Instant::now();
        let mut stabilizer = GestureStabilizer::new(StabilizerPolicy::default(), start);
        let (_, now) = feed(&mut stabilizer, after_cooldown(start), &[Gesture::Rock; 3]);
        let committed = stabilizer.state().history();

        let (out, _) = feed(&mut stabilizer, now, &[Gesture::Paper; 5]);
        assert!(out.iter().all(|g| *g == Gesture::Rock));
        assert_eq!(stabilizer.state().history(), committed);
    }

    #[test]
    fn test_transitions_respect_cooldown() {
        let start = Instant::now();
        let mut stabilizer = GestureStabilizer::new(StabilizerPolicy::default(), start);
        let pattern = [
            Gesture::Rock,
            Gesture::Rock,
            Gesture::Paper,
            Gesture::Paper,
            Gesture::Scissors,
            Gesture::Scissors,
        ];

        let mut transitions = Vec::new();
        let mut previous = stabilizer.state().last_stable_gesture();
        let mut now = start;
        for label in pattern.iter().cycle().take(2000) {
            stabilizer.update(*label, now);
            let stable = stabilizer.state().last_stable_gesture();
            if stable != previous {
                transitions.push(now);
                previous = stable;
            }
            now += Duration::from_millis(7);
        }

        assert!(transitions.len() > 2);
        for pair in transitions.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_millis(500));
        }
    }

    #[test]
    fn test_identical_inputs_give_identical_outputs() {
        let start = Instant::now();
        let labels = [
            Gesture::Rock,
            Gesture::Paper,
            Gesture::Paper,
            Gesture::Scissors,
            Gesture::Paper,
            Gesture::Rock,
        ];
        let run = || {
            let mut stabilizer = GestureStabilizer::new(StabilizerPolicy::default(), start);
            let mut now = start;
            labels
                .iter()
                .cycle()
                .take(300)
                .map(|label| {
                    now += Duration::from_millis(40);
                    stabilizer.update(*label, now)
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }
}
