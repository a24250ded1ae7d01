#![forbid(unsafe_code)]

//! Deterministic stage driver for tests.
//!
//! `StageSimulator` advances a [`Stage`] by a fixed step per frame, with no
//! threads and no wall clock, and records what every scramble element
//! displayed after each frame.
//!
//! # Example
//!
//! ```ignore
//! use glyphfall_runtime::{Stage, StageSimulator};
//!
//! let mut sim = StageSimulator::new(Stage::new(Rect::from_size(80, 24)));
//! sim.stage_mut().add_scramble(id, rect, "HELLO", &ScrambleConfig::default().seed(1))?;
//! sim.run_until_idle(1_000);
//! assert_eq!(sim.history(id).last().map(String::as_str), Some("HELLO"));
//! ```

use std::collections::BTreeMap;
use std::time::Duration;

use glyphfall_core::ElementId;

use crate::stage::{EffectEvent, Stage};
use crate::ticker::DEFAULT_FRAME_INTERVAL;

/// Fixed-step driver around a [`Stage`].
#[derive(Debug)]
pub struct StageSimulator {
    stage: Stage,
    step: Duration,
    history: BTreeMap<ElementId, Vec<String>>,
    events: Vec<(u64, ElementId, EffectEvent)>,
}

impl StageSimulator {
    /// Wrap `stage` with the default 16 ms step.
    pub fn new(stage: Stage) -> Self {
        Self::with_step(stage, DEFAULT_FRAME_INTERVAL)
    }

    /// Wrap `stage` with a custom step.
    pub fn with_step(stage: Stage, step: Duration) -> Self {
        Self {
            stage,
            step,
            history: BTreeMap::new(),
            events: Vec::new(),
        }
    }

    /// The wrapped stage.
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// The wrapped stage, for input injection.
    pub fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }

    /// Run one frame and record its output.
    pub fn step(&mut self) {
        self.stage.advance(self.step);
        let frame = self.stage.frame_count();
        let elements: Vec<ElementId> = self.stage.elements().collect();
        for element in elements {
            if let Some(text) = self.stage.text(element) {
                self.history
                    .entry(element)
                    .or_default()
                    .push(text.to_owned());
            }
        }
        self.events.extend(
            self.stage
                .drain_events()
                .into_iter()
                .map(|(element, event)| (frame, element, event)),
        );
    }

    /// Run exactly `n` frames.
    pub fn run_frames(&mut self, n: usize) {
        for _ in 0..n {
            self.step();
        }
    }

    /// Run frames until no effect is waiting for one, at most `limit`.
    /// Returns the number of frames run.
    pub fn run_until_idle(&mut self, limit: usize) -> usize {
        let mut n = 0;
        while n < limit && !self.stage.is_idle() {
            self.step();
            n += 1;
        }
        n
    }

    /// Display values of `element`, one per simulated frame since it was
    /// first seen.
    pub fn history(&self, element: ElementId) -> &[String] {
        self.history.get(&element).map(Vec::as_slice).unwrap_or_default()
    }

    /// Every milestone seen, tagged with the frame number it was drained on.
    pub fn events(&self) -> &[(u64, ElementId, EffectEvent)] {
        &self.events
    }

    /// Milestones for one element.
    pub fn events_for(&self, element: ElementId) -> Vec<EffectEvent> {
        self.events
            .iter()
            .filter(|(_, id, _)| *id == element)
            .map(|(_, _, event)| *event)
            .collect()
    }

    /// Step size.
    #[inline]
    pub fn step_size(&self) -> Duration {
        self.step
    }

    /// Simulated time.
    #[inline]
    pub fn now(&self) -> Duration {
        self.stage.now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphfall_core::Rect;
    use glyphfall_scramble::{ScrambleConfig, ScrambleEvent};

    const EL: ElementId = ElementId::new(1);

    fn sim() -> StageSimulator {
        StageSimulator::new(Stage::new(Rect::from_size(80, 24)))
    }

    #[test]
    fn records_one_value_per_frame() {
        let mut s = sim();
        s.stage_mut()
            .add_scramble(EL, Rect::new(0, 0, 10, 1), "ABC", &ScrambleConfig::default().seed(5))
            .unwrap();
        let n = s.run_until_idle(1000);
        assert_eq!(s.history(EL).len(), n);
        assert_eq!(s.history(EL).last().map(String::as_str), Some("ABC"));
        assert_eq!(s.now(), s.step_size() * n as u32);
    }

    #[test]
    fn run_frames_keeps_going_when_idle() {
        let mut s = sim();
        s.run_frames(3);
        assert_eq!(s.stage().frame_count(), 3);
        assert!(s.history(EL).is_empty());
    }

    #[test]
    fn events_are_tagged_with_frames() {
        let mut s = sim();
        s.stage_mut()
            .add_scramble(EL, Rect::new(0, 0, 10, 1), "AB", &ScrambleConfig::default().seed(5))
            .unwrap();
        s.run_until_idle(1000);
        let events = s.events_for(EL);
        assert_eq!(events.first(), Some(&EffectEvent::Scramble(ScrambleEvent::Started)));
        assert!(matches!(
            events.last(),
            Some(EffectEvent::Scramble(ScrambleEvent::Resolved { .. }))
        ));
        let frames: Vec<u64> = s.events().iter().map(|(f, _, _)| *f).collect();
        assert!(frames.windows(2).all(|w| w[0] <= w[1]));
    }
}
