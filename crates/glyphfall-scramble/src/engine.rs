#![forbid(unsafe_code)]

//! The per-instance scramble run and its frame loop.
//!
//! A run starts fully randomised (separators excepted) and resolves positions
//! left to right. Position `i` resolves on the first tick whose frame counter
//! exceeds [`resolve_threshold`]`(i, speed)`; until then it is re-drawn from
//! the alphabet on every tick.
//!
//! # Invariants
//!
//! 1. `render`, `resolved` and the source always have the same length.
//! 2. Separators are resolved at frame 0 and never randomised.
//! 3. Once a run completes the display equals the source exactly.
//! 4. At most one run is in flight; `start` while scrambling is absorbed.
//! 5. Every tick that does not complete the run re-requests the next frame.
//!
//! # Failure Modes
//!
//! - Empty source: the engine is `Resolved` from construction and never
//!   schedules a frame.
//! - Stale frame after cancel/complete: the tick is ignored.

use glyphfall_core::{ElementId, FrameScheduler, SymbolSource, XorShift64};

use crate::alphabet::{Alphabet, is_separator};
use crate::error::ScrambleError;
use crate::state::{RunEvent, RunState};

/// Tuned cascade-speed constant `K` in the resolve threshold.
pub const CASCADE_CONSTANT: f64 = 0.06;

/// Default speed factor.
pub const DEFAULT_SPEED: f64 = 0.04;

/// Frame counter value that position `index` must exceed to resolve.
///
/// Keyed by absolute index, separators included: a string with many spaces
/// finishes its visible cascade sooner than its non-space length suggests.
#[inline]
pub fn resolve_threshold(index: usize, speed: f64) -> f64 {
    (index as f64 + 1.0) * (1.0 / speed) * CASCADE_CONSTANT
}

/// First tick on which position `index` resolves.
#[inline]
pub fn resolve_frame(index: usize, speed: f64) -> u64 {
    (resolve_threshold(index, speed).floor() as u64).saturating_add(1)
}

/// Whether `speed` yields a cascade that terminates.
///
/// Positive and finite is not enough: a subnormal speed makes the per-index
/// step `K / speed` overflow to infinity.
#[inline]
pub fn is_valid_speed(speed: f64) -> bool {
    speed.is_finite() && speed > 0.0 && resolve_threshold(0, speed).is_finite()
}

/// Milestones queued during `start`/`tick`/`cancel`, drained by the owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrambleEvent {
    /// A new run began; the display is fully randomised.
    Started,
    /// A tick produced a new partially resolved display.
    Updated {
        /// Frame counter of the tick.
        frame: u64,
    },
    /// The run completed; the display equals the source.
    Resolved {
        /// Ticks the run took.
        frames: u64,
    },
    /// The in-flight run was cancelled.
    Cancelled,
}

/// Result of delivering one frame to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No run was in flight.
    Ignored,
    /// The run advanced and requested another frame.
    Continue,
    /// The run completed on this tick.
    Resolved,
}

/// Character-resolution state and frame loop for one text instance.
#[derive(Debug, Clone)]
pub struct ScrambleEngine<R: SymbolSource = XorShift64> {
    target: ElementId,
    source: String,
    chars: Vec<char>,
    render: Vec<char>,
    resolved: Vec<bool>,
    frame: u64,
    speed: f64,
    state: RunState,
    alphabet: Alphabet,
    rng: R,
    value: String,
    events: Vec<ScrambleEvent>,
    runs_completed: u64,
}

impl<R: SymbolSource> ScrambleEngine<R> {
    /// Create an idle engine for `source`.
    ///
    /// Frame requests are addressed to `target`.
    ///
    /// # Errors
    ///
    /// [`ScrambleError::InvalidSpeed`] unless [`is_valid_speed`] holds.
    pub fn new(
        target: ElementId,
        source: impl Into<String>,
        speed: f64,
        alphabet: Alphabet,
        rng: R,
    ) -> Result<Self, ScrambleError> {
        if !is_valid_speed(speed) {
            return Err(ScrambleError::InvalidSpeed(speed));
        }
        let source = source.into();
        let chars: Vec<char> = source.chars().collect();
        let state = if chars.is_empty() {
            RunState::Resolved
        } else {
            RunState::Idle
        };
        Ok(Self {
            target,
            render: chars.clone(),
            resolved: vec![true; chars.len()],
            value: source.clone(),
            source,
            chars,
            frame: 0,
            speed,
            state,
            alphabet,
            rng,
            events: Vec::new(),
            runs_completed: 0,
        })
    }

    /// Begin a run. Returns whether one began.
    ///
    /// Absorbed (returns `false`) while a run is in flight, and for an empty
    /// source, which never schedules frames.
    pub fn start(&mut self, frames: &mut dyn FrameScheduler) -> bool {
        if self.chars.is_empty() {
            return false;
        }
        if !self.state.accepts_start() {
            tracing::trace!(target_id = self.target.get(), "scramble start absorbed");
            return false;
        }

        self.frame = 0;
        for i in 0..self.chars.len() {
            let c = self.chars[i];
            if is_separator(c) {
                self.resolved[i] = true;
                self.render[i] = c;
            } else {
                self.resolved[i] = false;
                self.render[i] = self.alphabet.draw(&mut self.rng);
            }
        }
        self.state = self.state.next(RunEvent::Start);
        self.value = self.render.iter().collect();
        self.events.push(ScrambleEvent::Started);
        frames.request_next_frame(self.target);
        tracing::debug!(
            target_id = self.target.get(),
            len = self.chars.len(),
            speed = self.speed,
            "scramble run started"
        );
        true
    }

    /// Advance the run by one frame.
    pub fn tick(&mut self, frames: &mut dyn FrameScheduler) -> TickOutcome {
        if !self.state.is_scrambling() {
            return TickOutcome::Ignored;
        }

        self.frame += 1;
        let frame = self.frame as f64;
        let mut all_resolved = true;
        for i in 0..self.chars.len() {
            if self.resolved[i] {
                continue;
            }
            if frame > resolve_threshold(i, self.speed) {
                self.resolved[i] = true;
                self.render[i] = self.chars[i];
            } else {
                self.render[i] = self.alphabet.draw(&mut self.rng);
                all_resolved = false;
            }
        }

        if all_resolved {
            self.render.clone_from(&self.chars);
            self.value.clone_from(&self.source);
            self.state = self.state.next(RunEvent::Complete);
            self.runs_completed += 1;
            self.events.push(ScrambleEvent::Resolved { frames: self.frame });
            tracing::debug!(
                target_id = self.target.get(),
                frames = self.frame,
                "scramble run resolved"
            );
            return TickOutcome::Resolved;
        }

        self.value = self.render.iter().collect();
        self.events.push(ScrambleEvent::Updated { frame: self.frame });
        frames.request_next_frame(self.target);
        tracing::trace!(target_id = self.target.get(), frame = self.frame, "scramble tick");
        TickOutcome::Continue
    }

    /// Stop the in-flight run. Returns whether one was in flight.
    ///
    /// The pending frame request is withdrawn before any state changes, and
    /// the display is left as it was: nothing is emitted after cancellation.
    pub fn cancel(&mut self, frames: &mut dyn FrameScheduler) -> bool {
        if !self.state.is_scrambling() {
            return false;
        }
        frames.cancel_frame(self.target);
        self.state = self.state.next(RunEvent::Cancel);
        self.render.clone_from(&self.chars);
        self.resolved.fill(true);
        self.events.push(ScrambleEvent::Cancelled);
        tracing::debug!(
            target_id = self.target.get(),
            frame = self.frame,
            "scramble run cancelled"
        );
        true
    }

    /// Replace the source text, cancelling any in-flight run first.
    ///
    /// The new text is displayed plainly and the engine returns to `Idle`
    /// (`Resolved` when the new text is empty).
    pub fn set_source(&mut self, source: impl Into<String>, frames: &mut dyn FrameScheduler) {
        self.cancel(frames);
        self.source = source.into();
        self.chars = self.source.chars().collect();
        self.render.clone_from(&self.chars);
        self.resolved = vec![true; self.chars.len()];
        self.frame = 0;
        self.value.clone_from(&self.source);
        self.state = if self.chars.is_empty() {
            RunState::Resolved
        } else {
            RunState::Idle
        };
    }

    /// Blank the display until the first run starts.
    ///
    /// No effect once a run has started.
    pub fn conceal(&mut self) {
        if self.state == RunState::Idle {
            self.value.clear();
        }
    }

    /// Ticks a full run takes at this speed.
    ///
    /// A source with no resolvable positions still takes one tick to notice
    /// it is done.
    pub fn frames_to_resolve(&self) -> u64 {
        self.chars
            .iter()
            .enumerate()
            .filter(|(_, c)| !is_separator(**c))
            .map(|(i, _)| resolve_frame(i, self.speed))
            .max()
            .unwrap_or(1)
    }

    /// Take the queued milestones.
    pub fn drain_events(&mut self) -> Vec<ScrambleEvent> {
        std::mem::take(&mut self.events)
    }

    /// The element frame requests are addressed to.
    #[inline]
    pub fn target(&self) -> ElementId {
        self.target
    }

    /// The text being resolved.
    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The emitted display value.
    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Per-position characters of the current run.
    #[inline]
    pub fn render(&self) -> &[char] {
        &self.render
    }

    /// Per-position resolution flags of the current run.
    #[inline]
    pub fn resolved(&self) -> &[bool] {
        &self.resolved
    }

    /// Ticks since the current run started.
    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Speed factor.
    #[inline]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Lifecycle state.
    #[inline]
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Symbols unresolved positions are drawn from.
    #[inline]
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Runs that reached `Resolved`.
    #[inline]
    pub fn runs_completed(&self) -> u64 {
        self.runs_completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphfall_core::FrameQueue;

    const EL: ElementId = ElementId::new(1);

    fn engine(text: &str, speed: f64) -> ScrambleEngine {
        ScrambleEngine::new(EL, text, speed, Alphabet::default(), XorShift64::new(11)).unwrap()
    }

    /// Deliver frames until the queue stops asking. Returns ticks delivered.
    fn run_to_end(e: &mut ScrambleEngine, q: &mut FrameQueue, limit: usize) -> usize {
        let mut ticks = 0;
        while ticks < limit {
            let due = q.begin_frame();
            if due.is_empty() {
                break;
            }
            assert_eq!(due, vec![EL]);
            e.tick(q);
            ticks += 1;
        }
        ticks
    }

    #[test]
    fn threshold_formula() {
        assert!((resolve_threshold(0, 1.0) - 0.06).abs() < 1e-12);
        assert!((resolve_threshold(4, 1.0) - 0.30).abs() < 1e-12);
        assert!((resolve_threshold(0, 0.04) - 1.5).abs() < 1e-9);
        assert_eq!(resolve_frame(0, 1.0), 1);
        assert_eq!(resolve_frame(0, 0.04), 2);
    }

    #[test]
    fn rejects_non_positive_speed() {
        for speed in [0.0, -0.5, f64::NAN, f64::INFINITY, 1e-310] {
            let err = ScrambleEngine::new(EL, "x", speed, Alphabet::default(), XorShift64::new(0));
            assert!(matches!(err, Err(ScrambleError::InvalidSpeed(_))), "{speed}");
        }
    }

    #[test]
    fn subnormal_speed_is_rejected_before_it_can_stall() {
        assert!(resolve_threshold(0, 1e-310).is_infinite());
        assert!(!is_valid_speed(1e-310));
        assert!(is_valid_speed(1e-300));
        assert_eq!(resolve_frame(0, 1e-310), u64::MAX);
        assert_eq!(engine("AB", 1e-300).frames_to_resolve(), resolve_frame(1, 1e-300));
    }

    #[test]
    fn fresh_engine_is_idle_showing_source() {
        let e = engine("HELLO", 0.04);
        assert_eq!(e.state(), RunState::Idle);
        assert_eq!(e.value(), "HELLO");
        assert_eq!(e.render().len(), 5);
        assert_eq!(e.resolved().len(), 5);
    }

    #[test]
    fn empty_source_is_resolved_and_never_ticks() {
        let mut q = FrameQueue::new();
        let mut e = engine("", 0.04);
        assert_eq!(e.state(), RunState::Resolved);
        assert!(!e.start(&mut q));
        assert!(q.is_idle());
        assert!(e.drain_events().is_empty());
    }

    #[test]
    fn start_randomises_all_but_separators() {
        let mut q = FrameQueue::new();
        let mut e = engine("AB CD", 1.0);
        assert!(e.start(&mut q));
        assert_eq!(e.state(), RunState::Scrambling);
        assert_eq!(e.frame_count(), 0);
        assert_eq!(e.resolved(), &[false, false, true, false, false]);
        assert_eq!(e.render()[2], ' ');
        for (i, c) in e.render().iter().enumerate() {
            if i != 2 {
                assert!(e.alphabet().contains(*c), "position {i} drew {c:?}");
            }
        }
        assert!(q.is_frame_requested(EL));
        assert_eq!(e.drain_events(), vec![ScrambleEvent::Started]);
    }

    #[test]
    fn ab_cd_resolves_exactly() {
        let mut q = FrameQueue::new();
        let mut e = engine("AB CD", 1.0);
        e.start(&mut q);
        let ticks = run_to_end(&mut e, &mut q, 100);
        assert_eq!(ticks as u64, e.frames_to_resolve());
        assert_eq!(e.state(), RunState::Resolved);
        assert_eq!(e.value(), "AB CD");
        assert_eq!(e.render().iter().collect::<String>(), "AB CD");
    }

    #[test]
    fn no_position_resolves_before_its_threshold() {
        let mut q = FrameQueue::new();
        let text = "DECRYPTING SIGNAL";
        let speed = 0.05;
        let mut e = engine(text, speed);
        e.start(&mut q);
        while !q.begin_frame().is_empty() {
            e.tick(&mut q);
            let frame = e.frame_count() as f64;
            for (i, c) in text.chars().enumerate() {
                if is_separator(c) {
                    assert!(e.resolved()[i]);
                } else if e.state() == RunState::Scrambling {
                    assert_eq!(e.resolved()[i], frame > resolve_threshold(i, speed), "pos {i}");
                }
            }
        }
        assert_eq!(e.value(), text);
    }

    #[test]
    fn cascade_is_left_to_right() {
        let mut q = FrameQueue::new();
        let mut e = engine("ABCDEFGHIJ", 0.04);
        e.start(&mut q);
        while !q.begin_frame().is_empty() {
            e.tick(&mut q);
            let flags = e.resolved();
            for w in flags.windows(2) {
                assert!(w[0] || !w[1], "resolved out of order: {flags:?}");
            }
        }
    }

    #[test]
    fn tick_re_requests_until_resolved() {
        let mut q = FrameQueue::new();
        let mut e = engine("LIVENESS", 0.04);
        e.start(&mut q);
        loop {
            assert!(q.is_frame_requested(EL), "loop stalled at frame {}", e.frame_count());
            q.begin_frame();
            if e.tick(&mut q) == TickOutcome::Resolved {
                break;
            }
        }
        assert!(q.is_idle());
    }

    #[test]
    fn start_while_scrambling_is_absorbed() {
        let mut q = FrameQueue::new();
        let mut e = engine("ONCE", 0.04);
        assert!(e.start(&mut q));
        assert!(!e.start(&mut q));
        assert_eq!(q.pending_len(), 1);
        run_to_end(&mut e, &mut q, 1000);
        let resolved: Vec<_> = e
            .drain_events()
            .into_iter()
            .filter(|ev| matches!(ev, ScrambleEvent::Resolved { .. }))
            .collect();
        assert_eq!(resolved.len(), 1);
        assert_eq!(e.runs_completed(), 1);
    }

    #[test]
    fn restart_after_resolved_re_randomises() {
        let mut q = FrameQueue::new();
        let mut e = engine("AGAIN AND AGAIN", 0.04);
        e.start(&mut q);
        run_to_end(&mut e, &mut q, 1000);
        assert_eq!(e.state(), RunState::Resolved);

        assert!(e.start(&mut q));
        assert_eq!(e.frame_count(), 0);
        for (i, c) in "AGAIN AND AGAIN".chars().enumerate() {
            assert_eq!(e.resolved()[i], is_separator(c));
        }
        run_to_end(&mut e, &mut q, 1000);
        assert_eq!(e.value(), "AGAIN AND AGAIN");
        assert_eq!(e.runs_completed(), 2);
    }

    #[test]
    fn tabs_and_newlines_scramble_like_letters() {
        let mut q = FrameQueue::new();
        let text = "A\tB\nC D";
        let mut e = engine(text, 0.04);
        e.start(&mut q);
        assert_eq!(e.resolved(), &[false, false, false, false, false, true, false]);
        let shown: Vec<char> = e.value().chars().collect();
        assert_ne!(shown[1], '\t');
        assert_ne!(shown[3], '\n');
        assert_eq!(shown[5], ' ');
        run_to_end(&mut e, &mut q, 1000);
        assert_eq!(e.value(), text);
    }

    #[test]
    fn cancel_withdraws_frame_and_stops_output() {
        let mut q = FrameQueue::new();
        let mut e = engine("CANCEL ME", 0.04);
        e.start(&mut q);
        q.begin_frame();
        e.tick(&mut q);
        let shown = e.value().to_string();
        e.drain_events();

        assert!(e.cancel(&mut q));
        assert!(!q.is_frame_requested(EL));
        assert_eq!(e.state(), RunState::Idle);
        assert_eq!(e.tick(&mut q), TickOutcome::Ignored);
        assert_eq!(e.value(), shown);
        assert_eq!(e.drain_events(), vec![ScrambleEvent::Cancelled]);
        assert!(!e.cancel(&mut q));
    }

    #[test]
    fn set_source_mid_run_cancels_first() {
        let mut q = FrameQueue::new();
        let mut e = engine("OLD TEXT", 0.04);
        e.start(&mut q);
        e.set_source("NEW", &mut q);
        assert!(q.is_idle());
        assert_eq!(e.state(), RunState::Idle);
        assert_eq!(e.value(), "NEW");
        assert_eq!(e.render().len(), 3);
        assert_eq!(e.resolved().len(), 3);
        e.set_source("", &mut q);
        assert_eq!(e.state(), RunState::Resolved);
    }

    #[test]
    fn conceal_only_before_first_run() {
        let mut q = FrameQueue::new();
        let mut e = engine("HIDDEN", 0.04);
        e.conceal();
        assert_eq!(e.value(), "");
        e.start(&mut q);
        e.conceal();
        assert_eq!(e.value().chars().count(), 6);
    }

    #[test]
    fn separator_only_source_completes_in_one_tick() {
        let mut q = FrameQueue::new();
        let mut e = engine("   ", 0.04);
        assert!(e.start(&mut q));
        assert_eq!(e.value(), "   ");
        assert_eq!(run_to_end(&mut e, &mut q, 10), 1);
        assert_eq!(e.state(), RunState::Resolved);
    }

    // The threshold is keyed by absolute index, so spaces ahead of a letter
    // delay it exactly as much as letters would. Documented as-is; not a fix.
    #[test]
    fn threshold_keys_on_absolute_index_including_separators() {
        let spaced = engine("A    B", 0.04);
        let dense = engine("AAAAAB", 0.04);
        assert_eq!(spaced.frames_to_resolve(), dense.frames_to_resolve());
        assert_eq!(spaced.frames_to_resolve(), resolve_frame(5, 0.04));
    }

    #[test]
    fn multibyte_source_keeps_lengths_aligned() {
        let mut q = FrameQueue::new();
        let mut e = engine("naïve café", 0.04);
        e.start(&mut q);
        assert_eq!(e.render().len(), 10);
        run_to_end(&mut e, &mut q, 1000);
        assert_eq!(e.value(), "naïve café");
    }
}
