#![forbid(unsafe_code)]

//! Group reveal: one viewport entry, N staggered item animations.
//!
//! A [`RevealGroup`] subscribes its container element to the viewport. The
//! first "entered" notification fixes the group's entry time and drops the
//! subscription; from then on every item's phase is a pure function of the
//! frame clock and the [`RevealSchedule`].
//!
//! Milestones are queued during notifications and drained by the owner with
//! [`drain_events`](RevealGroup::drain_events).
//!
//! # Invariants
//!
//! 1. `Entered` fires at most once per group lifetime.
//! 2. Each `ItemStarted(i)` and `ItemFinished(i)` fires at most once, and
//!    items start in index order.
//! 3. `Completed` fires once, after every `ItemFinished`; no frame is
//!    requested after it.
//!
//! # Failure Modes
//!
//! - Container never enters: every item stays `Hidden`. Not a fault.
//! - Empty schedule: `Entered` is followed directly by `Completed`.

use std::time::Duration;

use glyphfall_core::animation::{ease_out, progress};
use glyphfall_core::{EffectContext, ElementId, SubscriptionId, ThresholdMargin};

use crate::schedule::RevealSchedule;

/// Default entry margin for reveal containers: two rows inside each edge.
pub const DEFAULT_REVEAL_MARGIN: ThresholdMargin = ThresholdMargin::Inset(2);

/// Where one item is in its reveal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RevealPhase {
    /// The group has not entered the viewport.
    Hidden,
    /// The group entered; this item's start offset has not elapsed.
    Waiting,
    /// Eased progress in `[0, 1)`.
    Revealing(f32),
    /// Fully shown.
    Revealed,
}

impl RevealPhase {
    /// Visual progress: 0 while hidden or waiting, 1 once revealed.
    pub fn amount(self) -> f32 {
        match self {
            Self::Hidden | Self::Waiting => 0.0,
            Self::Revealing(p) => p,
            Self::Revealed => 1.0,
        }
    }
}

/// Milestones of a group reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealEvent {
    /// The container entered the viewport.
    Entered,
    /// Item `i` began revealing.
    ItemStarted(usize),
    /// Item `i` is fully shown.
    ItemFinished(usize),
    /// Every item is fully shown.
    Completed,
}

/// A once-only staggered reveal bound to one container element.
#[derive(Debug)]
pub struct RevealGroup {
    element: ElementId,
    schedule: RevealSchedule,
    subscription: Option<SubscriptionId>,
    entered_at: Option<Duration>,
    now: Duration,
    started: Vec<bool>,
    finished: Vec<bool>,
    completed: bool,
    events: Vec<RevealEvent>,
}

impl RevealGroup {
    /// Create the group and subscribe its container to the viewport.
    pub fn mount(
        element: ElementId,
        schedule: RevealSchedule,
        margin: ThresholdMargin,
        ctx: &mut EffectContext<'_>,
    ) -> Self {
        let subscription = ctx.viewport.subscribe(element, margin);
        let len = schedule.len();
        tracing::debug!(
            element = element.get(),
            items = len,
            subscription = subscription.get(),
            "reveal group mounted"
        );
        Self {
            element,
            schedule,
            subscription: Some(subscription),
            entered_at: None,
            now: ctx.now,
            started: vec![false; len],
            finished: vec![false; len],
            completed: false,
            events: Vec::new(),
        }
    }

    /// A viewport "entered" notification for the container.
    ///
    /// Only the first one for the live subscription counts.
    pub fn on_viewport_entered(
        &mut self,
        subscription: SubscriptionId,
        ctx: &mut EffectContext<'_>,
    ) {
        if self.entered_at.is_some() || self.subscription != Some(subscription) {
            return;
        }
        self.subscription = None;
        ctx.viewport.unsubscribe(subscription);
        self.entered_at = Some(ctx.now);
        self.events.push(RevealEvent::Entered);
        tracing::debug!(element = self.element.get(), "reveal group entered");
        self.advance(ctx);
    }

    /// A frame was delivered to the container.
    pub fn on_frame(&mut self, ctx: &mut EffectContext<'_>) {
        if self.entered_at.is_none() || self.completed {
            return;
        }
        self.advance(ctx);
    }

    /// Release the subscription and any pending frame.
    pub fn destroy(mut self, ctx: &mut EffectContext<'_>) {
        if let Some(sub) = self.subscription.take() {
            ctx.viewport.unsubscribe(sub);
        }
        ctx.frames.cancel_frame(self.element);
        tracing::debug!(element = self.element.get(), "reveal group destroyed");
    }

    fn advance(&mut self, ctx: &mut EffectContext<'_>) {
        self.now = ctx.now;
        let Some(elapsed) = self.elapsed() else {
            return;
        };

        for i in 0..self.schedule.len() {
            let start = self.schedule.start_offsets()[i];
            if elapsed < start {
                // Offsets are ordered, so nothing after this has started.
                break;
            }
            if !self.started[i] {
                self.started[i] = true;
                self.events.push(RevealEvent::ItemStarted(i));
                tracing::trace!(element = self.element.get(), item = i, "reveal item started");
            }
            let duration = self.schedule.items()[i].duration;
            if !self.finished[i] && progress(elapsed - start, duration) >= 1.0 {
                self.finished[i] = true;
                self.events.push(RevealEvent::ItemFinished(i));
            }
        }

        if self.finished.iter().all(|f| *f) {
            self.completed = true;
            self.events.push(RevealEvent::Completed);
            tracing::debug!(element = self.element.get(), "reveal group completed");
        } else {
            ctx.frames.request_next_frame(self.element);
        }
    }

    fn elapsed(&self) -> Option<Duration> {
        self.entered_at.map(|at| self.now.saturating_sub(at))
    }

    /// Phase of item `index` at the last observed frame time.
    ///
    /// Out-of-range indices report `Hidden`.
    pub fn phase(&self, index: usize) -> RevealPhase {
        let (Some(elapsed), Some(item)) = (self.elapsed(), self.schedule.items().get(index)) else {
            return RevealPhase::Hidden;
        };
        let start = self.schedule.start_offsets()[index];
        if elapsed < start {
            return RevealPhase::Waiting;
        }
        let t = progress(elapsed - start, item.duration);
        if t >= 1.0 {
            RevealPhase::Revealed
        } else {
            RevealPhase::Revealing(ease_out(t))
        }
    }

    /// Phases of every item.
    pub fn phases(&self) -> Vec<RevealPhase> {
        (0..self.schedule.len()).map(|i| self.phase(i)).collect()
    }

    /// Take the queued milestones.
    pub fn drain_events(&mut self) -> Vec<RevealEvent> {
        std::mem::take(&mut self.events)
    }

    /// Container element.
    #[inline]
    pub fn element(&self) -> ElementId {
        self.element
    }

    /// The item timings.
    #[inline]
    pub fn schedule(&self) -> &RevealSchedule {
        &self.schedule
    }

    /// Live viewport subscription, if the group has not entered yet.
    #[inline]
    pub fn subscription(&self) -> Option<SubscriptionId> {
        self.subscription
    }

    /// Whether the container has entered the viewport.
    #[inline]
    pub fn has_entered(&self) -> bool {
        self.entered_at.is_some()
    }

    /// Whether every item is fully shown.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.completed
    }
}
