#![forbid(unsafe_code)]

//! The stage: one logical worker owning every effect and its collaborators.
//!
//! A [`Stage`] holds the [`FrameQueue`], [`ViewportTracker`] and
//! [`HoverTracker`] plus all mounted effects keyed by [`ElementId`]. Inputs
//! (scrolling, pointer motion, frame ticks) are routed to the effects they
//! concern; nothing is shared between effects.
//!
//! # Frame order
//!
//! [`Stage::advance`] performs one frame:
//!
//! 1. advance the clock by `dt`;
//! 2. drain the frame queue;
//! 3. poll the viewport and deliver each "entered" notification;
//! 4. deliver `on_frame` to each element drained in step 2.
//!
//! Requests made during steps 3 and 4 are due on the next frame. Targets
//! whose effect was removed are skipped.
//!
//! Element rectangles are in document coordinates (row 0 is the top of the
//! page). Pointer positions are in viewport coordinates and are translated
//! by the current scroll offset.

use std::collections::BTreeMap;
use std::time::Duration;

use glyphfall_core::{
    EffectContext, ElementId, FrameQueue, FrameScheduler, HoverTracker, PointerEvent, Rect,
    ThresholdMargin, ViewportTracker,
};
use glyphfall_reveal::{RevealEvent, RevealGroup, RevealSchedule};
use glyphfall_scramble::{ScrambleConfig, ScrambleError, ScrambleEvent, ScrambleText, TriggerMode};

/// An effect mounted on the stage.
#[derive(Debug)]
pub enum Effect {
    /// A scrambling text value.
    Scramble(ScrambleText),
    /// A staggered group reveal.
    Reveal(RevealGroup),
}

/// A milestone from one of the stage's effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectEvent {
    /// From a scramble text.
    Scramble(ScrambleEvent),
    /// From a reveal group.
    Reveal(RevealEvent),
}

/// Host for all effects of one surface.
#[derive(Debug)]
pub struct Stage {
    frames: FrameQueue,
    viewport: ViewportTracker,
    hover: HoverTracker,
    effects: BTreeMap<ElementId, Effect>,
    now: Duration,
    pointer: Option<(u16, u16)>,
    skipped: u64,
}

impl Stage {
    /// Create an empty stage showing `viewport` (document coordinates).
    pub fn new(viewport: Rect) -> Self {
        Self {
            frames: FrameQueue::new(),
            viewport: ViewportTracker::new(viewport),
            hover: HoverTracker::new(),
            effects: BTreeMap::new(),
            now: Duration::ZERO,
            pointer: None,
            skipped: 0,
        }
    }

    /// Mount a scramble text at `rect`.
    ///
    /// Replaces (and destroys) any effect already on `element`. `Hover`
    /// instances are registered as pointer targets.
    ///
    /// # Errors
    ///
    /// The construction error of [`ScrambleText::construct`]; the stage is
    /// left unchanged apart from the removal of a previous effect.
    pub fn add_scramble(
        &mut self,
        element: ElementId,
        rect: Rect,
        text: impl Into<String>,
        config: &ScrambleConfig,
    ) -> Result<(), ScrambleError> {
        self.remove(element);
        config.validate()?;
        self.viewport.place(element, rect);
        let mut ctx = EffectContext::new(&mut self.frames, &mut self.viewport, self.now);
        let text = ScrambleText::construct(element, text, config, &mut ctx)?;
        if config.mode == TriggerMode::Hover {
            self.hover.register(element, rect);
        }
        self.effects.insert(element, Effect::Scramble(text));
        self.refresh_hover();
        Ok(())
    }

    /// Mount a reveal group whose container occupies `rect`.
    pub fn add_reveal(
        &mut self,
        element: ElementId,
        rect: Rect,
        schedule: RevealSchedule,
        margin: ThresholdMargin,
    ) {
        self.remove(element);
        self.viewport.place(element, rect);
        let mut ctx = EffectContext::new(&mut self.frames, &mut self.viewport, self.now);
        let group = RevealGroup::mount(element, schedule, margin, &mut ctx);
        self.effects.insert(element, Effect::Reveal(group));
    }

    /// Destroy the effect on `element`. Returns whether there was one.
    ///
    /// Completes synchronously: the effect's subscription and pending frame
    /// are released before this returns.
    pub fn remove(&mut self, element: ElementId) -> bool {
        let Some(effect) = self.effects.remove(&element) else {
            return false;
        };
        if let Some(PointerEvent::Leave(_)) = self.hover.unregister(element) {
            tracing::trace!(element = element.get(), "hovered target removed");
        }
        let mut ctx = EffectContext::new(&mut self.frames, &mut self.viewport, self.now);
        match effect {
            Effect::Scramble(text) => text.destroy(&mut ctx),
            Effect::Reveal(group) => group.destroy(&mut ctx),
        }
        self.viewport.remove_element(element);
        true
    }

    /// Destroy every effect.
    pub fn clear(&mut self) {
        let elements: Vec<ElementId> = self.effects.keys().copied().collect();
        for element in elements {
            self.remove(element);
        }
    }

    /// Replace the text of a scramble effect. Returns whether `element`
    /// holds one.
    pub fn set_text(&mut self, element: ElementId, text: impl Into<String>) -> bool {
        let Some(Effect::Scramble(scramble)) = self.effects.get_mut(&element) else {
            return false;
        };
        let mut ctx = EffectContext::new(&mut self.frames, &mut self.viewport, self.now);
        scramble.set_text(text, &mut ctx);
        true
    }

    /// Scroll so the viewport top sits at document row `y`.
    pub fn scroll_to(&mut self, y: u16) {
        self.viewport.scroll_to(y);
        self.refresh_hover();
    }

    /// Scroll by `delta` rows, clamped to the top of the document.
    pub fn scroll_by(&mut self, delta: i32) {
        let top = i32::from(self.viewport.viewport().top());
        let y = (top + delta).clamp(0, i32::from(u16::MAX));
        self.scroll_to(y as u16);
    }

    /// Resize the viewport, keeping the scroll offset.
    pub fn resize(&mut self, width: u16, height: u16) {
        let top = self.viewport.viewport().top();
        self.viewport.set_viewport(Rect::new(0, top, width, height));
        self.refresh_hover();
    }

    /// Move a mounted effect to `rect` without restarting it. Returns whether
    /// `element` holds an effect.
    ///
    /// Hover targets keep their stacking order. An undelivered viewport
    /// subscription is evaluated against the new layout on the next frame.
    pub fn move_element(&mut self, element: ElementId, rect: Rect) -> bool {
        if !self.effects.contains_key(&element) {
            return false;
        }
        self.viewport.place(element, rect);
        self.hover.move_target(element, rect);
        self.refresh_hover();
        true
    }

    /// Layout of a mounted element in document coordinates.
    pub fn layout(&self, element: ElementId) -> Option<Rect> {
        self.viewport.layout_of(element)
    }

    /// The pointer moved to viewport position (`column`, `row`).
    pub fn pointer_moved(&mut self, column: u16, row: u16) {
        self.pointer = Some((column, row));
        self.refresh_hover();
    }

    /// The pointer left the surface.
    pub fn pointer_left(&mut self) {
        self.pointer = None;
        let events = self.hover.clear();
        self.dispatch_pointer(events);
    }

    /// Deliver a pointer notification directly, bypassing hit testing.
    pub fn pointer_event(&mut self, event: PointerEvent) {
        self.dispatch_pointer(vec![event]);
    }

    /// Run one frame `dt` after the previous one.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);

        // Taken before entries are delivered: a run started by an entry gets
        // its first tick on the following frame.
        let due = self.frames.begin_frame();

        for entry in self.viewport.poll() {
            let mut ctx = EffectContext::new(&mut self.frames, &mut self.viewport, self.now);
            match self.effects.get_mut(&entry.element) {
                Some(Effect::Scramble(text)) => {
                    text.on_viewport_entered(entry.subscription, &mut ctx);
                }
                Some(Effect::Reveal(group)) => {
                    group.on_viewport_entered(entry.subscription, &mut ctx);
                }
                None => {}
            }
        }

        tracing::trace!(frame = self.frames.frame_count(), due = due.len(), "stage frame");
        for element in due {
            let mut ctx = EffectContext::new(&mut self.frames, &mut self.viewport, self.now);
            match self.effects.get_mut(&element) {
                Some(Effect::Scramble(text)) => {
                    text.on_frame(&mut ctx);
                }
                Some(Effect::Reveal(group)) => group.on_frame(&mut ctx),
                None => {
                    self.skipped += 1;
                    tracing::trace!(element = element.get(), "frame for removed element skipped");
                }
            }
        }
    }

    /// Collect queued milestones from every effect, in element order.
    pub fn drain_events(&mut self) -> Vec<(ElementId, EffectEvent)> {
        let mut out = Vec::new();
        for (element, effect) in &mut self.effects {
            match effect {
                Effect::Scramble(text) => out.extend(
                    text.drain_events()
                        .into_iter()
                        .map(|e| (*element, EffectEvent::Scramble(e))),
                ),
                Effect::Reveal(group) => out.extend(
                    group
                        .drain_events()
                        .into_iter()
                        .map(|e| (*element, EffectEvent::Reveal(e))),
                ),
            }
        }
        out
    }

    fn refresh_hover(&mut self) {
        let Some((column, row)) = self.pointer else {
            return;
        };
        let y = row.saturating_add(self.viewport.viewport().top());
        let events = self.hover.pointer_moved(column, y);
        self.dispatch_pointer(events);
    }

    fn dispatch_pointer(&mut self, events: Vec<PointerEvent>) {
        for event in events {
            if let Some(Effect::Scramble(text)) = self.effects.get_mut(&event.element()) {
                let mut ctx = EffectContext::new(&mut self.frames, &mut self.viewport, self.now);
                text.on_pointer(event, &mut ctx);
            }
        }
    }

    /// Current display value of a scramble effect.
    pub fn text(&self, element: ElementId) -> Option<&str> {
        match self.effects.get(&element)? {
            Effect::Scramble(text) => Some(text.value()),
            Effect::Reveal(_) => None,
        }
    }

    /// The scramble effect on `element`, if any.
    pub fn scramble(&self, element: ElementId) -> Option<&ScrambleText> {
        match self.effects.get(&element)? {
            Effect::Scramble(text) => Some(text),
            Effect::Reveal(_) => None,
        }
    }

    /// The reveal group on `element`, if any.
    pub fn reveal(&self, element: ElementId) -> Option<&RevealGroup> {
        match self.effects.get(&element)? {
            Effect::Reveal(group) => Some(group),
            Effect::Scramble(_) => None,
        }
    }

    /// Mounted elements in id order.
    pub fn elements(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.effects.keys().copied()
    }

    /// Number of mounted effects.
    #[inline]
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// True when nothing is mounted.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// True when no effect is waiting for a frame.
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.frames.is_idle()
    }

    /// Whether `element` has a frame pending.
    pub fn is_animating(&self, element: ElementId) -> bool {
        self.frames.is_frame_requested(element)
    }

    /// Stage clock.
    #[inline]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Frames run so far.
    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.frames.frame_count()
    }

    /// Frame callbacks dropped because their element was gone.
    #[inline]
    pub fn skipped_frames(&self) -> u64 {
        self.skipped
    }

    /// Current viewport rectangle.
    #[inline]
    pub fn viewport(&self) -> Rect {
        self.viewport.viewport()
    }

    /// Live viewport subscriptions.
    #[inline]
    pub fn subscriber_count(&self) -> usize {
        self.viewport.subscriber_count()
    }

    /// Element under the pointer, if it is a hover target.
    #[inline]
    pub fn hovered(&self) -> Option<ElementId> {
        self.hover.hovered()
    }
}

impl Drop for Stage {
    fn drop(&mut self) {
        self.clear();
    }
}
