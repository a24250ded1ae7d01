#![forbid(unsafe_code)]

//! Activation policies: when a scramble run is started.
//!
//! One [`TriggerMode`] is bound per instance at construction and never
//! changes.
//!
//! - `Load`: start once, after the configured delay, for the lifetime of the
//!   instance.
//! - `Scroll`: subscribe to viewport entry; on the first notification start
//!   once (after the delay) and unsubscribe. Later or duplicate
//!   notifications are counted and ignored.
//! - `Hover`: start on every pointer enter. Starts while a run is in flight
//!   are absorbed by the engine. The delay does not apply.
//!
//! The controller never touches the engine. It returns a [`TriggerAction`]
//! and the owner performs it, which keeps the guard flags here testable on
//! their own.

use std::time::Duration;

use glyphfall_core::{EffectContext, ElementId, SubscriptionId, ThresholdMargin};

/// Activation policy of a scramble instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TriggerMode {
    /// Start immediately on creation (after an optional delay).
    #[default]
    Load,
    /// Start on first viewport entry (after an optional delay).
    Scroll,
    /// Start on every pointer enter.
    Hover,
}

/// What the owner should do after a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerAction {
    /// Nothing.
    None,
    /// Call `start()` on the engine now.
    StartNow,
    /// A delayed start is armed; a frame has been requested to watch it.
    Deferred,
}

/// Binds a [`TriggerMode`] to start requests with once-only guards.
#[derive(Debug, Clone)]
pub struct TriggerController {
    element: ElementId,
    mode: TriggerMode,
    delay: Duration,
    margin: ThresholdMargin,
    fired: bool,
    subscription: Option<SubscriptionId>,
    deadline: Option<Duration>,
    ignored_entries: u64,
}

impl TriggerController {
    /// Create a detached controller.
    pub fn new(
        element: ElementId,
        mode: TriggerMode,
        delay: Duration,
        margin: ThresholdMargin,
    ) -> Self {
        Self {
            element,
            mode,
            delay,
            margin,
            fired: false,
            subscription: None,
            deadline: None,
            ignored_entries: 0,
        }
    }

    /// Bind to the host. Called once, at construction of the owner.
    pub fn attach(&mut self, ctx: &mut EffectContext<'_>) -> TriggerAction {
        match self.mode {
            TriggerMode::Load => self.fire(ctx),
            TriggerMode::Scroll => {
                if self.subscription.is_none() && !self.fired {
                    let sub = ctx.viewport.subscribe(self.element, self.margin);
                    tracing::debug!(
                        element = self.element.get(),
                        subscription = sub.get(),
                        "scroll trigger subscribed"
                    );
                    self.subscription = Some(sub);
                }
                TriggerAction::None
            }
            TriggerMode::Hover => TriggerAction::None,
        }
    }

    /// A viewport "entered" notification arrived for `subscription`.
    pub fn viewport_entered(
        &mut self,
        subscription: SubscriptionId,
        ctx: &mut EffectContext<'_>,
    ) -> TriggerAction {
        if self.mode != TriggerMode::Scroll {
            return TriggerAction::None;
        }
        if self.fired {
            self.ignored_entries += 1;
            tracing::trace!(
                element = self.element.get(),
                subscription = subscription.get(),
                "duplicate viewport entry ignored"
            );
            return TriggerAction::None;
        }
        if self.subscription != Some(subscription) {
            self.ignored_entries += 1;
            return TriggerAction::None;
        }
        if let Some(sub) = self.subscription.take() {
            ctx.viewport.unsubscribe(sub);
        }
        self.fire(ctx)
    }

    /// The pointer entered the bound element.
    pub fn pointer_enter(&mut self) -> TriggerAction {
        match self.mode {
            TriggerMode::Hover => {
                self.fired = true;
                TriggerAction::StartNow
            }
            _ => TriggerAction::None,
        }
    }

    /// A frame was delivered to the bound element.
    ///
    /// Returns `StartNow` once an armed delay has elapsed, `Deferred` (with a
    /// fresh frame request) while it is still running.
    pub fn on_frame(&mut self, ctx: &mut EffectContext<'_>) -> TriggerAction {
        match self.deadline {
            Some(deadline) if ctx.now >= deadline => {
                self.deadline = None;
                TriggerAction::StartNow
            }
            Some(_) => {
                ctx.frames.request_next_frame(self.element);
                TriggerAction::Deferred
            }
            None => TriggerAction::None,
        }
    }

    /// Release the viewport subscription and drop any armed delay.
    ///
    /// The owner is responsible for withdrawing its frame request.
    pub fn detach(&mut self, ctx: &mut EffectContext<'_>) {
        if let Some(sub) = self.subscription.take() {
            ctx.viewport.unsubscribe(sub);
            tracing::debug!(
                element = self.element.get(),
                subscription = sub.get(),
                "scroll trigger unsubscribed on detach"
            );
        }
        self.deadline = None;
    }

    fn fire(&mut self, ctx: &mut EffectContext<'_>) -> TriggerAction {
        if self.fired {
            return TriggerAction::None;
        }
        self.fired = true;
        if self.delay.is_zero() {
            return TriggerAction::StartNow;
        }
        self.deadline = Some(ctx.now.saturating_add(self.delay));
        ctx.frames.request_next_frame(self.element);
        TriggerAction::Deferred
    }

    /// Bound mode.
    #[inline]
    pub fn mode(&self) -> TriggerMode {
        self.mode
    }

    /// Configured delay before a `Load`/`Scroll` start.
    #[inline]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Whether the trigger has fired at least once.
    #[inline]
    pub fn has_fired(&self) -> bool {
        self.fired
    }

    /// Live viewport subscription, if any.
    #[inline]
    pub fn subscription(&self) -> Option<SubscriptionId> {
        self.subscription
    }

    /// Whether a delayed start is armed.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Viewport notifications that arrived after firing or for a stale
    /// subscription.
    #[inline]
    pub fn ignored_entries(&self) -> u64 {
        self.ignored_entries
    }
}
