#![forbid(unsafe_code)]

//! The exposed scramble surface: construct, feed notifications, destroy.

use glyphfall_core::{
    EffectContext, ElementId, PointerEvent, SubscriptionId, SymbolSource, XorShift64,
};

use crate::config::ScrambleConfig;
use crate::engine::{ScrambleEngine, ScrambleEvent, TickOutcome};
use crate::error::ScrambleError;
use crate::state::RunState;
use crate::trigger::{TriggerAction, TriggerController, TriggerMode};

/// A live scrambling text value bound to one element.
///
/// Owns a [`ScrambleEngine`] and the [`TriggerController`] deciding when it
/// runs. The host routes frame, viewport and pointer notifications for
/// [`element`](Self::element) into the `on_*` methods and reads
/// [`value`](Self::value) after each frame.
///
/// Must be torn down with [`destroy`](Self::destroy), which releases the
/// viewport subscription and pending frame synchronously.
#[derive(Debug)]
pub struct ScrambleText<R: SymbolSource = XorShift64> {
    element: ElementId,
    engine: ScrambleEngine<R>,
    controller: TriggerController,
    start_invocations: u64,
    destroyed: bool,
}

impl ScrambleText<XorShift64> {
    /// Build and attach an instance.
    ///
    /// Uses the configured seed, or the wall clock when none is set.
    ///
    /// # Errors
    ///
    /// Fails fast on an invalid speed or an empty alphabet; nothing is
    /// subscribed or scheduled in that case.
    pub fn construct(
        element: ElementId,
        source: impl Into<String>,
        config: &ScrambleConfig,
        ctx: &mut EffectContext<'_>,
    ) -> Result<Self, ScrambleError> {
        let rng = config
            .seed
            .map(XorShift64::new)
            .unwrap_or_else(XorShift64::from_entropy);
        Self::construct_with_rng(element, source, config, rng, ctx)
    }
}

impl<R: SymbolSource> ScrambleText<R> {
    /// Build and attach an instance drawing symbols from `rng`.
    ///
    /// # Errors
    ///
    /// See [`construct`](ScrambleText::construct).
    pub fn construct_with_rng(
        element: ElementId,
        source: impl Into<String>,
        config: &ScrambleConfig,
        rng: R,
        ctx: &mut EffectContext<'_>,
    ) -> Result<Self, ScrambleError> {
        config.validate()?;
        let alphabet = config.build_alphabet()?;
        let mut engine = ScrambleEngine::new(element, source, config.speed, alphabet, rng)?;
        if config.mode == TriggerMode::Load {
            engine.conceal();
        }

        let controller = TriggerController::new(element, config.mode, config.delay, config.margin);
        let mut text = Self {
            element,
            engine,
            controller,
            start_invocations: 0,
            destroyed: false,
        };
        let action = text.controller.attach(ctx);
        text.apply(action, ctx);
        tracing::debug!(
            element = element.get(),
            mode = ?config.mode,
            len = text.engine.source().chars().count(),
            "scramble text constructed"
        );
        Ok(text)
    }

    /// A frame was delivered to this element.
    pub fn on_frame(&mut self, ctx: &mut EffectContext<'_>) -> TickOutcome {
        if self.destroyed {
            return TickOutcome::Ignored;
        }
        match self.controller.on_frame(ctx) {
            TriggerAction::StartNow => {
                self.apply(TriggerAction::StartNow, ctx);
                TickOutcome::Continue
            }
            TriggerAction::Deferred | TriggerAction::None => self.engine.tick(ctx.frames),
        }
    }

    /// A viewport "entered" notification for this element.
    pub fn on_viewport_entered(
        &mut self,
        subscription: SubscriptionId,
        ctx: &mut EffectContext<'_>,
    ) {
        if self.destroyed {
            return;
        }
        let action = self.controller.viewport_entered(subscription, ctx);
        self.apply(action, ctx);
    }

    /// A pointer notification. Only `Enter` on this element matters.
    pub fn on_pointer(&mut self, event: PointerEvent, ctx: &mut EffectContext<'_>) {
        if self.destroyed {
            return;
        }
        if event == PointerEvent::Enter(self.element) {
            let action = self.controller.pointer_enter();
            self.apply(action, ctx);
        }
    }

    /// Replace the text. Any in-flight run is cancelled first; an armed
    /// delayed start stays armed and will scramble the new text.
    pub fn set_text(&mut self, source: impl Into<String>, ctx: &mut EffectContext<'_>) {
        if self.destroyed {
            return;
        }
        self.engine.set_source(source, ctx.frames);
        if self.controller.is_pending() {
            ctx.frames.request_next_frame(self.element);
        }
    }

    /// Release the subscription, the armed delay and the pending frame.
    ///
    /// Safe in any state; no frame or output follows.
    pub fn destroy(mut self, ctx: &mut EffectContext<'_>) {
        self.controller.detach(ctx);
        self.engine.cancel(ctx.frames);
        ctx.frames.cancel_frame(self.element);
        self.destroyed = true;
        tracing::debug!(element = self.element.get(), "scramble text destroyed");
    }

    fn apply(&mut self, action: TriggerAction, ctx: &mut EffectContext<'_>) {
        if action == TriggerAction::StartNow {
            self.start_invocations += 1;
            self.engine.start(ctx.frames);
        }
    }

    /// The element this instance is bound to.
    #[inline]
    pub fn element(&self) -> ElementId {
        self.element
    }

    /// The live display value.
    #[inline]
    pub fn value(&self) -> &str {
        self.engine.value()
    }

    /// Lifecycle state of the engine.
    #[inline]
    pub fn state(&self) -> RunState {
        self.engine.state()
    }

    /// Bound trigger mode.
    #[inline]
    pub fn mode(&self) -> TriggerMode {
        self.controller.mode()
    }

    /// Times the trigger asked the engine to start, absorbed or not.
    #[inline]
    pub fn start_invocations(&self) -> u64 {
        self.start_invocations
    }

    /// The underlying engine.
    #[inline]
    pub fn engine(&self) -> &ScrambleEngine<R> {
        &self.engine
    }

    /// The trigger controller.
    #[inline]
    pub fn controller(&self) -> &TriggerController {
        &self.controller
    }

    /// Take the engine's queued milestones.
    pub fn drain_events(&mut self) -> Vec<ScrambleEvent> {
        self.engine.drain_events()
    }
}

impl<R: SymbolSource> Drop for ScrambleText<R> {
    fn drop(&mut self) {
        if !self.destroyed && self.controller.subscription().is_some() {
            tracing::warn!(
                element = self.element.get(),
                "scramble text dropped without destroy; viewport subscription leaked"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphfall_core::{FrameQueue, FrameScheduler, Rect, ViewportTracker};
    use std::time::Duration;

    const EL: ElementId = ElementId::new(9);

    fn host() -> (FrameQueue, ViewportTracker) {
        (FrameQueue::new(), ViewportTracker::new(Rect::from_size(80, 24)))
    }

    #[test]
    fn invalid_speed_fails_without_side_effects() {
        let (mut frames, mut viewport) = host();
        let mut ctx = EffectContext::new(&mut frames, &mut viewport, Duration::ZERO);
        let config = ScrambleConfig::new(TriggerMode::Scroll).speed(-2.0);
        let err = ScrambleText::construct(EL, "TEXT", &config, &mut ctx).unwrap_err();
        assert_eq!(err, ScrambleError::InvalidSpeed(-2.0));
        assert!(frames.is_idle());
        assert_eq!(viewport.subscriber_count(), 0);
    }

    #[test]
    fn load_without_delay_starts_on_construct() {
        let (mut frames, mut viewport) = host();
        let mut ctx = EffectContext::new(&mut frames, &mut viewport, Duration::ZERO);
        let config = ScrambleConfig::new(TriggerMode::Load).seed(1);
        let text = ScrambleText::construct(EL, "HI", &config, &mut ctx).unwrap();
        assert_eq!(text.state(), RunState::Scrambling);
        assert_eq!(text.value().chars().count(), 2);
        assert_eq!(text.start_invocations(), 1);
        assert!(frames.is_frame_requested(EL));
        text.destroy(&mut EffectContext::new(&mut frames, &mut viewport, Duration::ZERO));
        assert!(frames.is_idle());
    }

    #[test]
    fn delayed_load_is_blank_until_start() {
        let (mut frames, mut viewport) = host();
        let config = ScrambleConfig::new(TriggerMode::Load)
            .delay(Duration::from_millis(32))
            .seed(1);
        let mut text = {
            let mut ctx = EffectContext::new(&mut frames, &mut viewport, Duration::ZERO);
            ScrambleText::construct(EL, "LATER", &config, &mut ctx).unwrap()
        };
        assert_eq!(text.value(), "");
        assert_eq!(text.state(), RunState::Idle);

        frames.begin_frame();
        text.on_frame(&mut EffectContext::new(
            &mut frames,
            &mut viewport,
            Duration::from_millis(16),
        ));
        assert_eq!(text.value(), "");

        frames.begin_frame();
        text.on_frame(&mut EffectContext::new(
            &mut frames,
            &mut viewport,
            Duration::from_millis(32),
        ));
        assert_eq!(text.state(), RunState::Scrambling);
        assert_eq!(text.value().chars().count(), 5);
        assert!(frames.is_frame_requested(EL));
    }

    #[test]
    fn scroll_and_hover_show_source_before_running() {
        let (mut frames, mut viewport) = host();
        let mut ctx = EffectContext::new(&mut frames, &mut viewport, Duration::ZERO);
        let scroll_config = ScrambleConfig::new(TriggerMode::Scroll);
        let scroll = ScrambleText::construct(EL, "SCROLL", &scroll_config, &mut ctx).unwrap();
        let hover = ScrambleText::construct(
            ElementId::new(10),
            "HOVER",
            &ScrambleConfig::new(TriggerMode::Hover),
            &mut ctx,
        )
        .unwrap();
        assert_eq!(scroll.value(), "SCROLL");
        assert_eq!(hover.value(), "HOVER");
        scroll.destroy(&mut ctx);
        hover.destroy(&mut ctx);
        assert_eq!(viewport.subscriber_count(), 0);
    }

    #[test]
    fn pointer_enter_for_other_element_is_ignored() {
        let (mut frames, mut viewport) = host();
        let mut ctx = EffectContext::new(&mut frames, &mut viewport, Duration::ZERO);
        let mut text =
            ScrambleText::construct(EL, "HOVER", &ScrambleConfig::new(TriggerMode::Hover), &mut ctx)
                .unwrap();
        text.on_pointer(PointerEvent::Enter(ElementId::new(77)), &mut ctx);
        text.on_pointer(PointerEvent::Leave(EL), &mut ctx);
        assert_eq!(text.start_invocations(), 0);
        text.on_pointer(PointerEvent::Enter(EL), &mut ctx);
        assert_eq!(text.start_invocations(), 1);
        assert_eq!(text.state(), RunState::Scrambling);
        text.destroy(&mut ctx);
    }

    #[test]
    fn set_text_keeps_armed_delay_alive() {
        let (mut frames, mut viewport) = host();
        let config = ScrambleConfig::new(TriggerMode::Load)
            .delay(Duration::from_millis(50))
            .seed(3);
        let mut text = {
            let mut ctx = EffectContext::new(&mut frames, &mut viewport, Duration::ZERO);
            ScrambleText::construct(EL, "FIRST", &config, &mut ctx).unwrap()
        };
        {
            let mut ctx = EffectContext::new(&mut frames, &mut viewport, Duration::from_millis(10));
            text.set_text("SECOND", &mut ctx);
        }
        assert_eq!(text.value(), "SECOND");
        assert!(frames.is_frame_requested(EL));

        frames.begin_frame();
        text.on_frame(&mut EffectContext::new(
            &mut frames,
            &mut viewport,
            Duration::from_millis(60),
        ));
        assert_eq!(text.state(), RunState::Scrambling);
        assert_eq!(text.engine().source(), "SECOND");
    }
}
