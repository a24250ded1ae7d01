#![forbid(unsafe_code)]

//! The collaborators an effect sees while handling a notification.

use std::time::Duration;

use crate::frame::FrameScheduler;
use crate::viewport::ViewportSignal;

/// Borrowed access to the host's frame scheduler and viewport signal, plus
/// the current frame timestamp.
///
/// Effects never own their collaborators; every entry point receives one of
/// these so tests can substitute fakes and a deterministic clock.
pub struct EffectContext<'a> {
    /// Frame-callback source.
    pub frames: &'a mut dyn FrameScheduler,
    /// Viewport-entry source.
    pub viewport: &'a mut dyn ViewportSignal,
    /// Timestamp of the current frame, relative to host start.
    pub now: Duration,
}

impl<'a> EffectContext<'a> {
    /// Bundle collaborators for one dispatch.
    pub fn new(
        frames: &'a mut dyn FrameScheduler,
        viewport: &'a mut dyn ViewportSignal,
        now: Duration,
    ) -> Self {
        Self {
            frames,
            viewport,
            now,
        }
    }
}
