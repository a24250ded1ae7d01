#![forbid(unsafe_code)]

//! Frame scheduling: one-shot "call me on the next frame" requests.
//!
//! A [`FrameScheduler`] delivers at most one callback per request. Effects
//! that want to keep animating must re-request from inside their frame
//! callback; forgetting to do so stalls the effect silently.
//!
//! Callbacks are addressed by [`ElementId`] rather than stored closures. The
//! host drains the due targets with [`FrameQueue::begin_frame`] and routes
//! each one to the effect it owns.
//!
//! # Invariants
//!
//! 1. Requesting the same target twice before a frame yields one callback.
//! 2. Requests made while a frame is being dispatched are due on the *next*
//!    frame, never the current one.
//! 3. A cancelled request is never delivered.

use crate::element::ElementId;

/// Source of display-refresh callbacks.
pub trait FrameScheduler {
    /// Ask for one callback for `target` on the next frame.
    fn request_next_frame(&mut self, target: ElementId);

    /// Withdraw a pending request. Returns whether one was pending.
    fn cancel_frame(&mut self, target: ElementId) -> bool;

    /// Whether `target` has a pending request.
    fn is_frame_requested(&self, target: ElementId) -> bool;
}

/// Single-threaded [`FrameScheduler`] backed by an ordered pending list.
///
/// Delivery order within a frame follows request order.
#[derive(Debug, Default)]
pub struct FrameQueue {
    pending: Vec<ElementId>,
    frames: u64,
    delivered: u64,
}

impl FrameQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new frame, returning the targets due on it.
    ///
    /// The pending list is cleared, so every returned target must request
    /// again to be called on the following frame.
    pub fn begin_frame(&mut self) -> Vec<ElementId> {
        self.frames += 1;
        let due = std::mem::take(&mut self.pending);
        self.delivered += due.len() as u64;
        crate::trace!(frame = self.frames, due = due.len(), "frame begin");
        due
    }

    /// Number of frames begun so far.
    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Total callbacks handed out across all frames.
    #[inline]
    pub fn delivered_count(&self) -> u64 {
        self.delivered
    }

    /// Number of targets waiting for the next frame.
    #[inline]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// True when no target is waiting for a frame.
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }
}

impl FrameScheduler for FrameQueue {
    fn request_next_frame(&mut self, target: ElementId) {
        if !self.pending.contains(&target) {
            self.pending.push(target);
        }
    }

    fn cancel_frame(&mut self, target: ElementId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| *t != target);
        before != self.pending.len()
    }

    fn is_frame_requested(&self, target: ElementId) -> bool {
        self.pending.contains(&target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: ElementId = ElementId::new(1);
    const B: ElementId = ElementId::new(2);

    #[test]
    fn empty_queue_is_idle() {
        let mut q = FrameQueue::new();
        assert!(q.is_idle());
        assert!(q.begin_frame().is_empty());
        assert_eq!(q.frame_count(), 1);
    }

    #[test]
    fn duplicate_requests_collapse() {
        let mut q = FrameQueue::new();
        q.request_next_frame(A);
        q.request_next_frame(A);
        assert_eq!(q.pending_len(), 1);
        assert_eq!(q.begin_frame(), vec![A]);
    }

    #[test]
    fn requests_are_one_shot() {
        let mut q = FrameQueue::new();
        q.request_next_frame(A);
        assert_eq!(q.begin_frame(), vec![A]);
        assert!(q.begin_frame().is_empty());
    }

    #[test]
    fn delivery_follows_request_order() {
        let mut q = FrameQueue::new();
        q.request_next_frame(B);
        q.request_next_frame(A);
        assert_eq!(q.begin_frame(), vec![B, A]);
        assert_eq!(q.delivered_count(), 2);
    }

    #[test]
    fn re_request_during_dispatch_lands_on_next_frame() {
        let mut q = FrameQueue::new();
        q.request_next_frame(A);
        let due = q.begin_frame();
        for target in due {
            q.request_next_frame(target);
        }
        assert!(q.is_frame_requested(A));
        assert_eq!(q.begin_frame(), vec![A]);
    }

    #[test]
    fn cancel_removes_pending() {
        let mut q = FrameQueue::new();
        q.request_next_frame(A);
        q.request_next_frame(B);
        assert!(q.cancel_frame(A));
        assert!(!q.cancel_frame(A));
        assert!(!q.is_frame_requested(A));
        assert_eq!(q.begin_frame(), vec![B]);
    }
}
