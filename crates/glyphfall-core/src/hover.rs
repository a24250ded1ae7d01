#![forbid(unsafe_code)]

//! Pointer hover tracking over a registry of element rectangles.
//!
//! Targets are added and removed individually as elements appear and
//! disappear, so no tree rescans are needed. [`HoverTracker::pointer_moved`]
//! turns raw pointer positions into [`PointerEvent::Enter`] /
//! [`PointerEvent::Leave`] transitions.
//!
//! # Invariants
//!
//! 1. At most one target is hovered at a time.
//! 2. Every `Enter` is eventually paired with exactly one `Leave` (on pointer
//!    exit, target removal, or [`HoverTracker::clear`]).
//! 3. When targets overlap, the most recently registered one wins.

use crate::element::{ElementId, PointerEvent};
use crate::geometry::Rect;

/// Registry of hoverable elements and the currently hovered one.
#[derive(Debug, Default)]
pub struct HoverTracker {
    targets: Vec<(ElementId, Rect)>,
    hovered: Option<ElementId>,
}

impl HoverTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `element` at `rect`. Re-registering moves it to the top.
    pub fn register(&mut self, element: ElementId, rect: Rect) {
        self.targets.retain(|(id, _)| *id != element);
        self.targets.push((element, rect));
    }

    /// Update the rectangle of an existing target without changing its
    /// stacking order. Returns whether the target was known.
    pub fn move_target(&mut self, element: ElementId, rect: Rect) -> bool {
        match self.targets.iter_mut().find(|(id, _)| *id == element) {
            Some(entry) => {
                entry.1 = rect;
                true
            }
            None => false,
        }
    }

    /// Remove `element`. Emits its `Leave` if it was hovered.
    pub fn unregister(&mut self, element: ElementId) -> Option<PointerEvent> {
        self.targets.retain(|(id, _)| *id != element);
        if self.hovered == Some(element) {
            self.hovered = None;
            return Some(PointerEvent::Leave(element));
        }
        None
    }

    /// Number of registered targets.
    #[inline]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// True when no target is registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Currently hovered element.
    #[inline]
    pub fn hovered(&self) -> Option<ElementId> {
        self.hovered
    }

    /// Topmost target containing the point.
    pub fn hit_test(&self, x: u16, y: u16) -> Option<ElementId> {
        self.targets
            .iter()
            .rev()
            .find(|(_, rect)| rect.contains(x, y))
            .map(|(id, _)| *id)
    }

    /// Feed a pointer position in document coordinates.
    ///
    /// Returns the transitions caused by the move: nothing when the hovered
    /// target is unchanged, otherwise a `Leave` for the old target followed
    /// by an `Enter` for the new one.
    pub fn pointer_moved(&mut self, x: u16, y: u16) -> Vec<PointerEvent> {
        let hit = self.hit_test(x, y);
        self.transition_to(hit)
    }

    /// The pointer left the surface entirely.
    pub fn clear(&mut self) -> Vec<PointerEvent> {
        self.transition_to(None)
    }

    fn transition_to(&mut self, next: Option<ElementId>) -> Vec<PointerEvent> {
        if next == self.hovered {
            return Vec::new();
        }
        let mut events = Vec::with_capacity(2);
        if let Some(prev) = self.hovered {
            events.push(PointerEvent::Leave(prev));
        }
        if let Some(id) = next {
            events.push(PointerEvent::Enter(id));
        }
        self.hovered = next;
        events
    }
}
