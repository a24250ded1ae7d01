#![forbid(unsafe_code)]

//! Viewport entry notifications.
//!
//! A [`ViewportSignal`] reports, once per live subscription, that an element
//! crossed a visibility threshold. [`ViewportTracker`] implements it against
//! a scrolling viewport over a document of element rectangles.
//!
//! # Invariants
//!
//! 1. A subscription is delivered at most once for its whole lifetime.
//! 2. Unsubscribed ids are never delivered, even if their element is visible.
//! 3. Elements without a known layout never enter.
//!
//! # Failure Modes
//!
//! - Unsubscribing an unknown id is a no-op returning `false`.
//! - Forgetting to unsubscribe leaks a slot per subscriber; owners must
//!   unsubscribe on teardown even when the subscription never fired.

use std::collections::HashMap;

use crate::element::ElementId;
use crate::geometry::Rect;

/// Handle for one viewport subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// The raw id.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// How far into the viewport an element must be before it counts as entered.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ThresholdMargin {
    /// Entered once the element's top edge rises above this fraction of the
    /// viewport height, measured from the viewport top, while its bottom
    /// edge is still below the viewport top.
    Fraction(f32),
    /// Entered once the element intersects the viewport shrunk by this many
    /// rows at top and bottom.
    Inset(u16),
}

impl Default for ThresholdMargin {
    fn default() -> Self {
        Self::Fraction(0.8)
    }
}

impl ThresholdMargin {
    /// Whether `element` counts as entered for `viewport`.
    pub fn is_entered(&self, element: &Rect, viewport: &Rect) -> bool {
        if element.is_empty() || viewport.is_empty() {
            return false;
        }
        match *self {
            Self::Fraction(fraction) => {
                let fraction = fraction.clamp(0.0, 1.0);
                let line = viewport.top() as f32 + fraction * viewport.height as f32;
                (element.top() as f32) < line && element.bottom() > viewport.top()
            }
            Self::Inset(rows) => {
                let shrunk = viewport.inset_vertical(rows);
                !shrunk.is_empty() && element.intersection_opt(&shrunk).is_some()
            }
        }
    }
}

/// An "entered" notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportEntered {
    /// The subscription being notified.
    pub subscription: SubscriptionId,
    /// The element that entered.
    pub element: ElementId,
}

/// Source of viewport-entry notifications.
pub trait ViewportSignal {
    /// Subscribe to the first entry of `element` past `margin`.
    fn subscribe(&mut self, element: ElementId, margin: ThresholdMargin) -> SubscriptionId;

    /// Stop delivery for `id`. Returns whether it was live.
    fn unsubscribe(&mut self, id: SubscriptionId) -> bool;

    /// Whether `id` is still live.
    fn is_subscribed(&self, id: SubscriptionId) -> bool;
}

#[derive(Debug, Clone)]
struct Subscriber {
    id: SubscriptionId,
    element: ElementId,
    margin: ThresholdMargin,
    delivered: bool,
}

/// [`ViewportSignal`] over a scrolling viewport and a layout map.
#[derive(Debug)]
pub struct ViewportTracker {
    viewport: Rect,
    layout: HashMap<ElementId, Rect>,
    subscribers: Vec<Subscriber>,
    next_id: u64,
}

impl ViewportTracker {
    /// Create a tracker with the given initial viewport.
    pub fn new(viewport: Rect) -> Self {
        Self {
            viewport,
            layout: HashMap::new(),
            subscribers: Vec::new(),
            next_id: 1,
        }
    }

    /// Current viewport rectangle in document coordinates.
    #[inline]
    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Replace the viewport (scroll or resize).
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
    }

    /// Scroll so the viewport top sits at document row `y`.
    pub fn scroll_to(&mut self, y: u16) {
        self.viewport = self.viewport.with_y(y);
    }

    /// Record or update the layout of `element`.
    pub fn place(&mut self, element: ElementId, rect: Rect) {
        self.layout.insert(element, rect);
    }

    /// Forget the layout of `element`. Its subscriptions stay live.
    pub fn remove_element(&mut self, element: ElementId) -> Option<Rect> {
        self.layout.remove(&element)
    }

    /// Layout of `element`, if placed.
    pub fn layout_of(&self, element: ElementId) -> Option<Rect> {
        self.layout.get(&element).copied()
    }

    /// Number of live subscriptions, delivered or not.
    #[inline]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Evaluate every undelivered subscription against the current viewport.
    ///
    /// Returns the newly entered ones in subscription order and marks them
    /// delivered.
    pub fn poll(&mut self) -> Vec<ViewportEntered> {
        let mut entered = Vec::new();
        for sub in self.subscribers.iter_mut().filter(|s| !s.delivered) {
            let Some(rect) = self.layout.get(&sub.element) else {
                continue;
            };
            if sub.margin.is_entered(rect, &self.viewport) {
                sub.delivered = true;
                crate::debug!(
                    subscription = sub.id.get(),
                    element = sub.element.get(),
                    "viewport entered"
                );
                entered.push(ViewportEntered {
                    subscription: sub.id,
                    element: sub.element,
                });
            }
        }
        entered
    }
}

impl ViewportSignal for ViewportTracker {
    fn subscribe(&mut self, element: ElementId, margin: ThresholdMargin) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push(Subscriber {
            id,
            element,
            margin,
            delivered: false,
        });
        crate::trace!(subscription = id.get(), element = element.get(), "viewport subscribe");
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        let removed = before != self.subscribers.len();
        if removed {
            crate::trace!(subscription = id.get(), "viewport unsubscribe");
        }
        removed
    }

    fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.subscribers.iter().any(|s| s.id == id)
    }
}
