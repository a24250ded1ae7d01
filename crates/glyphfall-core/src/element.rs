#![forbid(unsafe_code)]

//! Element identity and pointer notifications.

use std::fmt;

/// Identity of a presentational element hosting an effect.
///
/// Frame requests, viewport subscriptions and pointer notifications are all
/// keyed by this id, never by callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(u64);

impl ElementId {
    /// Wrap a raw id.
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw id.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Pointer enter/leave notification scoped to one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    /// The pointer moved onto the element.
    Enter(ElementId),
    /// The pointer moved off the element.
    Leave(ElementId),
}

impl PointerEvent {
    /// The element this notification is scoped to.
    #[inline]
    pub const fn element(&self) -> ElementId {
        match self {
            Self::Enter(id) | Self::Leave(id) => *id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_raw() {
        let id = ElementId::new(7);
        assert_eq!(id.get(), 7);
        assert_eq!(id.to_string(), "#7");
    }

    #[test]
    fn pointer_event_element() {
        let id = ElementId::new(3);
        assert_eq!(PointerEvent::Enter(id).element(), id);
        assert_eq!(PointerEvent::Leave(id).element(), id);
    }
}
