#![forbid(unsafe_code)]

//! Per-item start times for a reveal group.

use std::time::Duration;

use crate::error::RevealError;
use crate::stagger::{StaggerMode, stagger_offsets};

/// Default gap between consecutive items.
pub const DEFAULT_STAGGER_INTERVAL: Duration = Duration::from_millis(150);

/// Default time an item takes to go from hidden to revealed.
pub const DEFAULT_ITEM_DURATION: Duration = Duration::from_millis(600);

/// Timing of one item in a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealItem {
    /// Fixed delay after group entry, before stagger is added.
    pub base_delay: Duration,
    /// Multiplier of the group's stagger interval.
    pub stagger_index: u32,
    /// Length of the item's reveal once started.
    pub duration: Duration,
}

impl RevealItem {
    /// Item at stagger position `stagger_index` with no base delay.
    pub const fn new(stagger_index: u32, duration: Duration) -> Self {
        Self {
            base_delay: Duration::ZERO,
            stagger_index,
            duration,
        }
    }

    /// Set the base delay.
    #[must_use]
    pub const fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }
}

/// Validated, ordered item timings.
///
/// Start offsets (relative to group entry) are non-decreasing by index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealSchedule {
    items: Vec<RevealItem>,
    stagger_interval: Duration,
    offsets: Vec<Duration>,
}

impl RevealSchedule {
    /// Validate `items` against `stagger_interval`.
    ///
    /// # Errors
    ///
    /// [`RevealError::OutOfOrder`] naming the first item that would start
    /// before its predecessor.
    pub fn new(items: Vec<RevealItem>, stagger_interval: Duration) -> Result<Self, RevealError> {
        let offsets = start_offsets(&items, stagger_interval);
        if let Some(index) = offsets.windows(2).position(|w| w[1] < w[0]) {
            return Err(RevealError::OutOfOrder { index: index + 1 });
        }
        Ok(Self {
            items,
            stagger_interval,
            offsets,
        })
    }

    /// `count` items, item `i` at stagger position `i`, all sharing one base
    /// delay and duration.
    pub fn uniform(
        count: usize,
        base_delay: Duration,
        stagger_interval: Duration,
        duration: Duration,
    ) -> Self {
        let items = (0..count)
            .map(|i| {
                RevealItem::new(u32::try_from(i).unwrap_or(u32::MAX), duration)
                    .with_base_delay(base_delay)
            })
            .collect::<Vec<_>>();
        let offsets = start_offsets(&items, stagger_interval);
        Self {
            items,
            stagger_interval,
            offsets,
        }
    }

    /// `count` items spread over `(count - 1) * stagger_interval` by `mode`.
    ///
    /// The curve is folded into each item's base delay; every stagger index
    /// is zero.
    ///
    /// # Errors
    ///
    /// [`RevealError::OutOfOrder`] if a custom curve is not monotonic.
    pub fn eased(
        count: usize,
        base_delay: Duration,
        stagger_interval: Duration,
        duration: Duration,
        mode: StaggerMode,
    ) -> Result<Self, RevealError> {
        let items = stagger_offsets(count, stagger_interval, mode)
            .into_iter()
            .map(|offset| {
                RevealItem::new(0, duration).with_base_delay(base_delay.saturating_add(offset))
            })
            .collect();
        Self::new(items, stagger_interval)
    }

    /// Item timings in order.
    #[inline]
    pub fn items(&self) -> &[RevealItem] {
        &self.items
    }

    /// Start offset of every item relative to group entry.
    #[inline]
    pub fn start_offsets(&self) -> &[Duration] {
        &self.offsets
    }

    /// Gap per stagger index.
    #[inline]
    pub fn stagger_interval(&self) -> Duration {
        self.stagger_interval
    }

    /// Number of items.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the schedule has no items.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Offset at which the last item finishes.
    pub fn total_duration(&self) -> Duration {
        self.items
            .iter()
            .zip(&self.offsets)
            .map(|(item, start)| start.saturating_add(item.duration))
            .max()
            .unwrap_or(Duration::ZERO)
    }
}

fn start_offsets(items: &[RevealItem], stagger_interval: Duration) -> Vec<Duration> {
    items
        .iter()
        .map(|item| {
            item.base_delay
                .saturating_add(stagger_interval.saturating_mul(item.stagger_index))
        })
        .collect()
}
