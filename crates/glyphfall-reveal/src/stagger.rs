#![forbid(unsafe_code)]

//! Stagger offsets: when each item of a group starts, relative to the first.
//!
//! # Invariants
//!
//! 1. `stagger_offsets(0, ..)` is empty.
//! 2. The first offset is `Duration::ZERO`.
//! 3. Offsets are non-decreasing in every built-in mode.
//! 4. For `Linear`, `offset[i] = i * interval`, computed without floats.
//! 5. For the eased modes the span is still `(count - 1) * interval`; only
//!    the distribution inside it follows the curve.

use std::time::Duration;

use glyphfall_core::animation::{EasingFn, ease_in, ease_in_out, ease_out};

/// How start offsets are spread across a group.
#[derive(Debug, Clone, Copy, Default)]
pub enum StaggerMode {
    /// Equal spacing.
    #[default]
    Linear,
    /// Gaps widen towards the end.
    EaseIn,
    /// Gaps narrow towards the end.
    EaseOut,
    /// Narrow gaps at both ends, wide in the middle.
    EaseInOut,
    /// Caller-supplied curve over the normalised position. Must be
    /// non-decreasing for the result to form a valid schedule.
    Custom(EasingFn),
}

/// Start offsets for `count` items spaced by `interval`.
#[must_use]
pub fn stagger_offsets(count: usize, interval: Duration, mode: StaggerMode) -> Vec<Duration> {
    if count == 0 {
        return Vec::new();
    }
    if count == 1 {
        return vec![Duration::ZERO];
    }

    let easing: EasingFn = match mode {
        StaggerMode::Linear => {
            return (0..count)
                .map(|i| interval.saturating_mul(u32::try_from(i).unwrap_or(u32::MAX)))
                .collect();
        }
        StaggerMode::EaseIn => ease_in,
        StaggerMode::EaseOut => ease_out,
        StaggerMode::EaseInOut => ease_in_out,
        StaggerMode::Custom(f) => f,
    };

    let span = interval.as_nanos() as f64 * (count - 1) as f64;
    (0..count)
        .map(|i| {
            let t = i as f32 / (count - 1) as f32;
            Duration::from_nanos((span * f64::from(easing(t))) as u64)
        })
        .collect()
}
