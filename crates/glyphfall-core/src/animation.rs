#![forbid(unsafe_code)]

//! Easing curves and time-to-progress helpers.
//!
//! Effects here are driven by frame timestamps, not by accumulated `dt`, so
//! the only shared pieces are the easing curves and the normalisation of an
//! elapsed time against a duration.

use std::time::Duration;

/// Easing function signature: maps `t` in [0, 1] to output in [0, 1].
pub type EasingFn = fn(f32) -> f32;

/// Quadratic ease-in (slow start).
#[inline]
pub fn ease_in(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t
}

/// Quadratic ease-out (slow end).
#[inline]
pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Quadratic ease-in-out (slow start and end).
#[inline]
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// Linear progress of `elapsed` through `duration`, clamped to [0, 1].
///
/// A zero duration is complete immediately.
#[inline]
pub fn progress(elapsed: Duration, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }
    let t = elapsed.as_secs_f64() / duration.as_secs_f64();
    (t as f32).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curves_hit_endpoints() {
        for f in [ease_in as EasingFn, ease_out, ease_in_out] {
            assert_eq!(f(0.0), 0.0);
            assert!((f(1.0) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn curves_clamp_input() {
        assert_eq!(ease_out(-1.0), 0.0);
        assert_eq!(ease_in(2.0), 1.0);
    }

    #[test]
    fn ease_out_leads_ease_in() {
        assert!(ease_out(0.25) > 0.25);
        assert!(ease_in(0.25) < 0.25);
    }

    #[test]
    fn ease_in_out_midpoint() {
        assert!((ease_in_out(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn progress_normalises_and_clamps() {
        let d = Duration::from_millis(600);
        assert_eq!(progress(Duration::ZERO, d), 0.0);
        assert!((progress(Duration::from_millis(300), d) - 0.5).abs() < 1e-6);
        assert_eq!(progress(Duration::from_secs(5), d), 1.0);
        assert_eq!(progress(Duration::ZERO, Duration::ZERO), 1.0);
    }
}
