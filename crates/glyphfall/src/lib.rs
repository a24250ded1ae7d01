#![forbid(unsafe_code)]

//! Glyphfall public facade crate.
//!
//! Re-exports the effect types from the internal crates and offers a
//! prelude for day-to-day use.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use glyphfall_core::{
    EffectContext, ElementId, FrameQueue, FrameScheduler, HoverTracker, PointerEvent, Rect,
    SubscriptionId, SymbolSource, ThresholdMargin, ViewportEntered, ViewportSignal,
    ViewportTracker, XorShift64,
};

// --- Scramble re-exports ---------------------------------------------------

pub use glyphfall_scramble::{
    Alphabet, RunState, ScrambleConfig, ScrambleEngine, ScrambleError, ScrambleEvent,
    ScrambleText, TriggerMode,
};

// --- Reveal re-exports -----------------------------------------------------

pub use glyphfall_reveal::{
    RevealError, RevealEvent, RevealGroup, RevealItem, RevealPhase, RevealSchedule, StaggerMode,
};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "runtime")]
pub use glyphfall_runtime::{EffectEvent, FrameTicker, Stage, StageSimulator, Tick};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for glyphfall apps.
#[derive(Debug)]
pub enum Error {
    /// A scramble effect could not be constructed.
    Scramble(ScrambleError),
    /// A reveal schedule was rejected.
    Reveal(RevealError),
    /// I/O failure (ticker thread spawn, terminal).
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scramble(err) => write!(f, "scramble: {err}"),
            Self::Reveal(err) => write!(f, "reveal: {err}"),
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Scramble(err) => Some(err),
            Self::Reveal(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<ScrambleError> for Error {
    fn from(err: ScrambleError) -> Self {
        Self::Scramble(err)
    }
}

impl From<RevealError> for Error {
    fn from(err: RevealError) -> Self {
        Self::Reveal(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

/// Standard result type for glyphfall APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        ElementId, Error, PointerEvent, Rect, Result, RevealPhase, RevealSchedule, RunState,
        ScrambleConfig, ScrambleText, ThresholdMargin, TriggerMode,
    };

    #[cfg(feature = "runtime")]
    pub use crate::{FrameTicker, Stage, StageSimulator};

    pub use crate::{core, reveal, scramble};

    #[cfg(feature = "runtime")]
    pub use crate::runtime;
}

pub use glyphfall_core as core;
pub use glyphfall_reveal as reveal;
#[cfg(feature = "runtime")]
pub use glyphfall_runtime as runtime;
pub use glyphfall_scramble as scramble;

#[cfg(test)]
mod tests {
    use super::*;

    fn build(speed: f64) -> Result<ScrambleConfig> {
        let config = ScrambleConfig::default().speed(speed);
        config.validate()?;
        Ok(config)
    }

    #[test]
    fn scramble_errors_convert() {
        let err = build(-1.0).unwrap_err();
        assert!(matches!(err, Error::Scramble(ScrambleError::InvalidSpeed(_))));
        assert!(err.to_string().starts_with("scramble: "));
        assert!(std::error::Error::source(&err).is_some());
        assert!(build(0.1).is_ok());
    }

    #[test]
    fn reveal_errors_convert() {
        let items = vec![
            RevealItem::new(1, std::time::Duration::ZERO),
            RevealItem::new(0, std::time::Duration::ZERO),
        ];
        let err: Error = RevealSchedule::new(items, std::time::Duration::from_millis(10))
            .unwrap_err()
            .into();
        assert_eq!(err.to_string(), "reveal: reveal item 1 starts before item 0");
    }

    #[test]
    fn io_errors_convert() {
        let err: Error = std::io::Error::other("boom").into();
        assert_eq!(err.to_string(), "boom");
    }
}
