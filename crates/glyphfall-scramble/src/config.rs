#![forbid(unsafe_code)]

//! Construction-time configuration for a scramble instance.

use std::time::Duration;

use glyphfall_core::ThresholdMargin;

use crate::alphabet::Alphabet;
use crate::engine::{DEFAULT_SPEED, is_valid_speed};
use crate::error::ScrambleError;
use crate::trigger::TriggerMode;

/// Everything a [`ScrambleText`](crate::ScrambleText) needs besides its text.
///
/// Defaults: `Load` trigger, speed 0.04, no delay, the built-in alphabet,
/// entry once the element's top passes 80% of the viewport, and a wall-clock
/// seed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScrambleConfig {
    /// Activation policy.
    pub mode: TriggerMode,
    /// Cascade speed; larger resolves faster. Must be positive.
    pub speed: f64,
    /// Delay between trigger and run start (`Load`/`Scroll` only).
    #[cfg_attr(feature = "serde", serde(rename = "delay_ms", with = "duration_ms"))]
    pub delay: Duration,
    /// Custom symbol set. `None` uses the built-in alphabet.
    pub alphabet: Option<String>,
    /// Viewport threshold for `Scroll`.
    pub margin: ThresholdMargin,
    /// Fixed PRNG seed for reproducible symbol draws.
    pub seed: Option<u64>,
}

impl Default for ScrambleConfig {
    fn default() -> Self {
        Self {
            mode: TriggerMode::Load,
            speed: DEFAULT_SPEED,
            delay: Duration::ZERO,
            alphabet: None,
            margin: ThresholdMargin::default(),
            seed: None,
        }
    }
}

impl ScrambleConfig {
    /// Defaults with the given trigger mode.
    pub fn new(mode: TriggerMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Set the speed factor.
    #[must_use]
    pub fn speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    /// Set the start delay.
    #[must_use]
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Use a custom symbol set.
    #[must_use]
    pub fn alphabet(mut self, symbols: impl Into<String>) -> Self {
        self.alphabet = Some(symbols.into());
        self
    }

    /// Set the viewport threshold.
    #[must_use]
    pub fn margin(mut self, margin: ThresholdMargin) -> Self {
        self.margin = margin;
        self
    }

    /// Fix the PRNG seed.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check the configuration without building anything.
    ///
    /// # Errors
    ///
    /// [`ScrambleError::InvalidSpeed`] or [`ScrambleError::EmptyAlphabet`].
    pub fn validate(&self) -> Result<(), ScrambleError> {
        if !is_valid_speed(self.speed) {
            return Err(ScrambleError::InvalidSpeed(self.speed));
        }
        self.build_alphabet().map(|_| ())
    }

    pub(crate) fn build_alphabet(&self) -> Result<Alphabet, ScrambleError> {
        match &self.alphabet {
            Some(symbols) => Alphabet::new(symbols),
            None => Ok(Alphabet::default()),
        }
    }
}

#[cfg(feature = "serde")]
mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
