#![forbid(unsafe_code)]

//! Construction errors.

/// Reasons a scramble effect cannot be constructed.
#[derive(Debug, Clone, PartialEq)]
pub enum ScrambleError {
    /// Speed factor was not positive, or so small the cascade never ends.
    InvalidSpeed(f64),
    /// The symbol alphabet had no symbols to draw from.
    EmptyAlphabet,
}

impl std::fmt::Display for ScrambleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSpeed(speed) => {
                write!(f, "speed factor must be positive and finite, got {speed}")
            }
            Self::EmptyAlphabet => write!(f, "scramble alphabet is empty"),
        }
    }
}

impl std::error::Error for ScrambleError {}
