#![forbid(unsafe_code)]

//! Schedule validation errors.

/// Reasons a reveal schedule is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealError {
    /// Item `index` would start before item `index - 1`.
    OutOfOrder {
        /// First offending item.
        index: usize,
    },
}

impl std::fmt::Display for RevealError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfOrder { index } => write!(
                f,
                "reveal item {index} starts before item {}",
                index.saturating_sub(1)
            ),
        }
    }
}

impl std::error::Error for RevealError {}
