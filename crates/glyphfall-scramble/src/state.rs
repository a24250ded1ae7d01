#![forbid(unsafe_code)]

//! Run-state machine for one scramble instance.
//!
//! | from \ event | Start      | Complete | Cancel   |
//! |--------------|------------|----------|----------|
//! | Idle         | Scrambling | Idle     | Idle     |
//! | Scrambling   | Scrambling | Resolved | Idle     |
//! | Resolved     | Scrambling | Resolved | Resolved |
//!
//! `Start` while `Scrambling` is absorbed: at most one run is in flight.

/// Where an instance is in its run lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    /// No run has started, or the last one was cancelled.
    #[default]
    Idle,
    /// A run is in flight and ticking.
    Scrambling,
    /// The last run finished; the display equals the source text.
    Resolved,
}

/// Inputs to the run-state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEvent {
    /// A run was requested.
    Start,
    /// Every position resolved.
    Complete,
    /// The run was torn down or its source replaced.
    Cancel,
}

impl RunState {
    /// Apply the transition table.
    #[must_use]
    pub const fn next(self, event: RunEvent) -> Self {
        match (self, event) {
            (_, RunEvent::Start) => Self::Scrambling,
            (Self::Scrambling, RunEvent::Complete) => Self::Resolved,
            (Self::Scrambling, RunEvent::Cancel) => Self::Idle,
            (state, _) => state,
        }
    }

    /// Whether a `Start` in this state begins a new run (rather than being
    /// absorbed by one already in flight).
    #[inline]
    pub const fn accepts_start(self) -> bool {
        !matches!(self, Self::Scrambling)
    }

    /// Whether a run is in flight.
    #[inline]
    pub const fn is_scrambling(self) -> bool {
        matches!(self, Self::Scrambling)
    }
}
