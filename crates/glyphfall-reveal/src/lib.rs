#![forbid(unsafe_code)]

//! Staggered reveals for groups of ordinary elements.
//!
//! A [`RevealGroup`] waits for one viewport entry of its container, then
//! starts each item at `base_delay + stagger_index * stagger_interval` after
//! that moment. Every item is revealed exactly once per group lifetime, no
//! matter how the container's visibility changes afterwards.

pub mod choreographer;
pub mod error;
pub mod schedule;
pub mod stagger;

pub use choreographer::{DEFAULT_REVEAL_MARGIN, RevealEvent, RevealGroup, RevealPhase};
pub use error::RevealError;
pub use schedule::{DEFAULT_ITEM_DURATION, DEFAULT_STAGGER_INTERVAL, RevealItem, RevealSchedule};
pub use stagger::{StaggerMode, stagger_offsets};
