#![forbid(unsafe_code)]

//! Core: element identity, geometry, and the collaborators every effect is
//! driven by (frame scheduling, viewport entry, pointer hover).

pub mod animation;
pub mod context;
pub mod element;
pub mod frame;
pub mod geometry;
pub mod hover;
pub mod logging;
pub mod rng;
pub mod viewport;

pub use context::EffectContext;
pub use element::{ElementId, PointerEvent};
pub use frame::{FrameQueue, FrameScheduler};
pub use geometry::Rect;
pub use hover::HoverTracker;
pub use rng::{SymbolSource, XorShift64};
pub use viewport::{
    SubscriptionId, ThresholdMargin, ViewportEntered, ViewportSignal, ViewportTracker,
};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, error, info, trace, warn};
