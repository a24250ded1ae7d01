#![forbid(unsafe_code)]

//! Hosting for glyphfall effects.
//!
//! - [`Stage`]: the single logical worker that owns every effect and routes
//!   frame, viewport and pointer notifications to it.
//! - [`FrameTicker`]: a background thread sending [`Tick`]s over a channel,
//!   for driving a stage in real time.
//! - [`StageSimulator`]: a fixed-step, thread-free driver for tests.

pub mod simulator;
pub mod stage;
pub mod ticker;

pub use simulator::StageSimulator;
pub use stage::{Effect, EffectEvent, Stage};
pub use ticker::{DEFAULT_FRAME_INTERVAL, FrameTicker, Tick};
