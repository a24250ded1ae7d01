#![forbid(unsafe_code)]

//! Text-decode scramble effect.
//!
//! A [`ScrambleText`] shows a string that starts as random decorative
//! symbols and resolves left to right into its source text, one frame at a
//! time. When a run begins is decided by its [`TriggerMode`]: immediately on
//! mount, on first viewport entry, or on every pointer enter.
//!
//! # Example
//!
//! ```ignore
//! use glyphfall_core::{ElementId, EffectContext, FrameQueue, Rect, ViewportTracker};
//! use glyphfall_scramble::{ScrambleConfig, ScrambleText, TriggerMode};
//!
//! let mut frames = FrameQueue::new();
//! let mut viewport = ViewportTracker::new(Rect::from_size(80, 24));
//! let mut ctx = EffectContext::new(&mut frames, &mut viewport, Duration::ZERO);
//!
//! let config = ScrambleConfig::new(TriggerMode::Load).speed(0.05);
//! let mut text = ScrambleText::construct(ElementId::new(1), "SYSTEMS ONLINE", &config, &mut ctx)?;
//! // ...on every frame delivered to element 1:
//! text.on_frame(&mut ctx);
//! println!("{}", text.value());
//! ```

pub mod alphabet;
pub mod config;
pub mod engine;
pub mod error;
pub mod state;
pub mod text;
pub mod trigger;

pub use alphabet::Alphabet;
pub use config::ScrambleConfig;
pub use engine::{ScrambleEngine, ScrambleEvent, TickOutcome};
pub use error::ScrambleError;
pub use state::{RunEvent, RunState};
pub use text::ScrambleText;
pub use trigger::{TriggerAction, TriggerController, TriggerMode};
