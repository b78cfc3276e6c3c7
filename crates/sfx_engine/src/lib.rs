//! # SFX Engine
//!
//! Sound effect dispatch for games: named sound definitions played through a
//! pooled set of device slots, with per-sound concurrency limits, completion
//! callbacks, mixer channel control and a once-per-tick liveness sweep.
//!
//! ## Features
//!
//! - **Slot Pooling**: Playback slots are reused instead of created per play
//! - **Concurrency Limits**: Per-sound instance caps with overlay/replace semantics
//! - **Completion Callbacks**: Fired exactly once when a sound finishes on its own
//! - **Notifications**: Started / stopped / volume changed fan-out
//! - **Pluggable Output**: Headless simulation device, or Rodio with the `rodio` feature
//!
//! ## Quick Start
//!
//! ```rust
//! use sfx_engine::prelude::*;
//!
//! let device = HeadlessDevice::new(ChannelMixer::with_channels(["Sfx"])).with_default_clip_length(0.5);
//! let mut sfx = SfxDispatcher::new(device);
//! sfx.register([SoundDefinition::new("click", "click.wav").with_channel("Sfx")]);
//!
//! let commands = sfx.commands();
//! sfx.play("click", PlayOptions::default().on_end(move || commands.play("click", PlayOptions::default())))
//!     .unwrap();
//!
//! for _ in 0..40 {
//!     sfx.device_mut().advance(1.0 / 60.0);
//!     sfx.update();
//! }
//! assert!(sfx.is_playing("click"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core modules
pub mod core;
pub mod config;
pub mod foundation;

// Playback
pub mod audio;
pub mod events;

/// Common imports for sfx engine users
pub mod prelude {
    pub use crate::{
        audio::{
            AudioDevice, ChannelMixer, HeadlessDevice, InstanceId, PlayOptions, SfxCommands,
            SfxDispatcher, SfxError, SoundBank, SoundDefinition, SoundName,
        },
        core::config::{ChannelConfig, SfxPlayerConfig},
        config::Config,
        events::{SfxEvent, SfxEventType},
        foundation::math::Vec3,
    };
}
