//! Sound effect playback
//!
//! The [`SfxDispatcher`] plays named [`SoundDefinition`]s through an
//! [`AudioDevice`], reusing playback slots from a pool and reclaiming
//! finished instances once per tick.
//!
//! ## Organization
//!
//! - **Definitions**: [`SoundDefinition`], [`SoundRegistry`], [`SoundBank`]
//! - **Playback**: [`SfxDispatcher`], [`SfxCommands`], [`PlayOptions`]
//! - **Output**: [`AudioDevice`], [`HeadlessDevice`], [`ChannelMixer`]

pub mod asset;
pub mod backend;
pub mod commands;
pub mod definition;
pub mod dispatcher;
pub mod gain;
pub mod instances;
pub mod mixer;
pub mod pool;
pub mod registry;
pub mod sound_bank;

#[cfg(test)]
mod tests;

pub use asset::{AudioClip, AudioFormat, ClipError};
pub use backend::headless::HeadlessDevice;
pub use backend::{AudioDevice, DeviceError, SlotId, SlotParams};
pub use commands::{PlayOptions, SfxCommand, SfxCommands};
pub use definition::{Rolloff, SoundDefinition, SoundId, SoundName};
pub use dispatcher::SfxDispatcher;
pub use instances::{EndCallback, InstanceId};
pub use mixer::ChannelMixer;
pub use pool::ResourcePool;
pub use registry::SoundRegistry;
pub use sound_bank::SoundBank;

#[cfg(feature = "rodio")]
pub use backend::rodio_backend::RodioDevice;

use crate::config::ConfigError;

/// Dispatcher errors
///
/// None of these are fatal; the failing operation is logged and becomes a
/// no-op.
#[derive(Debug, thiserror::Error)]
pub enum SfxError {
    /// No sound registered under this name
    #[error("Sound not found: {0}")]
    NotFound(String),

    /// Definition rejected at registration
    #[error("Invalid sound definition '{name}': {reason}")]
    InvalidArgument {
        /// Sound name as supplied
        name: String,
        /// What was wrong with it
        reason: String,
    },

    /// Stop targeted a sound or instance that is not playing
    #[error("No active instance of '{sound}'{}", .instance.map(|id| format!(" with id {id}")).unwrap_or_default())]
    NoActiveInstance {
        /// Sound name
        sound: String,
        /// Requested instance, if any
        instance: Option<InstanceId>,
    },

    /// Device rejected a request
    #[error("Audio device error: {0}")]
    Device(#[from] DeviceError),

    /// Sound bank or player config could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
