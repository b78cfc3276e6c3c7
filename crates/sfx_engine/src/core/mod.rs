//! # Core Module
//!
//! Shared configuration for standing up the sound effect player.
//!
//! ## Organization
//!
//! - **Config**: Player configuration (mixer channels, slot pre-warm, sound banks)
//! - **Foundation**: Low-level utilities (math, logging)

pub mod config;

// Re-export foundation modules for convenience
pub use crate::foundation;

pub use config::{ChannelConfig, Config, ConfigError, SfxPlayerConfig};
