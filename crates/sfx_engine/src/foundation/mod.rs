//! Foundation module - Core utilities and types
//!
//! Small shared building blocks used throughout the engine:
//! - Math types for world-space positions
//! - Logging setup

pub mod math;
pub mod logging;
