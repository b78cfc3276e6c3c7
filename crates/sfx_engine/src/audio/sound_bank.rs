//! Sound banks
//!
//! A bank is a named, serialized collection of sound definitions. Banks are
//! the file format for feeding the registry; they are loaded with the
//! [`Config`](crate::config::Config) trait from `.ron` or `.toml`.

use crate::audio::definition::SoundDefinition;
use crate::config::Config;
use serde::{Deserialize, Serialize};

/// Named collection of sound definitions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundBank {
    /// Bank name, for logging
    pub name: String,
    /// Definitions in registration order
    pub sounds: Vec<SoundDefinition>,
}

impl Config for SoundBank {}

impl SoundBank {
    /// Create an empty bank
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            sounds: Vec::new(),
        }
    }

    /// Add a definition, replacing any with the same name
    pub fn add_or_update(&mut self, definition: SoundDefinition) {
        match self.sounds.iter_mut().find(|sound| sound.name() == definition.name()) {
            Some(existing) => *existing = definition,
            None => self.sounds.push(definition),
        }
    }

    /// Builder form of [`SoundBank::add_or_update`]
    pub fn with_sound(mut self, definition: SoundDefinition) -> Self {
        self.add_or_update(definition);
        self
    }

    /// Find a definition by name
    pub fn get(&self, name: &str) -> Option<&SoundDefinition> {
        self.sounds.iter().find(|sound| sound.name() == name)
    }

    /// Number of definitions
    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    /// Check if the bank is empty
    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }
}
