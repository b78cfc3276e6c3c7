//! Sound registry
//!
//! Name to definition lookup. Registration can happen any number of times;
//! later definitions replace earlier ones with the same name.

use crate::audio::definition::{SoundDefinition, SoundId};
use crate::audio::SfxError;
use std::collections::HashMap;
use std::sync::Arc;

/// Registered sound definitions keyed by name
#[derive(Debug, Default)]
pub struct SoundRegistry {
    sounds: HashMap<String, Arc<SoundDefinition>>,
    next_id: u32,
}

impl SoundRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> SoundId {
        let id = SoundId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Register definitions, overwriting by name
    ///
    /// Numeric parameters are clamped into range. Invalid definitions (empty
    /// name, no clips, min distance above max) are logged and skipped.
    /// Re-registering a definition with unchanged parameters keeps its
    /// identity, so instances already playing stay addressable.
    ///
    /// Returns the number of definitions accepted.
    pub fn register<I>(&mut self, definitions: I) -> usize
    where
        I: IntoIterator<Item = SoundDefinition>,
    {
        let mut accepted = 0;
        for definition in definitions {
            let definition = definition.clamped();
            if let Some(reason) = definition.invalid_reason() {
                let err = SfxError::InvalidArgument {
                    name: definition.name().to_string(),
                    reason: reason.to_string(),
                };
                log::error!("Skipping sound definition: {err}");
                continue;
            }

            accepted += 1;
            if let Some(existing) = self.sounds.get(definition.name()) {
                if existing.same_parameters(&definition) {
                    continue;
                }
                log::debug!("Replacing sound definition '{}'", definition.name());
            }

            let id = self.next_id();
            let definition = definition.with_id(id);
            self.sounds.insert(definition.name().to_string(), Arc::new(definition));
        }
        accepted
    }

    /// Look up a sound by name
    ///
    /// # Errors
    /// - `NotFound` if no sound with this name is registered
    pub fn lookup(&self, name: &str) -> Result<Arc<SoundDefinition>, SfxError> {
        self.sounds
            .get(name)
            .cloned()
            .ok_or_else(|| SfxError::NotFound(name.to_string()))
    }

    /// Borrow a sound by name
    pub fn get(&self, name: &str) -> Option<&Arc<SoundDefinition>> {
        self.sounds.get(name)
    }

    /// Check if a name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.sounds.contains_key(name)
    }

    /// Number of registered sounds
    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.sounds.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
