//! Active instance bookkeeping
//!
//! Two-level table: sound identity, then instance id, then the instance.
//! An outer entry exists only while it holds at least one instance.

use crate::audio::backend::SlotId;
use crate::audio::definition::{SoundDefinition, SoundId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Identifier of one playing instance
///
/// Handed out by the dispatcher from a monotonic counter; never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(u64);

impl InstanceId {
    /// Raw numeric value
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Completion callback, fired once when an instance finishes on its own
pub type EndCallback = Box<dyn FnOnce()>;

/// One currently playing use of a sound
pub struct ActiveInstance {
    id: InstanceId,
    sound: Arc<SoundDefinition>,
    slot: SlotId,
    on_end: Option<EndCallback>,
}

impl ActiveInstance {
    /// Create an instance record
    pub fn new(id: InstanceId, sound: Arc<SoundDefinition>, slot: SlotId, on_end: Option<EndCallback>) -> Self {
        Self { id, sound, slot, on_end }
    }

    /// Instance id
    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// Definition being played
    pub fn sound(&self) -> &Arc<SoundDefinition> {
        &self.sound
    }

    /// Slot the instance plays through
    pub fn slot(&self) -> SlotId {
        self.slot
    }

    /// Check if a completion callback is attached
    pub fn has_callback(&self) -> bool {
        self.on_end.is_some()
    }

    /// Split into definition, slot and callback
    pub fn into_parts(self) -> (Arc<SoundDefinition>, SlotId, Option<EndCallback>) {
        (self.sound, self.slot, self.on_end)
    }
}

impl fmt::Debug for ActiveInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveInstance")
            .field("id", &self.id)
            .field("sound", &self.sound.name())
            .field("slot", &self.slot)
            .field("has_callback", &self.on_end.is_some())
            .finish()
    }
}

/// Every playing instance, grouped by sound
#[derive(Debug, Default)]
pub struct ActiveInstanceTable {
    entries: HashMap<SoundId, HashMap<InstanceId, ActiveInstance>>,
    next_id: u64,
}

impl ActiveInstanceTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next instance id
    pub fn next_instance_id(&mut self) -> InstanceId {
        let id = InstanceId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Insert an instance under its sound
    pub fn insert(&mut self, instance: ActiveInstance) {
        let sound = instance.sound.id();
        let previous = self
            .entries
            .entry(sound)
            .or_insert_with(|| HashMap::with_capacity(3))
            .insert(instance.id, instance);
        debug_assert!(previous.is_none(), "instance id reused while alive");
    }

    /// Check if a sound has any live instance
    pub fn contains(&self, sound: SoundId) -> bool {
        self.entries.contains_key(&sound)
    }

    /// Number of live instances of a sound
    pub fn count(&self, sound: SoundId) -> usize {
        self.entries.get(&sound).map_or(0, |instances| instances.len())
    }

    /// Look up one instance
    pub fn get(&self, sound: SoundId, id: InstanceId) -> Option<&ActiveInstance> {
        self.entries.get(&sound)?.get(&id)
    }

    /// Remove one instance, dropping the sound's entry once it is empty
    pub fn remove(&mut self, sound: SoundId, id: InstanceId) -> Option<ActiveInstance> {
        let instances = self.entries.get_mut(&sound)?;
        let removed = instances.remove(&id);
        if instances.is_empty() {
            self.entries.remove(&sound);
        }
        removed
    }

    /// Remove every instance of a sound, oldest first
    pub fn remove_all(&mut self, sound: SoundId) -> Vec<ActiveInstance> {
        let mut removed: Vec<ActiveInstance> = self
            .entries
            .remove(&sound)
            .map(|instances| instances.into_values().collect())
            .unwrap_or_default();
        removed.sort_by_key(ActiveInstance::id);
        removed
    }

    /// Remove everything, oldest first
    pub fn drain(&mut self) -> Vec<ActiveInstance> {
        let mut removed: Vec<ActiveInstance> = self
            .entries
            .drain()
            .flat_map(|(_, instances)| instances.into_values())
            .collect();
        removed.sort_by_key(ActiveInstance::id);
        removed
    }

    /// Iterate over all live instances in no particular order
    pub fn iter(&self) -> impl Iterator<Item = &ActiveInstance> {
        self.entries.values().flat_map(|instances| instances.values())
    }

    /// Total live instances
    pub fn len(&self) -> usize {
        self.entries.values().map(|instances| instances.len()).sum()
    }

    /// Check if nothing is playing
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of sounds with at least one live instance
    pub fn sound_count(&self) -> usize {
        self.entries.len()
    }
}
