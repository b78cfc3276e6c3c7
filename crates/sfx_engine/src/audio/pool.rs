//! Slot pool
//!
//! Free list of reusable device slots. Grows whenever a slot is requested
//! from an empty pool and never shrinks until [`ResourcePool::shutdown`],
//! except for slots the device destroyed on its own, which are forgotten.
//! Free slots are reused oldest-first.

use crate::audio::backend::{AudioDevice, SlotId};
use std::collections::VecDeque;

/// Pool of reusable playback slots
#[derive(Debug, Default)]
pub struct ResourcePool {
    /// Idle slots, oldest-freed at the front
    free: VecDeque<SlotId>,
    /// Every slot this pool ever created
    created: Vec<SlotId>,
}

impl ResourcePool {
    /// Create an empty pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Create `count` idle slots up front
    pub fn prewarm<D: AudioDevice + ?Sized>(&mut self, device: &mut D, count: usize) {
        for _ in 0..count {
            let slot = self.create(device);
            self.free.push_back(slot);
        }
    }

    fn create<D: AudioDevice + ?Sized>(&mut self, device: &mut D) -> SlotId {
        let slot = device.create_slot();
        self.created.push(slot);
        log::debug!("Created playback slot {slot:?} ({} total)", self.created.len());
        slot
    }

    /// Take an idle slot, creating one if none is free
    ///
    /// Idle slots the device no longer knows are skipped and forgotten.
    pub fn acquire<D: AudioDevice + ?Sized>(&mut self, device: &mut D) -> SlotId {
        while let Some(slot) = self.free.pop_front() {
            if device.contains_slot(slot) {
                return slot;
            }
            self.forget(slot);
        }
        self.create(device)
    }

    /// Return a slot to the pool, stopping its output first
    ///
    /// Releasing a slot that is already pooled only stops it again. A slot
    /// the device has destroyed is dropped instead of pooled.
    pub fn release<D: AudioDevice + ?Sized>(&mut self, device: &mut D, slot: SlotId) {
        if !device.contains_slot(slot) {
            self.forget(slot);
            return;
        }

        if device.is_playing(slot) {
            device.stop(slot);
        }

        if self.free.contains(&slot) {
            log::warn!("Playback slot {slot:?} released twice");
            return;
        }
        self.free.push_back(slot);
    }

    fn forget(&mut self, slot: SlotId) {
        self.created.retain(|&created| created != slot);
        self.free.retain(|&free| free != slot);
        log::warn!("Playback slot {slot:?} was destroyed by the device, dropping it from the pool");
    }

    /// Destroy every slot this pool created, pooled or in flight
    pub fn shutdown<D: AudioDevice + ?Sized>(&mut self, device: &mut D) {
        for slot in self.created.drain(..) {
            device.stop(slot);
            device.destroy_slot(slot);
        }
        self.free.clear();
    }

    /// Number of idle slots
    pub fn len(&self) -> usize {
        self.free.len()
    }

    /// Check if no slot is idle
    pub fn is_empty(&self) -> bool {
        self.free.is_empty()
    }

    /// Number of slots created so far
    pub fn created(&self) -> usize {
        self.created.len()
    }
}
