//! Headless audio device
//!
//! Simulates playback without producing samples. Each clip has a known
//! length; [`HeadlessDevice::advance`] moves every playing slot forward and
//! stops non-looping slots that reach the end of their clip. Useful for
//! servers, CI and deterministic tests.

use super::{AudioDevice, DeviceError, SlotId, SlotParams};
use crate::audio::mixer::ChannelMixer;
use crate::foundation::math::Vec3;
use slotmap::SlotMap;
use std::collections::HashMap;

#[derive(Debug, Default)]
struct HeadlessSlot {
    params: Option<SlotParams>,
    position: Option<Vec3>,
    /// Clip length in seconds, resolved at play time
    length: f32,
    /// Seconds of clip consumed so far
    elapsed: f32,
    playing: bool,
}

/// Simulated audio device
pub struct HeadlessDevice {
    slots: SlotMap<SlotId, HeadlessSlot>,
    clip_lengths: HashMap<String, f32>,
    /// Length used for clips without an explicit entry
    default_clip_length: Option<f32>,
    mixer: ChannelMixer,
}

impl HeadlessDevice {
    /// Create a headless device with the given mixer channels
    pub fn new(mixer: ChannelMixer) -> Self {
        Self {
            slots: SlotMap::with_key(),
            clip_lengths: HashMap::new(),
            default_clip_length: None,
            mixer,
        }
    }

    /// Give every unknown clip this length instead of refusing to play it
    pub fn with_default_clip_length(mut self, seconds: f32) -> Self {
        self.default_clip_length = Some(seconds.max(0.0));
        self
    }

    /// Register a clip and its length in seconds
    pub fn with_clip<S: Into<String>>(mut self, clip: S, seconds: f32) -> Self {
        self.set_clip_length(clip, seconds);
        self
    }

    /// Register or replace a clip length
    pub fn set_clip_length<S: Into<String>>(&mut self, clip: S, seconds: f32) {
        self.clip_lengths.insert(clip.into(), seconds.max(0.0));
    }

    fn clip_length(&self, clip: &str) -> Option<f32> {
        self.clip_lengths.get(clip).copied().or(self.default_clip_length)
    }

    /// Advance simulated time by `dt` seconds
    ///
    /// Pitch scales playback speed; a pitch of zero stalls the slot.
    pub fn advance(&mut self, dt: f32) {
        for slot in self.slots.values_mut().filter(|slot| slot.playing) {
            let Some(params) = slot.params.as_ref() else {
                continue;
            };
            slot.elapsed += dt * params.pitch.abs();
            if slot.elapsed < slot.length {
                continue;
            }
            if params.looping && slot.length > 0.0 {
                slot.elapsed %= slot.length;
            } else {
                slot.playing = false;
            }
        }
    }

    /// Number of live slots (pooled or in use)
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots currently playing
    pub fn playing_count(&self) -> usize {
        self.slots.values().filter(|slot| slot.playing).count()
    }

    /// Last parameters applied to a slot
    pub fn params(&self, slot: SlotId) -> Option<&SlotParams> {
        self.slots.get(slot).and_then(|slot| slot.params.as_ref())
    }

    /// Current world position of a slot (`None` = local origin)
    pub fn position(&self, slot: SlotId) -> Option<Vec3> {
        self.slots.get(slot).and_then(|slot| slot.position)
    }

    /// Mixer channel table
    pub fn mixer(&self) -> &ChannelMixer {
        &self.mixer
    }
}

impl AudioDevice for HeadlessDevice {
    fn create_slot(&mut self) -> SlotId {
        self.slots.insert(HeadlessSlot::default())
    }

    fn destroy_slot(&mut self, slot: SlotId) {
        self.slots.remove(slot);
    }

    fn contains_slot(&self, slot: SlotId) -> bool {
        self.slots.contains_key(slot)
    }

    fn configure(&mut self, slot: SlotId, params: &SlotParams) {
        if let Some(slot) = self.slots.get_mut(slot) {
            slot.params = Some(params.clone());
        }
    }

    fn set_slot_position(&mut self, slot: SlotId, position: Option<Vec3>) {
        if let Some(slot) = self.slots.get_mut(slot) {
            slot.position = position;
        }
    }

    fn play(&mut self, slot: SlotId) {
        let Some(clip) = self
            .slots
            .get(slot)
            .and_then(|slot| slot.params.as_ref())
            .map(|params| params.clip.clone())
        else {
            log::warn!("Headless device: play on unconfigured or unknown slot {slot:?}");
            return;
        };

        let Some(length) = self.clip_length(&clip) else {
            log::error!("Headless device: unknown clip '{clip}'");
            return;
        };

        if let Some(slot) = self.slots.get_mut(slot) {
            slot.length = length;
            slot.elapsed = 0.0;
            slot.playing = true;
        }
    }

    fn stop(&mut self, slot: SlotId) {
        if let Some(slot) = self.slots.get_mut(slot) {
            slot.playing = false;
        }
    }

    fn is_playing(&self, slot: SlotId) -> bool {
        self.slots.get(slot).is_some_and(|slot| slot.playing)
    }

    fn set_channel_gain_db(&mut self, channel: &str, db: f32) -> Result<(), DeviceError> {
        self.mixer.set_gain_db(channel, db)
    }

    fn channel_gain_db(&self, channel: &str) -> Result<f32, DeviceError> {
        self.mixer.gain_db(channel)
    }
}
