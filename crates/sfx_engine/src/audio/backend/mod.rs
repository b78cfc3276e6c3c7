//! Audio device implementations
//!
//! The dispatcher never renders audio itself. It drives an [`AudioDevice`],
//! which owns the emitting resources (slots) and the mixer channels.
//!
//! # Threading
//! Devices are driven from the dispatcher's thread only and are not required
//! to be `Send` or `Sync`.

pub mod headless;
#[cfg(feature = "rodio")]
pub mod rodio_backend;

use crate::audio::definition::{Rolloff, SoundDefinition};
use crate::foundation::math::Vec3;

slotmap::new_key_type! {
    /// Handle to one audio-emitting resource owned by a device
    pub struct SlotId;
}

/// Device errors
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// Gain request for a channel the device does not know
    #[error("Unknown mixer channel: {0}")]
    UnknownChannel(String),

    /// Device could not be opened
    #[error("Audio device initialization failed: {0}")]
    InitFailed(String),

    /// Clip data could not be loaded or decoded
    #[error("Clip error: {0}")]
    Clip(String),
}

/// Everything a device needs to start one slot
#[derive(Debug, Clone, PartialEq)]
pub struct SlotParams {
    /// Clip reference to play
    pub clip: String,
    /// Mixer channel routing
    pub channel: Option<String>,
    /// Source volume (0.0 to 2.0)
    pub volume: f32,
    /// Playback pitch (-3.0 to 3.0)
    pub pitch: f32,
    /// Loop until stopped
    pub looping: bool,
    /// Stereo pan (-1.0 to 1.0)
    pub stereo_pan: f32,
    /// 2D/3D blend (0.0 to 1.0)
    pub spatial_blend: f32,
    /// Reverb zone mix (0.0 to 1.1)
    pub reverb_mix: f32,
    /// Doppler level (0.0 to 5.0)
    pub doppler_level: f32,
    /// Spread angle in degrees
    pub spread: f32,
    /// Distance attenuation curve
    pub rolloff: Rolloff,
    /// Distance below which there is no attenuation
    pub min_distance: f32,
    /// Distance beyond which attenuation stops
    pub max_distance: f32,
}

impl SlotParams {
    /// Build slot parameters from a definition and the clip picked for this play
    pub fn from_definition(definition: &SoundDefinition, clip: &str) -> Self {
        Self {
            clip: clip.to_string(),
            channel: definition.channel().map(str::to_string),
            volume: definition.volume(),
            pitch: definition.pitch(),
            looping: definition.looping(),
            stereo_pan: definition.stereo_pan(),
            spatial_blend: definition.spatial_blend(),
            reverb_mix: definition.reverb_mix(),
            doppler_level: definition.doppler_level(),
            spread: definition.spread(),
            rolloff: definition.rolloff(),
            min_distance: definition.min_distance(),
            max_distance: definition.max_distance(),
        }
    }
}

/// Audio output device driven by the dispatcher
///
/// Slot operations on an unknown or destroyed slot are no-ops and
/// `is_playing` reports `false` for them.
pub trait AudioDevice {
    /// Create a new, idle slot
    fn create_slot(&mut self) -> SlotId;

    /// Destroy a slot and free its resources
    fn destroy_slot(&mut self, slot: SlotId);

    /// Check if a slot exists on this device
    fn contains_slot(&self, slot: SlotId) -> bool;

    /// Apply parameters to a slot ahead of playing it
    fn configure(&mut self, slot: SlotId, params: &SlotParams);

    /// Place a slot in world space; `None` puts it at the listener-local origin
    fn set_slot_position(&mut self, slot: SlotId, position: Option<Vec3>);

    /// Start output on a configured slot
    fn play(&mut self, slot: SlotId);

    /// Stop output on a slot
    fn stop(&mut self, slot: SlotId);

    /// Check if a slot is producing audio
    fn is_playing(&self, slot: SlotId) -> bool;

    /// Set a mixer channel's gain in decibels
    fn set_channel_gain_db(&mut self, channel: &str, db: f32) -> Result<(), DeviceError>;

    /// Get a mixer channel's gain in decibels
    fn channel_gain_db(&self, channel: &str) -> Result<f32, DeviceError>;
}

impl<D: AudioDevice + ?Sized> AudioDevice for Box<D> {
    fn create_slot(&mut self) -> SlotId {
        (**self).create_slot()
    }

    fn destroy_slot(&mut self, slot: SlotId) {
        (**self).destroy_slot(slot);
    }

    fn contains_slot(&self, slot: SlotId) -> bool {
        (**self).contains_slot(slot)
    }

    fn configure(&mut self, slot: SlotId, params: &SlotParams) {
        (**self).configure(slot, params);
    }

    fn set_slot_position(&mut self, slot: SlotId, position: Option<Vec3>) {
        (**self).set_slot_position(slot, position);
    }

    fn play(&mut self, slot: SlotId) {
        (**self).play(slot);
    }

    fn stop(&mut self, slot: SlotId) {
        (**self).stop(slot);
    }

    fn is_playing(&self, slot: SlotId) -> bool {
        (**self).is_playing(slot)
    }

    fn set_channel_gain_db(&mut self, channel: &str, db: f32) -> Result<(), DeviceError> {
        (**self).set_channel_gain_db(channel, db)
    }

    fn channel_gain_db(&self, channel: &str) -> Result<f32, DeviceError> {
        (**self).channel_gain_db(channel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_copy_every_field() {
        let def = SoundDefinition::new("door", "door_a.wav")
            .with_channel("Sfx")
            .with_volume(0.8)
            .with_pitch(1.2)
            .with_looping(true)
            .with_stereo_pan(-0.5)
            .with_spatial_blend(1.0)
            .with_reverb_mix(0.3)
            .with_doppler_level(2.0)
            .with_spread(90.0)
            .with_falloff(Rolloff::Linear, 2.0, 50.0);

        let params = SlotParams::from_definition(&def, "door_b.wav");
        assert_eq!(params.clip, "door_b.wav");
        assert_eq!(params.channel.as_deref(), Some("Sfx"));
        assert_eq!(params.volume, 0.8);
        assert_eq!(params.pitch, 1.2);
        assert!(params.looping);
        assert_eq!(params.stereo_pan, -0.5);
        assert_eq!(params.spatial_blend, 1.0);
        assert_eq!(params.reverb_mix, 0.3);
        assert_eq!(params.doppler_level, 2.0);
        assert_eq!(params.spread, 90.0);
        assert_eq!(params.rolloff, Rolloff::Linear);
        assert_eq!(params.min_distance, 2.0);
        assert_eq!(params.max_distance, 50.0);
    }
}
