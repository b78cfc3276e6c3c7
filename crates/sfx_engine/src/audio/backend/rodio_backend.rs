//! Rodio audio device
//!
//! Uses the Rodio library for cross-platform audio output. Every slot gets a
//! fresh `Sink` when it starts playing; clips are decoded from an in-memory
//! clip bank keyed by clip reference.
//!
//! Volume, pitch, looping and channel gain are rendered. Stereo pan and the
//! 3D parameters are stored but not rendered by this device.
//!
//! # Example
//!
//! ```no_run
//! use sfx_engine::audio::backend::rodio_backend::RodioDevice;
//! use sfx_engine::audio::{ChannelMixer, SfxDispatcher, SoundDefinition, PlayOptions};
//!
//! let mut device = RodioDevice::new(ChannelMixer::with_channels(["Sfx"])).unwrap();
//! device.load_clip("explosion.wav", "resources/audio/explosion.wav").unwrap();
//!
//! let mut sfx = SfxDispatcher::new(device);
//! sfx.register([SoundDefinition::new("explosion", "explosion.wav").with_channel("Sfx")]);
//! sfx.play("explosion", PlayOptions::default()).unwrap();
//! loop {
//!     sfx.update();
//! #   break;
//! }
//! ```

use super::{AudioDevice, DeviceError, SlotId, SlotParams};
use crate::audio::asset::AudioClip;
use crate::audio::mixer::ChannelMixer;
use crate::foundation::math::Vec3;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use slotmap::SlotMap;
use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

#[derive(Default)]
struct RodioSlot {
    params: Option<SlotParams>,
    position: Option<Vec3>,
    sink: Option<Sink>,
}

/// Rodio-based audio device
pub struct RodioDevice {
    /// Audio output stream (must be kept alive)
    _output_stream: OutputStream,
    /// Output stream handle for creating sinks
    stream_handle: OutputStreamHandle,
    slots: SlotMap<SlotId, RodioSlot>,
    clips: HashMap<String, AudioClip>,
    mixer: ChannelMixer,
}

impl RodioDevice {
    /// Open the default output device
    ///
    /// # Errors
    /// - `InitFailed` if no output device could be opened
    pub fn new(mixer: ChannelMixer) -> Result<Self, DeviceError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| DeviceError::InitFailed(format!("Failed to create audio output: {e}")))?;

        log::info!("Rodio audio device initialized");
        Ok(Self {
            _output_stream: stream,
            stream_handle,
            slots: SlotMap::with_key(),
            clips: HashMap::new(),
            mixer,
        })
    }

    /// Add a clip to the clip bank
    pub fn add_clip<S: Into<String>>(&mut self, clip_ref: S, clip: AudioClip) {
        self.clips.insert(clip_ref.into(), clip);
    }

    /// Load a clip file into the clip bank
    ///
    /// # Errors
    /// - `Clip` if the file cannot be read or is not a supported format
    pub fn load_clip<S: Into<String>>(&mut self, clip_ref: S, path: impl AsRef<Path>) -> Result<(), DeviceError> {
        let clip = AudioClip::load(path).map_err(|e| DeviceError::Clip(e.to_string()))?;
        self.add_clip(clip_ref, clip);
        Ok(())
    }

    /// Mixer channel table
    pub fn mixer(&self) -> &ChannelMixer {
        &self.mixer
    }

    /// Current world position of a slot
    pub fn position(&self, slot: SlotId) -> Option<Vec3> {
        self.slots.get(slot).and_then(|slot| slot.position)
    }

    fn sink_volume(&self, params: &SlotParams) -> f32 {
        params.volume * self.mixer.effective_amplitude(params.channel.as_deref())
    }

    fn start_sink(&self, params: &SlotParams) -> Result<Sink, DeviceError> {
        let clip = self
            .clips
            .get(&params.clip)
            .ok_or_else(|| DeviceError::Clip(format!("Unknown clip: {}", params.clip)))?;

        let sink = Sink::try_new(&self.stream_handle)
            .map_err(|e| DeviceError::InitFailed(format!("Failed to create sink: {e}")))?;

        let cursor = Cursor::new(clip.shared_data());
        if params.looping {
            let source = Decoder::new_looped(cursor)
                .map_err(|e| DeviceError::Clip(format!("Failed to decode audio: {e}")))?;
            sink.append(source);
        } else {
            let source = Decoder::new(cursor)
                .map_err(|e| DeviceError::Clip(format!("Failed to decode audio: {e}")))?;
            sink.append(source);
        }

        sink.set_volume(self.sink_volume(params));
        // Negative pitch plays forward at the same speed
        sink.set_speed(params.pitch.abs());
        Ok(sink)
    }

    /// Re-apply channel gains to every live sink
    fn refresh_volumes(&self) {
        for slot in self.slots.values() {
            if let (Some(sink), Some(params)) = (&slot.sink, &slot.params) {
                sink.set_volume(self.sink_volume(params));
            }
        }
    }
}

impl AudioDevice for RodioDevice {
    fn create_slot(&mut self) -> SlotId {
        self.slots.insert(RodioSlot::default())
    }

    fn destroy_slot(&mut self, slot: SlotId) {
        if let Some(sink) = self.slots.remove(slot).and_then(|slot| slot.sink) {
            sink.stop();
        }
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
        let Some(params) = self.slots.get(slot).and_then(|slot| slot.params.clone()) else {
            log::warn!("Rodio device: play on unconfigured or unknown slot {slot:?}");
            return;
        };

        // A slot that fails to start reports not playing and is reclaimed on the next sweep
        let sink = match self.start_sink(&params) {
            Ok(sink) => Some(sink),
            Err(err) => {
                log::error!("Rodio device: {err}");
                None
            }
        };

        if let Some(slot) = self.slots.get_mut(slot) {
            if let Some(old) = std::mem::replace(&mut slot.sink, sink) {
                old.stop();
            }
        }
    }

    fn stop(&mut self, slot: SlotId) {
        if let Some(sink) = self.slots.get_mut(slot).and_then(|slot| slot.sink.take()) {
            sink.stop();
        }
    }

    fn is_playing(&self, slot: SlotId) -> bool {
        self.slots
            .get(slot)
            .and_then(|slot| slot.sink.as_ref())
            .is_some_and(|sink| !sink.is_paused() && !sink.empty())
    }

    fn set_channel_gain_db(&mut self, channel: &str, db: f32) -> Result<(), DeviceError> {
        self.mixer.set_gain_db(channel, db)?;
        self.refresh_volumes();
        Ok(())
    }

    fn channel_gain_db(&self, channel: &str) -> Result<f32, DeviceError> {
        self.mixer.gain_db(channel)
    }
}

impl Drop for RodioDevice {
    fn drop(&mut self) {
        for (_slot, state) in self.slots.drain() {
            if let Some(sink) = state.sink {
                sink.stop();
            }
        }
        log::info!("Rodio audio device shutdown");
    }
}
