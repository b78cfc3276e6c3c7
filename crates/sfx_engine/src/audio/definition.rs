//! Sound definitions
//!
//! A [`SoundDefinition`] is the immutable parameter bundle describing how one
//! named sound is played: which clip(s), which mixer channel, and the source
//! settings handed to the audio device on every play.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Stable identity of a registered sound
///
/// Assigned by the registry; never reused while the process runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SoundId(u32);

impl SoundId {
    /// Identity carried by definitions that were never registered
    pub const UNREGISTERED: Self = Self(u32::MAX);

    pub(crate) const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Check if this identity was assigned by a registry
    pub fn is_registered(self) -> bool {
        self != Self::UNREGISTERED
    }

    /// Raw numeric value
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl Default for SoundId {
    fn default() -> Self {
        Self::UNREGISTERED
    }
}

/// Distance attenuation curve for 3D sounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Rolloff {
    /// Realistic inverse-distance falloff
    #[default]
    Logarithmic,
    /// Straight line between min and max distance
    Linear,
}

/// Parameter ranges accepted by the device
pub mod limits {
    /// Volume range
    pub const VOLUME: (f32, f32) = (0.0, 2.0);
    /// Pitch range
    pub const PITCH: (f32, f32) = (-3.0, 3.0);
    /// Stereo pan range
    pub const STEREO_PAN: (f32, f32) = (-1.0, 1.0);
    /// Spatial blend range (0 = 2D, 1 = fully 3D)
    pub const SPATIAL_BLEND: (f32, f32) = (0.0, 1.0);
    /// Reverb zone mix range
    pub const REVERB_MIX: (f32, f32) = (0.0, 1.1);
    /// Doppler level range
    pub const DOPPLER: (f32, f32) = (0.0, 5.0);
    /// Spread angle in degrees
    pub const SPREAD: (f32, f32) = (0.0, 360.0);
    /// Min/max distance range
    pub const DISTANCE: (f32, f32) = (0.01, 1000.0);
}

fn clamp_to(value: f32, (min, max): (f32, f32)) -> f32 {
    if value.is_nan() {
        return min;
    }
    value.clamp(min, max)
}

/// Immutable description of one named sound
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundDefinition {
    #[serde(skip)]
    id: SoundId,
    name: String,
    /// First entry is the primary clip; the rest are random variations
    clips: Vec<String>,
    random_clip: bool,
    channel: Option<String>,
    volume: f32,
    pitch: f32,
    #[serde(rename = "loop")]
    looping: bool,
    max_concurrent_instances: i32,
    stereo_pan: f32,
    spatial_blend: f32,
    reverb_mix: f32,
    doppler_level: f32,
    spread: f32,
    rolloff: Rolloff,
    min_distance: f32,
    max_distance: f32,
}

impl Default for SoundDefinition {
    fn default() -> Self {
        Self {
            id: SoundId::UNREGISTERED,
            name: String::new(),
            clips: Vec::new(),
            random_clip: false,
            channel: None,
            volume: 1.0,
            pitch: 1.0,
            looping: false,
            max_concurrent_instances: -1,
            stereo_pan: 0.0,
            spatial_blend: 0.0,
            reverb_mix: 0.0,
            doppler_level: 1.0,
            spread: 0.0,
            rolloff: Rolloff::Logarithmic,
            min_distance: 1.0,
            max_distance: 100.0,
        }
    }
}

impl SoundDefinition {
    /// Create a definition playing a single clip with default parameters
    pub fn new<S: Into<String>, C: Into<String>>(name: S, clip: C) -> Self {
        Self {
            name: name.into(),
            clips: vec![clip.into()],
            ..Default::default()
        }
    }

    /// Add clip variations and pick one at random on every play
    pub fn with_random_clips<I, C>(mut self, clips: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        self.clips.extend(clips.into_iter().map(Into::into));
        self.random_clip = true;
        self
    }

    /// Route output to a mixer channel
    pub fn with_channel<S: Into<String>>(mut self, channel: S) -> Self {
        self.channel = Some(channel.into());
        self
    }

    /// Set volume (0.0 to 2.0)
    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = clamp_to(volume, limits::VOLUME);
        self
    }

    /// Set pitch (-3.0 to 3.0)
    pub fn with_pitch(mut self, pitch: f32) -> Self {
        self.pitch = clamp_to(pitch, limits::PITCH);
        self
    }

    /// Set the loop flag
    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// Limit simultaneous instances (0 or negative = unlimited)
    pub fn with_max_concurrent_instances(mut self, max: i32) -> Self {
        self.max_concurrent_instances = max;
        self
    }

    /// Set stereo pan (-1.0 left to 1.0 right)
    pub fn with_stereo_pan(mut self, pan: f32) -> Self {
        self.stereo_pan = clamp_to(pan, limits::STEREO_PAN);
        self
    }

    /// Set spatial blend (0.0 = 2D, 1.0 = 3D)
    pub fn with_spatial_blend(mut self, blend: f32) -> Self {
        self.spatial_blend = clamp_to(blend, limits::SPATIAL_BLEND);
        self
    }

    /// Set reverb zone mix (0.0 to 1.1)
    pub fn with_reverb_mix(mut self, mix: f32) -> Self {
        self.reverb_mix = clamp_to(mix, limits::REVERB_MIX);
        self
    }

    /// Set 3D falloff parameters
    pub fn with_falloff(mut self, rolloff: Rolloff, min_distance: f32, max_distance: f32) -> Self {
        self.rolloff = rolloff;
        self.min_distance = clamp_to(min_distance, limits::DISTANCE);
        self.max_distance = clamp_to(max_distance, limits::DISTANCE);
        self
    }

    /// Set doppler level (0.0 to 5.0)
    pub fn with_doppler_level(mut self, level: f32) -> Self {
        self.doppler_level = clamp_to(level, limits::DOPPLER);
        self
    }

    /// Set spread angle in degrees (0 to 360)
    pub fn with_spread(mut self, degrees: f32) -> Self {
        self.spread = clamp_to(degrees, limits::SPREAD);
        self
    }

    /// Clamp every numeric parameter into its documented range
    ///
    /// Definitions built through the `with_*` setters are already in range;
    /// deserialized ones may not be.
    pub(crate) fn clamped(mut self) -> Self {
        self.volume = clamp_to(self.volume, limits::VOLUME);
        self.pitch = clamp_to(self.pitch, limits::PITCH);
        self.stereo_pan = clamp_to(self.stereo_pan, limits::STEREO_PAN);
        self.spatial_blend = clamp_to(self.spatial_blend, limits::SPATIAL_BLEND);
        self.reverb_mix = clamp_to(self.reverb_mix, limits::REVERB_MIX);
        self.doppler_level = clamp_to(self.doppler_level, limits::DOPPLER);
        self.spread = clamp_to(self.spread, limits::SPREAD);
        self.min_distance = clamp_to(self.min_distance, limits::DISTANCE);
        self.max_distance = clamp_to(self.max_distance, limits::DISTANCE);
        self
    }

    /// Check structural validity; returns the reason when invalid
    pub(crate) fn invalid_reason(&self) -> Option<&'static str> {
        if self.name.trim().is_empty() {
            Some("name is empty")
        } else if self.clips.is_empty() {
            Some("no clips")
        } else if self.clips.iter().any(|clip| clip.trim().is_empty()) {
            Some("clip reference is empty")
        } else if self.min_distance > self.max_distance {
            Some("min distance exceeds max distance")
        } else {
            None
        }
    }

    pub(crate) fn with_id(mut self, id: SoundId) -> Self {
        self.id = id;
        self
    }

    /// True when every parameter except the identity matches
    pub(crate) fn same_parameters(&self, other: &Self) -> bool {
        let mut probe = self.clone();
        probe.id = other.id;
        probe == *other
    }

    /// Pick the clip for the next play
    ///
    /// Uniform among all clips when the random flag is set, otherwise the primary.
    pub fn pick_clip<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        if self.random_clip && self.clips.len() > 1 {
            &self.clips[rng.gen_range(0..self.clips.len())]
        } else {
            self.clips.first().map_or("", String::as_str)
        }
    }

    /// Registered identity
    pub fn id(&self) -> SoundId {
        self.id
    }

    /// Sound name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All clip references, primary first
    pub fn clips(&self) -> &[String] {
        &self.clips
    }

    /// Whether a clip is chosen at random on every play
    pub fn random_clip(&self) -> bool {
        self.random_clip
    }

    /// Mixer channel this sound routes to
    pub fn channel(&self) -> Option<&str> {
        self.channel.as_deref()
    }

    /// Source volume
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Source pitch
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Loop flag
    pub fn looping(&self) -> bool {
        self.looping
    }

    /// Raw concurrency limit (0 or negative = unlimited)
    pub fn max_concurrent_instances(&self) -> i32 {
        self.max_concurrent_instances
    }

    /// Concurrency limit, `None` when unlimited
    pub fn instance_limit(&self) -> Option<usize> {
        usize::try_from(self.max_concurrent_instances).ok().filter(|&max| max > 0)
    }

    /// Stereo pan
    pub fn stereo_pan(&self) -> f32 {
        self.stereo_pan
    }

    /// Spatial blend
    pub fn spatial_blend(&self) -> f32 {
        self.spatial_blend
    }

    /// Reverb zone mix
    pub fn reverb_mix(&self) -> f32 {
        self.reverb_mix
    }

    /// Doppler level
    pub fn doppler_level(&self) -> f32 {
        self.doppler_level
    }

    /// Spread angle in degrees
    pub fn spread(&self) -> f32 {
        self.spread
    }

    /// Rolloff curve
    pub fn rolloff(&self) -> Rolloff {
        self.rolloff
    }

    /// Distance below which the sound is not attenuated
    pub fn min_distance(&self) -> f32 {
        self.min_distance
    }

    /// Distance beyond which attenuation stops
    pub fn max_distance(&self) -> f32 {
        self.max_distance
    }
}

/// Anything that names a sound: a plain name or a definition
pub trait SoundName {
    /// Name used for registry lookup
    fn sound_name(&self) -> &str;
}

impl SoundName for str {
    fn sound_name(&self) -> &str {
        self
    }
}

impl SoundName for String {
    fn sound_name(&self) -> &str {
        self
    }
}

impl SoundName for SoundDefinition {
    fn sound_name(&self) -> &str {
        &self.name
    }
}

impl SoundName for Arc<SoundDefinition> {
    fn sound_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_defaults() {
        let def = SoundDefinition::new("click", "ui/click.wav");
        assert_eq!(def.volume(), 1.0);
        assert_eq!(def.pitch(), 1.0);
        assert!(!def.looping());
        assert_eq!(def.instance_limit(), None);
        assert_eq!(def.rolloff(), Rolloff::Logarithmic);
        assert_eq!(def.min_distance(), 1.0);
        assert_eq!(def.max_distance(), 100.0);
        assert!(!def.id().is_registered());
    }

    #[test]
    fn test_setters_clamp() {
        let def = SoundDefinition::new("boom", "boom.wav")
            .with_volume(5.0)
            .with_pitch(-10.0)
            .with_stereo_pan(2.0)
            .with_reverb_mix(3.0)
            .with_spread(720.0)
            .with_falloff(Rolloff::Linear, 0.0, 5000.0);

        assert_eq!(def.volume(), 2.0);
        assert_eq!(def.pitch(), -3.0);
        assert_eq!(def.stereo_pan(), 1.0);
        assert_eq!(def.reverb_mix(), 1.1);
        assert_eq!(def.spread(), 360.0);
        assert_eq!(def.min_distance(), 0.01);
        assert_eq!(def.max_distance(), 1000.0);
    }

    #[test]
    fn test_instance_limit() {
        let def = SoundDefinition::new("a", "a.wav");
        assert_eq!(def.clone().with_max_concurrent_instances(0).instance_limit(), None);
        assert_eq!(def.clone().with_max_concurrent_instances(-3).instance_limit(), None);
        assert_eq!(def.with_max_concurrent_instances(2).instance_limit(), Some(2));
    }

    #[test]
    fn test_pick_clip_without_random_uses_primary() {
        let mut rng = StdRng::seed_from_u64(7);
        let def = SoundDefinition::new("step", "step_0.wav");
        for _ in 0..10 {
            assert_eq!(def.pick_clip(&mut rng), "step_0.wav");
        }
    }

    #[test]
    fn test_pick_clip_random_covers_variations() {
        let mut rng = StdRng::seed_from_u64(42);
        let def = SoundDefinition::new("step", "step_0.wav")
            .with_random_clips(["step_1.wav", "step_2.wav"]);

        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(def.pick_clip(&mut rng).to_string());
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_invalid_reason() {
        assert!(SoundDefinition::new("ok", "ok.wav").invalid_reason().is_none());
        assert_eq!(SoundDefinition::new("  ", "a.wav").invalid_reason(), Some("name is empty"));
        assert_eq!(SoundDefinition::default().invalid_reason(), Some("name is empty"));

        let no_clips = SoundDefinition { name: "x".into(), ..Default::default() };
        assert_eq!(no_clips.invalid_reason(), Some("no clips"));

        let inverted = SoundDefinition::new("x", "x.wav").with_falloff(Rolloff::Linear, 50.0, 10.0);
        assert_eq!(inverted.invalid_reason(), Some("min distance exceeds max distance"));
    }

    #[test]
    fn test_clamped_fixes_deserialized_values() {
        let def = SoundDefinition { volume: 9.0, doppler_level: -1.0, ..SoundDefinition::new("x", "x.wav") };
        let def = def.clamped();
        assert_eq!(def.volume(), 2.0);
        assert_eq!(def.doppler_level(), 0.0);
    }

    #[test]
    fn test_same_parameters_ignores_identity() {
        let a = SoundDefinition::new("x", "x.wav").with_id(SoundId::new(1));
        let b = SoundDefinition::new("x", "x.wav").with_id(SoundId::new(2));
        assert!(a.same_parameters(&b));
        assert!(!a.same_parameters(&b.with_volume(0.5)));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let def: SoundDefinition = ron::from_str(
            r#"(name: "laser", clips: ["laser.ogg"], channel: Some("Sfx"), loop: true, max_concurrent_instances: 3)"#,
        )
        .unwrap();
        assert_eq!(def.name(), "laser");
        assert_eq!(def.channel(), Some("Sfx"));
        assert!(def.looping());
        assert_eq!(def.instance_limit(), Some(3));
        assert_eq!(def.volume(), 1.0);
        assert!(!def.id().is_registered());
    }
}
