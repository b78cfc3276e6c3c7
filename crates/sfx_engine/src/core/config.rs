//! # Player Configuration
//!
//! Everything needed to stand up a dispatcher: the mixer channels the device
//! exposes, how many slots to create up front, and which sound banks to
//! register at startup.
//!
//! ## Example (RON)
//!
//! ```ron
//! (
//!     channels: [(name: "Master"), (name: "Sfx", volume: 0.8)],
//!     master_channel: Some("Master"),
//!     prewarm_slots: 4,
//!     sound_banks: ["banks/weapons.ron"],
//! )
//! ```

use crate::audio::backend::DeviceError;
use crate::audio::definition::SoundDefinition;
use crate::audio::gain;
use crate::audio::mixer::ChannelMixer;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use crate::config::{Config, ConfigError};

/// One declared mixer channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Channel name used by sound definitions
    pub name: String,
    /// Initial volume in `[0, 1]`
    #[serde(default = "ChannelConfig::default_volume")]
    pub volume: f32,
}

impl ChannelConfig {
    /// Create a channel at full volume
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            volume: Self::default_volume(),
        }
    }

    /// Set the initial volume
    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = gain::clamp_volume(volume);
        self
    }

    fn default_volume() -> f32 {
        1.0
    }
}

/// # Dispatcher Configuration
///
/// Loaded from `.ron` or `.toml` through [`Config`]. Relative sound bank
/// paths are resolved against the config file's directory by
/// [`SfxPlayerConfig::load`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SfxPlayerConfig {
    /// Mixer channels the device exposes
    pub channels: Vec<ChannelConfig>,
    /// Channel whose gain applies on top of every other channel
    pub master_channel: Option<String>,
    /// Slots created before the first play
    pub prewarm_slots: usize,
    /// Seed for random clip selection; `None` seeds from entropy
    pub rng_seed: Option<u64>,
    /// Sound bank files registered at startup, in order
    pub sound_banks: Vec<PathBuf>,
    /// Inline definitions, registered after the banks
    pub sounds: Vec<SoundDefinition>,
}

impl Default for SfxPlayerConfig {
    fn default() -> Self {
        Self {
            channels: Vec::new(),
            master_channel: None,
            prewarm_slots: 1,
            rng_seed: None,
            sound_banks: Vec::new(),
            sounds: Vec::new(),
        }
    }
}

impl Config for SfxPlayerConfig {}

impl SfxPlayerConfig {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from file, resolving relative bank paths against its directory
    ///
    /// # Errors
    /// - any [`ConfigError`] from reading or parsing the file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut config = Self::load_from_file(path)?;
        if let Some(base) = path.parent() {
            for bank in &mut config.sound_banks {
                if bank.is_relative() {
                    *bank = base.join(&*bank);
                }
            }
        }
        log::info!(
            "Loaded player config from {}: {} channel(s), {} bank(s)",
            path.display(),
            config.channels.len(),
            config.sound_banks.len()
        );
        Ok(config)
    }

    /// Declare a mixer channel
    pub fn with_channel(mut self, channel: ChannelConfig) -> Self {
        self.channels.push(channel);
        self
    }

    /// Set the master channel
    pub fn with_master_channel(mut self, channel: impl Into<String>) -> Self {
        self.master_channel = Some(channel.into());
        self
    }

    /// Set the pre-warm slot count
    pub fn with_prewarm_slots(mut self, slots: usize) -> Self {
        self.prewarm_slots = slots;
        self
    }

    /// Seed random clip selection
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Add a sound bank file
    pub fn with_sound_bank(mut self, path: impl Into<PathBuf>) -> Self {
        self.sound_banks.push(path.into());
        self
    }

    /// Add an inline sound definition
    pub fn with_sound(mut self, definition: SoundDefinition) -> Self {
        self.sounds.push(definition);
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        for (i, channel) in self.channels.iter().enumerate() {
            if channel.name.is_empty() {
                return Err(format!("Channel {i} has an empty name"));
            }
            if self.channels[..i].iter().any(|other| other.name == channel.name) {
                return Err(format!("Channel '{}' declared twice", channel.name));
            }
        }
        if let Some(master) = &self.master_channel {
            if !self.channels.iter().any(|channel| &channel.name == master) {
                return Err(format!("Master channel '{master}' is not declared"));
            }
        }
        Ok(())
    }

    /// Build the mixer channel table for a device
    ///
    /// # Errors
    /// - `UnknownChannel` if the master channel is not declared
    pub fn mixer(&self) -> Result<ChannelMixer, DeviceError> {
        let mut mixer = ChannelMixer::new();
        for channel in &self.channels {
            mixer.declare(channel.name.clone(), gain::volume_to_db(channel.volume));
        }
        if let Some(master) = &self.master_channel {
            mixer.set_master(master.clone())?;
        }
        Ok(mixer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFormat;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults() {
        let config = SfxPlayerConfig::default();
        assert_eq!(config.prewarm_slots, 1);
        assert!(config.channels.is_empty());
        assert!(config.rng_seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_ron() {
        let text = r#"(
            channels: [(name: "Master"), (name: "Sfx", volume: 0.5)],
            master_channel: Some("Master"),
            prewarm_slots: 4,
            rng_seed: Some(7),
            sounds: [(name: "click", clips: ["click.wav"])],
        )"#;
        let config = SfxPlayerConfig::from_str_with_format(text, ConfigFormat::Ron).unwrap();

        assert_eq!(config.channels.len(), 2);
        assert_relative_eq!(config.channels[0].volume, 1.0);
        assert_relative_eq!(config.channels[1].volume, 0.5);
        assert_eq!(config.prewarm_slots, 4);
        assert_eq!(config.rng_seed, Some(7));
        assert_eq!(config.sounds[0].name(), "click");
    }

    #[test]
    fn test_mixer_from_channels() {
        let config = SfxPlayerConfig::new()
            .with_channel(ChannelConfig::new("Master"))
            .with_channel(ChannelConfig::new("Sfx").with_volume(0.5))
            .with_channel(ChannelConfig::new("Ui").with_volume(0.0))
            .with_master_channel("Master");
        let mixer = config.mixer().unwrap();

        assert_relative_eq!(mixer.gain_db("Master").unwrap(), gain::MAX_DB);
        assert_relative_eq!(mixer.gain_db("Sfx").unwrap(), -20.0);
        assert_relative_eq!(mixer.gain_db("Ui").unwrap(), gain::MUTED_DB);
        assert_eq!(mixer.master(), Some("Master"));
    }

    #[test]
    fn test_undeclared_master_rejected() {
        let config = SfxPlayerConfig::new().with_master_channel("Master");
        assert!(config.validate().is_err());
        assert!(matches!(config.mixer(), Err(DeviceError::UnknownChannel(_))));
    }

    #[test]
    fn test_duplicate_channel_rejected() {
        let config = SfxPlayerConfig::new()
            .with_channel(ChannelConfig::new("Sfx"))
            .with_channel(ChannelConfig::new("Sfx"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_resolves_bank_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("player.toml");
        SfxPlayerConfig::new()
            .with_sound_bank("banks/ui.ron")
            .with_sound_bank(dir.path().join("abs.ron"))
            .save_to_file(&path)
            .unwrap();

        let config = SfxPlayerConfig::load(&path).unwrap();
        assert_eq!(config.sound_banks[0], dir.path().join("banks/ui.ron"));
        assert_eq!(config.sound_banks[1], dir.path().join("abs.ron"));
    }
}
