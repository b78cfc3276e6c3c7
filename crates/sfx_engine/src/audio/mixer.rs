//! Mixer channel table
//!
//! Holds the declared mixer channels and their current gain in decibels.
//! Devices own one of these and answer `set_channel_gain_db` /
//! `channel_gain_db` from it. Channels must be declared up front; gain
//! requests for anything else are rejected.

use crate::audio::backend::DeviceError;
use crate::audio::gain;
use std::collections::HashMap;

/// Mixer channels and their gains
#[derive(Debug, Clone, Default)]
pub struct ChannelMixer {
    /// Gain in dB for each declared channel
    gains_db: HashMap<String, f32>,
    /// Channel whose gain also applies to every other channel
    master: Option<String>,
}

impl ChannelMixer {
    /// Create a mixer with no channels
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mixer with the given channels at 0 dB
    pub fn with_channels<I, S>(channels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut mixer = Self::new();
        for channel in channels {
            mixer.declare(channel, gain::MAX_DB);
        }
        mixer
    }

    /// Declare a channel with an initial gain (redeclaring resets the gain)
    pub fn declare<S: Into<String>>(&mut self, channel: S, db: f32) {
        self.gains_db.insert(channel.into(), db);
    }

    /// Mark a declared channel as the master channel
    pub fn set_master<S: Into<String>>(&mut self, channel: S) -> Result<(), DeviceError> {
        let channel = channel.into();
        if !self.gains_db.contains_key(&channel) {
            return Err(DeviceError::UnknownChannel(channel));
        }
        self.master = Some(channel);
        Ok(())
    }

    /// Master channel name, if any
    pub fn master(&self) -> Option<&str> {
        self.master.as_deref()
    }

    /// Set a channel's gain
    pub fn set_gain_db(&mut self, channel: &str, db: f32) -> Result<(), DeviceError> {
        let gain = self
            .gains_db
            .get_mut(channel)
            .ok_or_else(|| DeviceError::UnknownChannel(channel.to_string()))?;
        *gain = db;
        Ok(())
    }

    /// Get a channel's gain
    pub fn gain_db(&self, channel: &str) -> Result<f32, DeviceError> {
        self.gains_db
            .get(channel)
            .copied()
            .ok_or_else(|| DeviceError::UnknownChannel(channel.to_string()))
    }

    /// Check if a channel is declared
    pub fn contains(&self, channel: &str) -> bool {
        self.gains_db.contains_key(channel)
    }

    /// Declared channel names, sorted
    pub fn channels(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.gains_db.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Linear amplitude for a sound routed to `channel`, master included
    ///
    /// Unrouted sounds and undeclared channels only get the master gain.
    pub fn effective_amplitude(&self, channel: Option<&str>) -> f32 {
        let channel_amp = channel
            .and_then(|name| self.gains_db.get(name))
            .map_or(1.0, |&db| gain::db_to_amplitude(db));

        let master_amp = match self.master.as_deref() {
            Some(master) if Some(master) != channel => {
                self.gains_db.get(master).map_or(1.0, |&db| gain::db_to_amplitude(db))
            }
            _ => 1.0,
        };

        channel_amp * master_amp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_declared_channels_start_at_zero_db() {
        let mixer = ChannelMixer::with_channels(["Master", "Sfx"]);
        assert_eq!(mixer.gain_db("Master").unwrap(), 0.0);
        assert_eq!(mixer.gain_db("Sfx").unwrap(), 0.0);
        assert_eq!(mixer.channels(), vec!["Master", "Sfx"]);
    }

    #[test]
    fn test_unknown_channel_rejected() {
        let mut mixer = ChannelMixer::with_channels(["Sfx"]);
        assert!(matches!(mixer.set_gain_db("Music", -10.0), Err(DeviceError::UnknownChannel(_))));
        assert!(matches!(mixer.gain_db("Music"), Err(DeviceError::UnknownChannel(_))));
        assert!(mixer.set_master("Music").is_err());
    }

    #[test]
    fn test_set_gain() {
        let mut mixer = ChannelMixer::with_channels(["Sfx"]);
        mixer.set_gain_db("Sfx", -12.5).unwrap();
        assert_eq!(mixer.gain_db("Sfx").unwrap(), -12.5);
    }

    #[test]
    fn test_effective_amplitude_with_master() {
        let mut mixer = ChannelMixer::with_channels(["Master", "Sfx"]);
        mixer.set_master("Master").unwrap();
        mixer.set_gain_db("Master", -20.0).unwrap();
        mixer.set_gain_db("Sfx", -20.0).unwrap();

        assert_relative_eq!(mixer.effective_amplitude(Some("Sfx")), 0.01, epsilon = 1e-6);
        assert_relative_eq!(mixer.effective_amplitude(Some("Master")), 0.1, epsilon = 1e-6);
        assert_relative_eq!(mixer.effective_amplitude(None), 0.1, epsilon = 1e-6);
    }

    #[test]
    fn test_muted_channel_is_silent() {
        let mut mixer = ChannelMixer::with_channels(["Sfx"]);
        mixer.set_gain_db("Sfx", gain::MUTED_DB).unwrap();
        assert_eq!(mixer.effective_amplitude(Some("Sfx")), 0.0);
    }
}
