//! Playback dispatcher
//!
//! Turns play/stop/mute/volume requests into device calls. Owns the slot
//! pool and the active instance table; the registry supplies definitions.
//!
//! Instance lifecycle: requested, playing, then either finished (noticed by
//! the sweep in [`SfxDispatcher::update`]) or stopped explicitly, and finally
//! released back to the pool. Only a finish fires the completion callback.

use crate::audio::backend::{AudioDevice, SlotParams};
use crate::audio::commands::{PlayOptions, SfxCommand, SfxCommands};
use crate::audio::definition::{SoundDefinition, SoundId, SoundName};
use crate::audio::gain;
use crate::audio::instances::{ActiveInstance, ActiveInstanceTable, InstanceId};
use crate::audio::pool::ResourcePool;
use crate::audio::registry::SoundRegistry;
use crate::audio::sound_bank::SoundBank;
use crate::audio::SfxError;
use crate::config::{Config, ConfigError};
use crate::core::config::SfxPlayerConfig;
use crate::events::{SfxEvent, SfxEvents};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Slots created by [`SfxDispatcher::new`]
const DEFAULT_PREWARM_SLOTS: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EndReason {
    /// Slot stopped on its own
    Finished,
    /// Stop or StopAll
    Stopped,
}

/// Sound effect dispatcher
///
/// Single-threaded: call [`update`](Self::update) once per host tick.
/// Completion callbacks and event handlers cannot reach the dispatcher;
/// they queue follow-up work through [`commands`](Self::commands).
pub struct SfxDispatcher<D: AudioDevice> {
    device: D,
    registry: SoundRegistry,
    pool: ResourcePool,
    instances: ActiveInstanceTable,
    events: SfxEvents,
    commands: SfxCommands,
    rng: StdRng,
    torn_down: bool,
}

impl<D: AudioDevice> SfxDispatcher<D> {
    /// Create a dispatcher with an entropy-seeded RNG and one pre-warmed slot
    pub fn new(device: D) -> Self {
        Self::build(device, StdRng::from_entropy(), DEFAULT_PREWARM_SLOTS)
    }

    /// Create a dispatcher with deterministic random clip selection
    pub fn with_seed(device: D, seed: u64) -> Self {
        Self::build(device, StdRng::seed_from_u64(seed), DEFAULT_PREWARM_SLOTS)
    }

    /// Create a dispatcher from a player configuration
    ///
    /// The device should already carry the mixer from
    /// [`SfxPlayerConfig::mixer`]. Sound banks are registered in order,
    /// followed by the inline sounds.
    ///
    /// # Errors
    /// - `Config` if the configuration is invalid or a bank cannot be loaded
    pub fn from_config(device: D, config: &SfxPlayerConfig) -> Result<Self, SfxError> {
        config.validate().map_err(ConfigError::Invalid)?;

        let rng = config.rng_seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        let mut dispatcher = Self::build(device, rng, config.prewarm_slots);
        for bank in &config.sound_banks {
            dispatcher.load_bank(bank)?;
        }
        dispatcher.register(config.sounds.iter().cloned());
        Ok(dispatcher)
    }

    fn build(mut device: D, rng: StdRng, prewarm: usize) -> Self {
        let mut pool = ResourcePool::new();
        pool.prewarm(&mut device, prewarm);
        log::info!("Sound effect dispatcher initialized ({prewarm} slot(s) pre-warmed)");

        Self {
            device,
            registry: SoundRegistry::new(),
            pool,
            instances: ActiveInstanceTable::new(),
            events: SfxEvents::new(),
            commands: SfxCommands::new(),
            rng,
            torn_down: false,
        }
    }

    /// Register definitions; see [`SoundRegistry::register`]
    pub fn register<I>(&mut self, definitions: I) -> usize
    where
        I: IntoIterator<Item = SoundDefinition>,
    {
        self.registry.register(definitions)
    }

    /// Load a sound bank file and register its definitions
    ///
    /// # Errors
    /// - `Config` if the file cannot be read or parsed
    pub fn load_bank(&mut self, path: impl AsRef<Path>) -> Result<usize, SfxError> {
        let path = path.as_ref();
        let bank = SoundBank::load_from_file(path).map_err(|err| {
            log::error!("Failed to load sound bank {}: {err}", path.display());
            err
        })?;
        let accepted = self.registry.register(bank.sounds);
        log::info!("Registered {accepted} sound(s) from bank '{}'", bank.name);
        Ok(accepted)
    }

    /// Play a sound
    ///
    /// Returns the new instance id, or `None` when the sound is already at
    /// its concurrency limit and the request was dropped. A dropped request
    /// fires no callback and no event.
    ///
    /// # Errors
    /// - `NotFound` if no sound has this name; `on_end` still fires, immediately
    pub fn play<S: SoundName + ?Sized>(&mut self, sound: &S, options: PlayOptions) -> Result<Option<InstanceId>, SfxError> {
        let PlayOptions { overlay, on_end, position } = options;

        let definition = match self.registry.lookup(sound.sound_name()) {
            Ok(definition) => definition,
            Err(err) => {
                log::error!("Cannot play: {err}");
                if let Some(on_end) = on_end {
                    on_end();
                }
                return Err(err);
            }
        };

        if self.instances.contains(definition.id()) {
            if !overlay {
                self.stop_instances(definition.id());
            } else if let Some(limit) = definition.instance_limit() {
                if self.instances.count(definition.id()) >= limit {
                    log::debug!("'{}' is at its limit of {limit} instance(s), dropping play", definition.name());
                    return Ok(None);
                }
            }
        }

        let slot = self.pool.acquire(&mut self.device);
        let params = SlotParams::from_definition(&definition, definition.pick_clip(&mut self.rng));
        self.device.configure(slot, &params);
        self.device.set_slot_position(slot, position);
        self.device.play(slot);

        let id = self.instances.next_instance_id();
        self.instances.insert(ActiveInstance::new(id, Arc::clone(&definition), slot, on_end));
        log::debug!("Playing '{}' {id} (clip {})", definition.name(), params.clip);

        self.events.emit(&SfxEvent::Started(definition));
        Ok(Some(id))
    }

    /// Stop one instance of a sound, or every instance when `instance` is `None`
    ///
    /// Stopped instances never fire their completion callback. Stopping a
    /// sound with nothing playing is logged and ignored.
    ///
    /// # Errors
    /// - `NotFound` if no sound has this name
    /// - `NoActiveInstance` if the given instance is not playing
    pub fn stop<S: SoundName + ?Sized>(&mut self, sound: &S, instance: Option<InstanceId>) -> Result<(), SfxError> {
        let name = sound.sound_name();
        let definition = self.registry.lookup(name).map_err(|err| {
            log::error!("Cannot stop: {err}");
            err
        })?;

        if !self.instances.contains(definition.id()) {
            let err = SfxError::NoActiveInstance { sound: name.to_string(), instance };
            log::warn!("Nothing to stop: {err}");
            return Ok(());
        }

        match instance {
            None => self.stop_instances(definition.id()),
            Some(id) => match self.instances.remove(definition.id(), id) {
                Some(active) => self.retire(active, EndReason::Stopped),
                None => {
                    let err = SfxError::NoActiveInstance { sound: name.to_string(), instance };
                    log::error!("Cannot stop: {err}");
                    return Err(err);
                }
            },
        }
        Ok(())
    }

    /// Stop every playing instance of every sound
    pub fn stop_all(&mut self) {
        let stopped = self.instances.drain();
        if !stopped.is_empty() {
            log::debug!("Stopping all {} instance(s)", stopped.len());
        }
        for active in stopped {
            self.retire(active, EndReason::Stopped);
        }
    }

    /// Mute or unmute a mixer channel
    ///
    /// # Errors
    /// - `Device` if the device does not know the channel
    pub fn set_mute(&mut self, channel: &str, mute: bool) -> Result<(), SfxError> {
        self.device.set_channel_gain_db(channel, gain::mute_db(mute)).map_err(|err| {
            log::error!("Cannot set mute on '{channel}': {err}");
            SfxError::from(err)
        })
    }

    /// Set a mixer channel's volume in `[0, 1]` (out of range values are clamped)
    ///
    /// # Errors
    /// - `Device` if the device does not know the channel
    pub fn change_volume(&mut self, channel: &str, volume: f32) -> Result<(), SfxError> {
        let volume = gain::clamp_volume(volume);
        self.device
            .set_channel_gain_db(channel, gain::volume_to_db(volume))
            .map_err(|err| {
                log::error!("Cannot change volume of '{channel}': {err}");
                SfxError::from(err)
            })?;

        self.events.emit(&SfxEvent::VolumeChanged {
            channel: channel.to_string(),
            volume,
        });
        Ok(())
    }

    /// Current volume of a mixer channel in `[0, 1]`
    ///
    /// # Errors
    /// - `Device` if the device does not know the channel
    pub fn get_volume(&self, channel: &str) -> Result<f32, SfxError> {
        let db = self.device.channel_gain_db(channel).map_err(|err| {
            log::error!("Cannot read volume of '{channel}': {err}");
            SfxError::from(err)
        })?;
        Ok(gain::db_to_volume(db))
    }

    /// Check if any instance of a sound is playing
    ///
    /// Unknown names are logged and report false.
    pub fn is_playing<S: SoundName + ?Sized>(&self, sound: &S) -> bool {
        match self.registry.lookup(sound.sound_name()) {
            Ok(definition) => self.instances.contains(definition.id()),
            Err(err) => {
                log::error!("Cannot query: {err}");
                false
            }
        }
    }

    /// Run queued commands, then reclaim instances that finished on their own
    ///
    /// Call once per host tick.
    pub fn update(&mut self) {
        for command in self.commands.drain() {
            self.execute(command);
        }
        self.sweep();
    }

    fn execute(&mut self, command: SfxCommand) {
        let result = match command {
            SfxCommand::Play { sound, options } => self.play(sound.as_str(), options).map(|_| ()),
            SfxCommand::Stop { sound, instance } => self.stop(sound.as_str(), instance),
            SfxCommand::StopAll => {
                self.stop_all();
                Ok(())
            }
            SfxCommand::SetMute { channel, mute } => self.set_mute(&channel, mute),
            SfxCommand::ChangeVolume { channel, volume } => self.change_volume(&channel, volume),
        };
        // Already logged where it happened
        if let Err(err) = result {
            log::debug!("Queued command failed: {err}");
        }
    }

    fn sweep(&mut self) {
        let mut finished: Vec<(SoundId, InstanceId)> = self
            .instances
            .iter()
            .filter(|active| !self.device.is_playing(active.slot()))
            .map(|active| (active.sound().id(), active.id()))
            .collect();
        finished.sort_by_key(|&(_, id)| id);

        for (sound, id) in finished {
            if let Some(active) = self.instances.remove(sound, id) {
                self.retire(active, EndReason::Finished);
            }
        }
    }

    fn stop_instances(&mut self, sound: SoundId) {
        for active in self.instances.remove_all(sound) {
            self.retire(active, EndReason::Stopped);
        }
    }

    /// Release an instance already removed from the table
    fn retire(&mut self, active: ActiveInstance, reason: EndReason) {
        let id = active.id();
        let (definition, slot, on_end) = active.into_parts();
        self.pool.release(&mut self.device, slot);
        log::debug!("'{}' {id} ended ({reason:?})", definition.name());

        self.events.emit(&SfxEvent::Stopped(definition));
        if reason == EndReason::Finished {
            if let Some(on_end) = on_end {
                on_end();
            }
        }
    }

    /// Number of playing instances of a sound (0 for unknown names)
    pub fn active_count<S: SoundName + ?Sized>(&self, sound: &S) -> usize {
        self.registry
            .get(sound.sound_name())
            .map_or(0, |definition| self.instances.count(definition.id()))
    }

    /// Number of playing instances across all sounds
    pub fn total_active(&self) -> usize {
        self.instances.len()
    }

    /// Number of idle slots in the pool
    pub fn pooled_slots(&self) -> usize {
        self.pool.len()
    }

    /// Number of slots created so far
    pub fn created_slots(&self) -> usize {
        self.pool.created()
    }

    /// Sound registry
    pub fn registry(&self) -> &SoundRegistry {
        &self.registry
    }

    /// Notification channel
    pub fn events(&self) -> &SfxEvents {
        &self.events
    }

    /// Notification channel, for subscribing
    pub fn events_mut(&mut self) -> &mut SfxEvents {
        &mut self.events
    }

    /// Handle for queueing commands from callbacks and handlers
    pub fn commands(&self) -> SfxCommands {
        self.commands.clone()
    }

    /// Audio output device
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Audio output device, mutably
    ///
    /// Stopping or destroying slots behind the dispatcher's back is allowed;
    /// the next sweep treats those instances as finished.
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Stop everything and destroy every slot
    pub fn shutdown(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;

        self.stop_all();
        self.commands.drain();
        self.pool.shutdown(&mut self.device);
        log::info!("Sound effect dispatcher shutdown");
    }
}

impl<D: AudioDevice> Drop for SfxDispatcher<D> {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl<D: AudioDevice> fmt::Debug for SfxDispatcher<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SfxDispatcher")
            .field("sounds", &self.registry.len())
            .field("active", &self.instances.len())
            .field("pooled_slots", &self.pool.len())
            .field("created_slots", &self.pool.created())
            .field("queued_commands", &self.commands.len())
            .finish_non_exhaustive()
    }
}
