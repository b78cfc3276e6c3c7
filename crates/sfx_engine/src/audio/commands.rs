//! Deferred command surface
//!
//! Completion callbacks and event handlers run while the dispatcher is
//! borrowed, so they cannot call it directly. [`SfxCommands`] is a cloneable
//! handle that queues commands instead; the dispatcher drains the queue in
//! FIFO order at the start of every [`update`](crate::audio::SfxDispatcher::update).

use crate::audio::instances::{EndCallback, InstanceId};
use crate::foundation::math::Vec3;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

/// Options for a single play request
pub struct PlayOptions {
    /// Layer over instances already playing; when false, those are stopped first
    pub overlay: bool,
    /// Fired once when the instance finishes on its own, or immediately if
    /// the sound is unknown
    pub on_end: Option<EndCallback>,
    /// World position; `None` plays at the listener-local origin
    pub position: Option<Vec3>,
}

impl Default for PlayOptions {
    fn default() -> Self {
        Self {
            overlay: true,
            on_end: None,
            position: None,
        }
    }
}

impl PlayOptions {
    /// Stop other instances of the sound before playing
    pub fn exclusive() -> Self {
        Self { overlay: false, ..Self::default() }
    }

    /// Set the overlay flag
    pub fn overlay(mut self, overlay: bool) -> Self {
        self.overlay = overlay;
        self
    }

    /// Attach a completion callback
    pub fn on_end<F: FnOnce() + 'static>(mut self, callback: F) -> Self {
        self.on_end = Some(Box::new(callback));
        self
    }

    /// Play at a world position
    pub fn at(mut self, position: Vec3) -> Self {
        self.position = Some(position);
        self
    }
}

impl fmt::Debug for PlayOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayOptions")
            .field("overlay", &self.overlay)
            .field("on_end", &self.on_end.is_some())
            .field("position", &self.position)
            .finish()
    }
}

/// A queued dispatcher command
#[derive(Debug)]
pub enum SfxCommand {
    /// Play a sound by name
    Play {
        /// Sound name
        sound: String,
        /// Play options
        options: PlayOptions,
    },
    /// Stop one instance, or every instance, of a sound
    Stop {
        /// Sound name
        sound: String,
        /// Instance to stop; `None` stops all of them
        instance: Option<InstanceId>,
    },
    /// Stop everything
    StopAll,
    /// Mute or unmute a mixer channel
    SetMute {
        /// Mixer channel
        channel: String,
        /// Mute flag
        mute: bool,
    },
    /// Change a mixer channel's volume
    ChangeVolume {
        /// Mixer channel
        channel: String,
        /// Volume in `[0, 1]`
        volume: f32,
    },
}

/// Cloneable handle for queueing commands
///
/// Not `Send`: all playback happens on one thread.
#[derive(Clone, Default)]
pub struct SfxCommands {
    queue: Rc<RefCell<VecDeque<SfxCommand>>>,
}

impl SfxCommands {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw command
    pub fn push(&self, command: SfxCommand) {
        self.queue.borrow_mut().push_back(command);
    }

    /// Queue a play request
    pub fn play<S: Into<String>>(&self, sound: S, options: PlayOptions) {
        self.push(SfxCommand::Play { sound: sound.into(), options });
    }

    /// Queue a stop request
    pub fn stop<S: Into<String>>(&self, sound: S, instance: Option<InstanceId>) {
        self.push(SfxCommand::Stop { sound: sound.into(), instance });
    }

    /// Queue a stop-all request
    pub fn stop_all(&self) {
        self.push(SfxCommand::StopAll);
    }

    /// Queue a mute change
    pub fn set_mute<S: Into<String>>(&self, channel: S, mute: bool) {
        self.push(SfxCommand::SetMute { channel: channel.into(), mute });
    }

    /// Queue a volume change
    pub fn change_volume<S: Into<String>>(&self, channel: S, volume: f32) {
        self.push(SfxCommand::ChangeVolume { channel: channel.into(), volume });
    }

    /// Number of queued commands
    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Check if nothing is queued
    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }

    /// Take every queued command, oldest first
    ///
    /// The borrow is released before returning, so commands pushed while the
    /// batch is executed wait for the next drain.
    pub(crate) fn drain(&self) -> Vec<SfxCommand> {
        self.queue.borrow_mut().drain(..).collect()
    }
}

impl fmt::Debug for SfxCommands {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SfxCommands").field("queued", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_options_defaults() {
        let options = PlayOptions::default();
        assert!(options.overlay);
        assert!(options.on_end.is_none());
        assert!(options.position.is_none());

        assert!(!PlayOptions::exclusive().overlay);
    }

    #[test]
    fn test_play_options_builder() {
        let options = PlayOptions::default()
            .overlay(false)
            .on_end(|| {})
            .at(Vec3::new(1.0, 2.0, 3.0));
        assert!(!options.overlay);
        assert!(options.on_end.is_some());
        assert_eq!(options.position, Some(Vec3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_clones_share_queue() {
        let commands = SfxCommands::new();
        let clone = commands.clone();

        clone.play("click", PlayOptions::default());
        commands.stop_all();

        assert_eq!(commands.len(), 2);
        assert_eq!(clone.len(), 2);
    }

    #[test]
    fn test_drain_is_fifo() {
        let commands = SfxCommands::new();
        commands.set_mute("Sfx", true);
        commands.change_volume("Music", 0.5);
        commands.stop("boom", None);

        let drained = commands.drain();
        assert!(commands.is_empty());
        assert!(matches!(&drained[0], SfxCommand::SetMute { channel, mute: true } if channel == "Sfx"));
        assert!(matches!(&drained[1], SfxCommand::ChangeVolume { channel, .. } if channel == "Music"));
        assert!(matches!(&drained[2], SfxCommand::Stop { sound, instance: None } if sound == "boom"));
    }
}
