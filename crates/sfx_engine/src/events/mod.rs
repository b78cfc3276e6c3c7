//! Sound event notifications
//!
//! Key principles:
//! - Registration system (only notify interested handlers)
//! - Fan-out: every registered handler sees every matching event
//! - Immediate, synchronous delivery on the emitting thread
//!
//! Handlers cannot call back into the dispatcher while an event is being
//! delivered. Use [`crate::audio::SfxCommands`] to issue follow-up commands.

use crate::audio::definition::SoundDefinition;
use std::collections::HashMap;
use std::sync::Arc;

/// Event type identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SfxEventType {
    /// A sound instance started playing
    Started,
    /// A sound instance stopped, explicitly or on its own
    Stopped,
    /// A mixer channel volume was changed
    VolumeChanged,
}

/// Notification emitted by the dispatcher
#[derive(Debug, Clone)]
pub enum SfxEvent {
    /// A sound instance started playing
    Started(Arc<SoundDefinition>),
    /// A sound instance stopped
    Stopped(Arc<SoundDefinition>),
    /// A mixer channel volume was changed; `volume` is the clamped input in `[0, 1]`
    VolumeChanged {
        /// Mixer channel
        channel: String,
        /// Requested volume
        volume: f32,
    },
}

impl SfxEvent {
    /// Type of this event
    pub fn event_type(&self) -> SfxEventType {
        match self {
            Self::Started(_) => SfxEventType::Started,
            Self::Stopped(_) => SfxEventType::Stopped,
            Self::VolumeChanged { .. } => SfxEventType::VolumeChanged,
        }
    }

    /// Sound this event is about, if any
    pub fn sound(&self) -> Option<&Arc<SoundDefinition>> {
        match self {
            Self::Started(sound) | Self::Stopped(sound) => Some(sound),
            Self::VolumeChanged { .. } => None,
        }
    }
}

/// Event handler trait
///
/// Implemented for any `FnMut(&SfxEvent)`.
pub trait SfxEventHandler {
    /// Handle an event
    fn on_event(&mut self, event: &SfxEvent);
}

impl<F: FnMut(&SfxEvent)> SfxEventHandler for F {
    fn on_event(&mut self, event: &SfxEvent) {
        self(event);
    }
}

/// Handle returned by subscription, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u32);

type HandlerList = Vec<(SubscriptionId, Box<dyn SfxEventHandler>)>;

/// Multicast notification channel
#[derive(Default)]
pub struct SfxEvents {
    /// Handlers for one event type
    handlers: HashMap<SfxEventType, HandlerList>,
    /// Handlers for every event
    catch_all: HandlerList,
    next_id: u32,
}

impl SfxEvents {
    /// Create a channel with no subscribers
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Register a handler for a specific event type
    pub fn subscribe<H>(&mut self, event_type: SfxEventType, handler: H) -> SubscriptionId
    where
        H: SfxEventHandler + 'static,
    {
        let id = self.next_id();
        self.handlers.entry(event_type).or_default().push((id, Box::new(handler)));
        id
    }

    /// Register a handler for every event type
    pub fn subscribe_all<H>(&mut self, handler: H) -> SubscriptionId
    where
        H: SfxEventHandler + 'static,
    {
        let id = self.next_id();
        self.catch_all.push((id, Box::new(handler)));
        id
    }

    /// Remove a handler; returns false if it was not registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let lists = self.handlers.values_mut().chain(std::iter::once(&mut self.catch_all));
        for list in lists {
            if let Some(index) = list.iter().position(|(handler_id, _)| *handler_id == id) {
                list.remove(index);
                return true;
            }
        }
        false
    }

    /// Deliver an event to every interested handler, typed handlers first
    pub fn emit(&mut self, event: &SfxEvent) {
        if let Some(handlers) = self.handlers.get_mut(&event.event_type()) {
            for (_, handler) in handlers.iter_mut() {
                handler.on_event(event);
            }
        }
        for (_, handler) in &mut self.catch_all {
            handler.on_event(event);
        }
    }

    /// Total number of registered handlers
    pub fn subscriber_count(&self) -> usize {
        self.handlers.values().map(Vec::len).sum::<usize>() + self.catch_all.len()
    }
}

impl std::fmt::Debug for SfxEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SfxEvents")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
