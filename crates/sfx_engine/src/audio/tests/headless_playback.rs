//! Dispatcher driven over the simulated device with real clip timing

use crate::audio::{ChannelMixer, HeadlessDevice, PlayOptions, SfxDispatcher, SoundDefinition};
use crate::foundation::logging;
use std::cell::Cell;
use std::rc::Rc;

const DT: f32 = 1.0 / 60.0;

fn dispatcher() -> SfxDispatcher<HeadlessDevice> {
    logging::init_for_tests();
    let device = HeadlessDevice::new(ChannelMixer::with_channels(["Sfx"]))
        .with_clip("short.wav", 0.25)
        .with_clip("long.wav", 2.0);
    let mut sfx = SfxDispatcher::with_seed(device, 3);
    sfx.register([
        SoundDefinition::new("short", "short.wav").with_channel("Sfx"),
        SoundDefinition::new("fast", "long.wav").with_pitch(2.0),
        SoundDefinition::new("ambience", "long.wav").with_looping(true),
        SoundDefinition::new("broken", "missing.wav"),
    ]);
    sfx
}

fn tick(sfx: &mut SfxDispatcher<HeadlessDevice>, seconds: f32) {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let steps = (seconds / DT).round() as usize;
    for _ in 0..steps {
        sfx.device_mut().advance(DT);
        sfx.update();
    }
}

#[test]
fn test_short_clip_finishes() {
    let mut sfx = dispatcher();
    let done = Rc::new(Cell::new(false));
    let flag = Rc::clone(&done);
    sfx.play("short", PlayOptions::default().on_end(move || flag.set(true))).unwrap();

    tick(&mut sfx, 0.1);
    assert!(sfx.is_playing("short"));
    assert!(!done.get());

    tick(&mut sfx, 0.3);
    assert!(!sfx.is_playing("short"));
    assert!(done.get());
    assert_eq!(sfx.device().playing_count(), 0);
}

#[test]
fn test_pitch_shortens_playback() {
    let mut sfx = dispatcher();
    sfx.play("fast", PlayOptions::default()).unwrap();

    tick(&mut sfx, 0.9);
    assert!(sfx.is_playing("fast"));
    tick(&mut sfx, 0.2);
    assert!(!sfx.is_playing("fast"));
}

#[test]
fn test_looping_sound_plays_until_stopped() {
    let mut sfx = dispatcher();
    sfx.play("ambience", PlayOptions::default()).unwrap();

    tick(&mut sfx, 5.0);
    assert!(sfx.is_playing("ambience"));

    sfx.stop("ambience", None).unwrap();
    assert_eq!(sfx.device().playing_count(), 0);
}

#[test]
fn test_missing_clip_is_reclaimed_next_tick() {
    let mut sfx = dispatcher();
    let done = Rc::new(Cell::new(0));
    let count = Rc::clone(&done);
    sfx.play("broken", PlayOptions::default().on_end(move || count.set(count.get() + 1)))
        .unwrap();
    assert!(sfx.is_playing("broken"));

    sfx.update();
    assert!(!sfx.is_playing("broken"));
    assert_eq!(done.get(), 1);
    assert_eq!(sfx.pooled_slots(), sfx.created_slots());
}

#[test]
fn test_chained_plays_through_commands() {
    let mut sfx = dispatcher();
    let commands = sfx.commands();
    let remaining = Rc::new(Cell::new(3));

    fn chain(commands: crate::audio::SfxCommands, remaining: Rc<Cell<u32>>) -> PlayOptions {
        PlayOptions::default().on_end(move || {
            remaining.set(remaining.get() - 1);
            if remaining.get() > 0 {
                let next = chain(commands.clone(), Rc::clone(&remaining));
                commands.play("short", next);
            }
        })
    }

    sfx.play("short", chain(commands, Rc::clone(&remaining))).unwrap();
    tick(&mut sfx, 2.0);

    assert_eq!(remaining.get(), 0);
    assert!(!sfx.is_playing("short"));
    assert_eq!(sfx.created_slots(), 1);
}
