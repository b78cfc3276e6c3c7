//! Mute and volume mapping through the dispatcher

use super::mock_device::MockDevice;
use crate::audio::gain::{MAX_DB, MUTED_DB};
use crate::audio::{DeviceError, PlayOptions, SfxDispatcher, SfxError, SoundDefinition};
use crate::events::{SfxEvent, SfxEventType};
use approx::assert_relative_eq;
use std::cell::RefCell;
use std::rc::Rc;

fn dispatcher() -> (SfxDispatcher<MockDevice>, MockDevice) {
    let device = MockDevice::new();
    let handle = device.handle();
    (SfxDispatcher::with_seed(device, 0), handle)
}

fn volume_events(sfx: &mut SfxDispatcher<MockDevice>) -> Rc<RefCell<Vec<(String, f32)>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    sfx.events_mut().subscribe(SfxEventType::VolumeChanged, move |event: &SfxEvent| {
        if let SfxEvent::VolumeChanged { channel, volume } = event {
            sink.borrow_mut().push((channel.clone(), *volume));
        }
    });
    seen
}

#[test]
fn test_mute_and_unmute() {
    let (mut sfx, device) = dispatcher();

    sfx.set_mute("Sfx", true).unwrap();
    assert_relative_eq!(device.gain("Sfx").unwrap(), MUTED_DB);

    sfx.set_mute("Sfx", false).unwrap();
    assert_relative_eq!(device.gain("Sfx").unwrap(), MAX_DB);
}

#[test]
fn test_mute_leaves_instances_alone() {
    let (mut sfx, _device) = dispatcher();
    sfx.register([SoundDefinition::new("click", "click.wav").with_channel("Sfx")]);
    sfx.play("click", PlayOptions::default()).unwrap();

    sfx.set_mute("Sfx", true).unwrap();
    assert!(sfx.is_playing("click"));
}

#[test]
fn test_volume_endpoints() {
    let (mut sfx, device) = dispatcher();

    sfx.change_volume("Music", 0.0).unwrap();
    assert_relative_eq!(device.gain("Music").unwrap(), MUTED_DB);
    assert_relative_eq!(sfx.get_volume("Music").unwrap(), 0.0);

    sfx.change_volume("Music", 1.0).unwrap();
    assert_relative_eq!(device.gain("Music").unwrap(), MAX_DB);
    assert_relative_eq!(sfx.get_volume("Music").unwrap(), 1.0);
}

#[test]
fn test_volume_round_trips_interior_values() {
    let (mut sfx, device) = dispatcher();

    for volume in [0.1, 0.25, 0.5, 0.75, 0.9] {
        sfx.change_volume("Sfx", volume).unwrap();
        assert_relative_eq!(sfx.get_volume("Sfx").unwrap(), volume, epsilon = 1e-5);
    }
    assert_relative_eq!(device.gain("Sfx").unwrap(), -4.0, epsilon = 1e-4);
}

#[test]
fn test_volume_clamped_and_reported() {
    let (mut sfx, device) = dispatcher();
    let seen = volume_events(&mut sfx);

    sfx.change_volume("Sfx", 1.5).unwrap();
    sfx.change_volume("Sfx", -0.5).unwrap();

    assert_relative_eq!(device.gain("Sfx").unwrap(), MUTED_DB);
    assert_eq!(*seen.borrow(), vec![("Sfx".to_string(), 1.0), ("Sfx".to_string(), 0.0)]);
}

#[test]
fn test_mute_reads_back_as_zero_volume() {
    let (mut sfx, _device) = dispatcher();
    sfx.set_mute("Master", true).unwrap();
    assert_relative_eq!(sfx.get_volume("Master").unwrap(), 0.0);
}

#[test]
fn test_unknown_channel() {
    let (mut sfx, _device) = dispatcher();
    let seen = volume_events(&mut sfx);

    assert!(matches!(
        sfx.change_volume("Voice", 0.5),
        Err(SfxError::Device(DeviceError::UnknownChannel(channel))) if channel == "Voice"
    ));
    assert!(matches!(sfx.set_mute("Voice", true), Err(SfxError::Device(_))));
    assert!(matches!(sfx.get_volume("Voice"), Err(SfxError::Device(_))));
    assert!(seen.borrow().is_empty());
}

#[test]
fn test_queued_channel_commands() {
    let (mut sfx, device) = dispatcher();
    let commands = sfx.commands();
    commands.set_mute("Music", true);
    commands.change_volume("Sfx", 0.5);
    commands.change_volume("Voice", 0.5);

    sfx.update();
    assert_relative_eq!(device.gain("Music").unwrap(), MUTED_DB);
    assert_relative_eq!(device.gain("Sfx").unwrap(), -20.0);
}
