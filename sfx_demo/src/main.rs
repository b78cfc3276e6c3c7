//! Sound effect dispatcher demo
//!
//! Runs a short scripted scene over the headless device: a looping theme,
//! steady laser fire, explosions at random positions and an engine whose
//! start clip chains into a loop. Pass a player config path to override the
//! bundled `assets/sfx.ron`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sfx_engine::foundation::logging;
use sfx_engine::prelude::*;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

// Scene timing
const TICK_RATE: f32 = 60.0;
const RUN_SECONDS: f32 = 8.0;
const FIRE_INTERVAL: f32 = 0.15; // Faster than the laser clips, so the cap kicks in
const EXPLOSION_INTERVAL: f32 = 1.1;
const FADE_START: f32 = 5.0;
const ARENA_HALF_SIZE: f32 = 40.0;

/// Simulated clip lengths in seconds
const CLIP_LENGTHS: &[(&str, f32)] = &[
    ("sfx/laser_01.wav", 0.7),
    ("sfx/laser_02.wav", 0.8),
    ("sfx/laser_03.wav", 0.75),
    ("sfx/explosion.wav", 1.6),
    ("sfx/engine_start.wav", 0.9),
    ("sfx/engine_loop.wav", 1.2),
    ("music/theme.ogg", 32.0),
];

#[derive(Debug, Default)]
struct EventStats {
    started: usize,
    stopped: usize,
    volume_changes: usize,
}

struct SfxDemoApp {
    sfx: SfxDispatcher<HeadlessDevice>,
    rng: StdRng,
    stats: Rc<RefCell<EventStats>>,
    elapsed: f32,
    next_shot: f32,
    next_explosion: f32,
    dropped_shots: usize,
}

impl SfxDemoApp {
    fn new(config_path: PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let config = SfxPlayerConfig::load(&config_path)?;

        let mut device = HeadlessDevice::new(config.mixer()?);
        for (clip, seconds) in CLIP_LENGTHS {
            device.set_clip_length(*clip, *seconds);
        }

        let mut sfx = SfxDispatcher::from_config(device, &config)?;
        log::info!("Registered sounds: {:?}", sfx.registry().names());

        let stats = Rc::new(RefCell::new(EventStats::default()));
        let sink = Rc::clone(&stats);
        sfx.events_mut().subscribe_all(move |event: &SfxEvent| {
            let mut stats = sink.borrow_mut();
            match event {
                SfxEvent::Started(_) => stats.started += 1,
                SfxEvent::Stopped(_) => stats.stopped += 1,
                SfxEvent::VolumeChanged { .. } => stats.volume_changes += 1,
            }
        });
        sfx.events_mut().subscribe(SfxEventType::Started, |event: &SfxEvent| {
            if let Some(sound) = event.sound() {
                log::debug!("Started '{}'", sound.name());
            }
        });

        Ok(Self {
            sfx,
            rng: StdRng::from_entropy(),
            stats,
            elapsed: 0.0,
            next_shot: 0.5,
            next_explosion: 1.0,
            dropped_shots: 0,
        })
    }

    fn initialize(&mut self) -> Result<(), SfxError> {
        self.sfx.play("theme", PlayOptions::exclusive())?;

        let commands = self.sfx.commands();
        self.sfx.play(
            "engine_start",
            PlayOptions::default().on_end(move || {
                log::info!("Engine started, switching to loop");
                commands.play("engine_loop", PlayOptions::exclusive());
            }),
        )?;
        Ok(())
    }

    fn update(&mut self, dt: f32) -> Result<(), SfxError> {
        self.elapsed += dt;

        if self.elapsed >= self.next_shot {
            self.next_shot += FIRE_INTERVAL;
            if self.sfx.play("laser", PlayOptions::default())?.is_none() {
                self.dropped_shots += 1;
            }
        }

        if self.elapsed >= self.next_explosion {
            self.next_explosion += EXPLOSION_INTERVAL;
            let position = Vec3::new(
                self.rng.gen_range(-ARENA_HALF_SIZE..ARENA_HALF_SIZE),
                0.0,
                self.rng.gen_range(-ARENA_HALF_SIZE..ARENA_HALF_SIZE),
            );
            let options = PlayOptions::default()
                .at(position)
                .on_end(move || log::debug!("Explosion at {position:?} faded out"));
            self.sfx.play("explosion", options)?;
        }

        if self.elapsed >= FADE_START {
            let fade = 1.0 - (self.elapsed - FADE_START) / (RUN_SECONDS - FADE_START);
            self.sfx.change_volume("Music", fade)?;
        }

        self.sfx.device_mut().advance(dt);
        self.sfx.update();
        Ok(())
    }

    fn run(mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.initialize()?;

        let tick = Duration::from_secs_f32(1.0 / TICK_RATE);
        let mut next_report = 1.0;
        let mut last_frame = Instant::now();

        log::info!("Entering main loop");
        while self.elapsed < RUN_SECONDS {
            let now = Instant::now();
            let dt = now.duration_since(last_frame).as_secs_f32();
            last_frame = now;

            self.update(dt)?;

            if self.elapsed >= next_report {
                next_report += 1.0;
                log::info!(
                    "t={:.1}s active={} slots={} (idle {}) engine_loop={} music={:.2}",
                    self.elapsed,
                    self.sfx.total_active(),
                    self.sfx.created_slots(),
                    self.sfx.pooled_slots(),
                    self.sfx.is_playing("engine_loop"),
                    self.sfx.get_volume("Music")?,
                );
            }

            let frame_time = now.elapsed();
            if frame_time < tick {
                std::thread::sleep(tick - frame_time);
            }
        }

        self.sfx.set_mute("Master", true)?;
        self.sfx.stop_all();

        let stats = self.stats.borrow();
        log::info!(
            "Events: {} started, {} stopped, {} volume changes; {} laser shot(s) dropped at the cap",
            stats.started,
            stats.stopped,
            stats.volume_changes,
            self.dropped_shots
        );
        drop(stats);

        self.sfx.shutdown();
        Ok(())
    }
}

fn config_path() -> PathBuf {
    std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/sfx.ron"), PathBuf::from)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    log::info!("Starting sound effect demo");

    let app = SfxDemoApp::new(config_path())?;
    let result = app.run();

    match result {
        Ok(()) => {
            log::info!("Sound effect demo completed successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("Sound effect demo failed: {e}");
            Err(e)
        }
    }
}
