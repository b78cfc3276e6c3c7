//! Channel gain conventions
//!
//! Channel volume is exposed to callers in `[0, 1]` and stored on the device
//! in decibels. `0.0` maps to the muted floor rather than the bottom of the
//! linear range, so "very quiet" and "muted" stay distinct.

use crate::foundation::math::utils::{inverse_lerp, lerp};

/// Gain applied when a channel is muted
pub const MUTED_DB: f32 = -80.0;

/// Bottom of the linear volume range
pub const MIN_DB: f32 = -40.0;

/// No attenuation
pub const MAX_DB: f32 = 0.0;

/// Gain for a mute toggle
pub fn mute_db(mute: bool) -> f32 {
    if mute { MUTED_DB } else { MAX_DB }
}

/// Clamp a caller-supplied volume into `[0, 1]` (NaN becomes 0)
pub fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        return 0.0;
    }
    volume.clamp(0.0, 1.0)
}

/// Map a `[0, 1]` volume to decibels
///
/// Anything that lands on or below [`MIN_DB`] collapses to [`MUTED_DB`].
pub fn volume_to_db(volume: f32) -> f32 {
    let db = lerp(MIN_DB, MAX_DB, clamp_volume(volume));
    if db <= MIN_DB { MUTED_DB } else { db }
}

/// Map decibels back to a `[0, 1]` volume
pub fn db_to_volume(db: f32) -> f32 {
    inverse_lerp(MIN_DB, MAX_DB, db).clamp(0.0, 1.0)
}

/// Linear amplitude factor for a gain in decibels
pub fn db_to_amplitude(db: f32) -> f32 {
    if db <= MUTED_DB {
        return 0.0;
    }
    10f32.powf(db / 20.0)
}
