//! Plague Light - top-down cure-'em-up game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entity state machines, collisions, waves)
//! - `hub`: Process-wide game state + event channel bridging sim and UI
//! - `storage`: Score/progress persistence (LocalStorage on web)
//! - `game`: App shell (scenes, UI commands, intro plot sequence)

pub mod game;
pub mod hub;
pub mod sim;
pub mod storage;

pub use game::{App, Command};
pub use hub::{GameHub, HubEvent, SceneId};

/// Game tuning constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (60 Hz, matching the host render loop)
    pub const TICK_MS: f64 = 1000.0 / 60.0;

    /// Tile edge length in pixels
    pub const TILE_SIZE: f32 = 32.0;

    /// Player defaults
    pub const PLAYER_VEL: f32 = 120.0;
    pub const PLAYER_LIVES: u32 = 10;
    /// Minimum interval between weapon shots
    pub const SHOOT_DELAY_MS: f64 = 300.0;
    /// One lives-point is lost per elapsed affected window
    pub const AFFECTED_DELAY_MS: f64 = 500.0;

    /// Enemy defaults
    pub const ENEMY_LIVES: u32 = 1;
    /// Wandering enemies re-roll their direction on this interval
    pub const ENEMY_MOVE_INTERVAL_MS: f64 = 2000.0;
    /// Seed enemy speeds are uniform in [0, ENEMY_MAX_SEED_SPEED)
    pub const ENEMY_MAX_SEED_SPEED: u32 = 200;
    /// Wave respawns run this much faster than their seed enemy
    pub const WAVE_SPEED_BONUS: f32 = 10.0;
    /// Human transformation animation (4 frames at 4 fps)
    pub const TRANSFORM_ANIM_MS: f64 = 1000.0;
    /// Seconds of human countdown before the saved plague leaves the map
    pub const HUMAN_COUNTDOWN_START: i32 = 3;
    pub const HUMAN_COUNTER_INTERVAL_MS: f64 = 1000.0;

    /// Continuous weapon contact required to cure an affected aura, in seconds
    pub const AURA_AFFECTED_DURATION_S: f64 = 2.0;

    /// Weapon trails its owner by this offset along the facing axis
    pub const WEAPON_OFFSET_X: f32 = 12.0;
    pub const WEAPON_OFFSET_Y: f32 = 12.0;
    /// One-shot fire animation (11 frames at 4 fps)
    pub const WEAPON_FIRE_ANIM_MS: f64 = 2750.0;

    /// Run countdown, in seconds
    pub const COUNTDOWN_START_SECS: i64 = 300;
    /// A new wave spawns each minute when the countdown seconds hit this value
    pub const WAVE_TRIGGER_SECOND: i64 = 7;

    /// Body sizes in pixels (from the source spritesheets)
    pub const PLAYER_BODY: f32 = 32.0;
    pub const ENEMY_BODY: f32 = 32.0;
    pub const AURA_BODY: f32 = 96.0;
    pub const WEAPON_BODY: f32 = 32.0;
}

/// Seconds represented by one simulation tick
#[inline]
pub fn tick_dt() -> f32 {
    (consts::TICK_MS / 1000.0) as f32
}

/// Format a countdown as `MM:SS` (zero-padded, clamped at zero)
pub fn format_countdown(secs: i64) -> String {
    let secs = secs.max(0);
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
