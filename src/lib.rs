//! Flappy Axolotl - an underwater flappy side-scroller
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, collisions, game modes)
//! - `renderer`: Frame description built from game state, plus the canvas backend
//! - `app`: Host glue shared by the browser and native entry points
//! - `persistence`: Key/value storage for high scores and settings
//! - `audio`: Synthesized cue table and background melody
//! - `web`: Browser host, started when the wasm module loads

pub mod app;
pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod renderer;
pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use app::{App, InputEvent};
pub use highscores::HighScores;
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
///
/// Distances are logical pixels, rates are per tick at the nominal 60 Hz
/// display rate.
pub mod consts {
    /// Nominal display rate; one simulation tick per frame
    pub const TICK_HZ: f32 = 60.0;

    /// Playfield dimensions
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 650.0;
    /// Sandy floor strip at the bottom of the canvas
    pub const FLOOR_HEIGHT: f32 = 50.0;

    /// Player physics
    pub const GRAVITY: f32 = 0.38;
    pub const FLAP_VELOCITY: f32 = -8.0;
    pub const PLAYER_START_X: f32 = 50.0;
    pub const PLAYER_START_Y: f32 = 300.0;
    pub const PLAYER_WIDTH: f32 = 50.0;
    pub const PLAYER_HEIGHT: f32 = 30.0;
    /// Lowest legal y before the player counts as out of bounds
    pub const PLAYER_MAX_Y: f32 = CANVAS_HEIGHT - 70.0;
    /// Where the player is pushed back to after leaving the top
    pub const PLAYER_CLAMP_TOP: f32 = 10.0;
    /// Obstacle hits ignore this much of the player's box on every side
    pub const OBSTACLE_HITBOX_INSET: f32 = 5.0;

    /// Lives
    pub const START_LIVES: u32 = 3;
    /// Invulnerability window after a hit (2 seconds)
    pub const INVULNERABLE_TICKS: u32 = 120;

    /// Scroll speed and difficulty ramp
    pub const BASE_SCROLL_SPEED: f32 = 2.2;
    pub const MAX_SCROLL_SPEED: f32 = 3.5;
    pub const SPEED_PER_LEVEL: f32 = 0.12;
    pub const MAX_DIFFICULTY: u32 = 12;
    pub const POINTS_PER_LEVEL: u64 = 2;

    /// Obstacles
    pub const OBSTACLE_WIDTH: f32 = 60.0;
    pub const OBSTACLE_SPACING: f32 = 250.0;
    pub const MAX_GAP: f32 = 200.0;
    pub const MIN_GAP: f32 = 130.0;
    pub const GAP_SHRINK_PER_LEVEL: f32 = 7.0;
    pub const OBSTACLE_MARGIN: f32 = 50.0;

    /// Pickups drift at a fixed speed, independent of the scroll speed
    pub const PICKUP_DRIFT: f32 = 2.0;
    pub const COLLECTIBLE_SIZE: f32 = 30.0;
    pub const BONUS_LIFE_SIZE: f32 = 35.0;

    /// Mermaid dropper
    pub const DROPPER_SPEED: f32 = 3.0;
    pub const DROPPER_WIDTH: f32 = 50.0;
    pub const DROPPER_HEIGHT: f32 = 70.0;
    pub const DROP_RANGE_MIN: f32 = 180.0;
    pub const DROP_RANGE_MAX: f32 = 250.0;

    /// Power-up durations
    pub const SLOW_TICKS: u32 = 300;
    pub const SHRINK_TICKS: u32 = 300;
    pub const INVINCIBLE_TICKS: u32 = 180;
    pub const SLOW_MULTIPLIER: f32 = 0.5;
    pub const INVINCIBLE_MULTIPLIER: f32 = 1.5;

    /// Bosses
    pub const BOSS_SCORE_INTERVAL: u64 = 20;
    pub const BOSS_MAX_HEALTH: u32 = 5;
    pub const BOSS_DEFEAT_BONUS: u64 = 5;
    pub const BOSS_ENTRY_SPEED: f32 = 3.0;
    pub const BOSS_EXIT_SPEED: f32 = 3.0;
    pub const BOSS_ENGAGE_X: f32 = CANVAS_WIDTH - 150.0;
    pub const BOSS_EXIT_Y: f32 = -200.0;
    pub const BOSS_ATTACK_INTERVAL: u32 = 120;

    /// Boss hazards (nets and whirlpools)
    pub const HAZARD_SIZE: f32 = 50.0;
    pub const HAZARD_DRIFT: f32 = 1.5;
    /// Deploy spin before a hazard becomes collidable (0.3 s)
    pub const HAZARD_ARM_TICKS: u32 = 18;
    /// Hazards vanish after 10 seconds
    pub const HAZARD_LIFETIME_TICKS: u32 = 600;
}
