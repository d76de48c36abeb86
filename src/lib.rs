//! Noodle Dash - A side-scrolling runner game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (runner physics, obstacles, collisions)
//! - `effects`: Cosmetic state driven by cancellable timers
//! - `game`: Host session tying simulation, effects and input together
//! - `platform`: Input mapping from browser events to game actions
//! - `renderer`: Canvas 2D drawing (wasm only)

pub mod effects;
pub mod game;
pub mod highscores;
pub mod platform;
#[cfg(target_arch = "wasm32")]
pub mod renderer;
pub mod settings;
pub mod sim;

pub use game::{FrameStatus, Game};
pub use highscores::HighScores;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Widest the play field gets, whatever the viewport
    pub const FIELD_MAX_WIDTH: f32 = 1000.0;
    /// Fixed play field height
    pub const FIELD_HEIGHT: f32 = 350.0;
    /// Horizontal margin subtracted from the viewport width
    pub const FIELD_MARGIN: f32 = 40.0;
    /// Smallest width a resize can shrink the field to
    pub const FIELD_MIN_WIDTH: f32 = 200.0;

    /// Height of the ground strip at the bottom of the field
    pub const GROUND_HEIGHT: f32 = 24.0;

    /// Runner sprite (fixed horizontal position)
    pub const RUNNER_X: f32 = 50.0;
    pub const RUNNER_WIDTH: f32 = 40.0;
    pub const RUNNER_HEIGHT: f32 = 60.0;

    /// Runner hitbox is narrower and shorter than the sprite
    pub const RUNNER_HITBOX_WIDTH_SCALE: f32 = 0.6;
    pub const RUNNER_HITBOX_TOP_INSET: f32 = 15.0;
    pub const RUNNER_HITBOX_BOTTOM_INSET: f32 = 6.0;

    /// Obstacle sprite width
    pub const OBSTACLE_WIDTH: f32 = 30.0;
    /// Obstacle hitbox inset on every side
    pub const OBSTACLE_HITBOX_INSET: f32 = 5.0;

    /// Random spawn distance beyond the right edge
    pub const MIN_OBSTACLE_DISTANCE: f32 = 600.0;
    pub const MAX_OBSTACLE_DISTANCE: f32 = 1200.0;

    /// Score goes up by one every this many frames
    pub const SCORE_FRAME_INTERVAL: u64 = 6;
    /// Spawn interval shrinks by this many frames per unit of speed
    pub const SPAWN_SPEED_FACTOR: f32 = 5.0;
}
