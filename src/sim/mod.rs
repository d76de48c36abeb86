//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One step per display frame, no wall-clock time
//! - Randomness only from the RNG handed to `tick`
//! - Obstacles kept in spawn order
//! - No rendering or platform dependencies

pub mod collision;
pub mod profile;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Hitbox, find_collision, obstacle_hitbox, runner_hitbox};
pub use profile::{Background, DifficultyProfile, ProfileError, ProfileSet, SpawnRules, SpeedBurst};
pub use spawn::{SpawnPattern, SpawnPlan, SpawnTable, plan_spawn};
pub use state::{
    Field, GameEvent, GamePhase, GameState, Obstacle, ObstacleKind, RunSession, RunnerState,
};
pub use tick::{TickInput, TickOutcome, jump, start, step, tick};
