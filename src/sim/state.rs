//! Game state and core simulation types
//!
//! Everything the frame step reads or writes lives here. Cosmetic state
//! (faces, shake, distractions) lives in `crate::effects` instead.

use serde::{Deserialize, Serialize};

use super::profile::DifficultyProfile;
use super::spawn::SpawnPattern;
use crate::consts::*;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first start input
    #[default]
    Ready,
    /// Active gameplay
    Running,
    /// Runner hit an obstacle; terminal until reset
    GameOver,
}

/// Vertical kinematics of the runner
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RunnerState {
    /// Height above the ground line (never negative)
    pub y: f32,
    /// Vertical velocity, positive is upward
    pub velocity: f32,
    pub airborne: bool,
}

impl RunnerState {
    /// Runner standing on the ground
    pub fn grounded() -> Self {
        Self::default()
    }

    /// Start a jump. Returns false (and changes nothing) while airborne.
    pub fn jump(&mut self, impulse: f32) -> bool {
        if self.airborne {
            return false;
        }
        self.velocity = impulse;
        self.airborne = true;
        true
    }

    /// Integrate one frame of vertical motion
    ///
    /// Position moves by the current velocity before gravity is applied.
    /// Returns true on the frame the runner touches down.
    pub fn integrate(&mut self, gravity: f32) -> bool {
        if !self.airborne {
            return false;
        }
        self.y += self.velocity;
        self.velocity -= gravity;

        if self.y <= 0.0 {
            self.y = 0.0;
            self.velocity = 0.0;
            self.airborne = false;
            return true;
        }
        false
    }
}

/// Obstacle types, each drawn with its own glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObstacleKind {
    Boba,
    Ramen,
    Dumpling,
    Takoyaki,
    Sushi,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 5] = [
        ObstacleKind::Boba,
        ObstacleKind::Ramen,
        ObstacleKind::Dumpling,
        ObstacleKind::Takoyaki,
        ObstacleKind::Sushi,
    ];

    pub fn glyph(&self) -> &'static str {
        match self {
            ObstacleKind::Boba => "🧋",
            ObstacleKind::Ramen => "🍜",
            ObstacleKind::Dumpling => "🥟",
            ObstacleKind::Takoyaki => "🐙",
            ObstacleKind::Sushi => "🍣",
        }
    }
}

/// An obstacle scrolling toward the runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Left edge in field coordinates
    pub x: f32,
    pub height: f32,
    pub kind: ObstacleKind,
}

impl Obstacle {
    /// Right edge of the sprite
    pub fn right(&self) -> f32 {
        self.x + OBSTACLE_WIDTH
    }

    /// True once the whole sprite is left of the field
    pub fn has_exited(&self) -> bool {
        self.right() <= 0.0
    }
}

/// Play field dimensions, fed by resize notifications
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub width: f32,
    pub height: f32,
}

impl Default for Field {
    fn default() -> Self {
        Self {
            width: FIELD_MAX_WIDTH,
            height: FIELD_HEIGHT,
        }
    }
}

impl Field {
    /// Size the field for a viewport of the given width
    pub fn from_viewport(viewport_width: f32) -> Self {
        let width = (viewport_width - FIELD_MARGIN).clamp(FIELD_MIN_WIDTH, FIELD_MAX_WIDTH);
        Self {
            width,
            height: FIELD_HEIGHT,
        }
    }

    /// Screen-space y of the ground line (y grows downward)
    pub fn ground_y(&self) -> f32 {
        self.height - GROUND_HEIGHT
    }
}

/// Score, speed and progress of the current run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSession {
    pub score: u64,
    /// Best score seen this page session; survives resets
    pub high_score: u64,
    /// Horizontal scroll speed in pixels per frame
    pub game_speed: f32,
    /// Frames simulated since the run started
    pub frame: u64,
    pub phase: GamePhase,
}

impl RunSession {
    pub fn new(initial_speed: f32) -> Self {
        Self {
            score: 0,
            high_score: 0,
            game_speed: initial_speed,
            frame: 0,
            phase: GamePhase::Ready,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }
}

/// Things that happened during a frame step, for cosmetics and the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    Jumped { impulse: f32 },
    Landed,
    SpeedUp { speed: f32 },
    Spawned { pattern: SpawnPattern, count: usize },
    SpawnSuppressed,
    Collision { obstacle_id: u32 },
    GameOver { score: u64, high_score: u64, new_record: bool },
}

/// Complete simulation state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Active profile, fixed for the duration of a run
    pub profile: DifficultyProfile,
    pub field: Field,
    pub session: RunSession,
    pub runner: RunnerState,
    /// Obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    /// Events raised by the most recent frame step
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next obstacle ID
    next_id: u32,
}

impl GameState {
    /// Fresh state for the given profile, waiting for a start input
    pub fn new(profile: DifficultyProfile, field: Field) -> Self {
        let session = RunSession::new(profile.initial_speed);
        Self {
            profile,
            field,
            session,
            runner: RunnerState::grounded(),
            obstacles: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new obstacle ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Clear the run back to its initial values, keeping profile, field and
    /// high score. The phase returns to `Ready`.
    pub fn reset(&mut self) {
        let high_score = self.session.high_score;
        self.session = RunSession::new(self.profile.initial_speed);
        self.session.high_score = high_score;
        self.runner = RunnerState::grounded();
        self.obstacles.clear();
        self.events.clear();
    }

    /// Swap in a different profile. Refused while a run is in progress.
    pub fn set_profile(&mut self, profile: DifficultyProfile) -> bool {
        if self.session.is_running() {
            return false;
        }
        self.profile = profile;
        self.reset();
        true
    }

    /// Gravity for the current frame, scaled by speed on some profiles
    pub fn effective_gravity(&self) -> f32 {
        let p = &self.profile;
        p.gravity * (1.0 + (self.session.game_speed - p.initial_speed) * p.gravity_speed_scale)
    }

    /// Frames between spawn attempts at the current speed
    pub fn spawn_interval(&self) -> u64 {
        let p = &self.profile;
        let rate = (p.obstacle_frequency - self.session.game_speed * SPAWN_SPEED_FACTOR)
            .max(p.min_frequency);
        (rate.floor() as u64).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jump_scenario() {
        let mut runner = RunnerState::grounded();
        assert!(runner.jump(12.0));
        assert_eq!(runner.velocity, 12.0);

        runner.integrate(0.5);
        assert_eq!(runner.y, 12.0);
        assert_eq!(runner.velocity, 11.5);
        assert!(runner.airborne);

        let mut frames = 1;
        while runner.airborne {
            runner.integrate(0.5);
            assert!(runner.y >= 0.0);
            frames += 1;
            assert!(frames < 1000, "runner never landed");
        }
        assert_eq!(runner.y, 0.0);
        assert_eq!(runner.velocity, 0.0);
    }

    #[test]
    fn test_jump_while_airborne_is_noop() {
        let mut runner = RunnerState::grounded();
        runner.jump(12.0);
        runner.integrate(0.5);
        let before = runner;
        assert!(!runner.jump(12.0));
        assert_eq!(runner, before);
    }

    #[test]
    fn test_grounded_runner_does_not_move() {
        let mut runner = RunnerState::grounded();
        assert!(!runner.integrate(0.5));
        assert_eq!(runner, RunnerState::grounded());
    }

    #[test]
    fn test_field_from_viewport() {
        assert_eq!(Field::from_viewport(1920.0).width, FIELD_MAX_WIDTH);
        assert_eq!(Field::from_viewport(640.0).width, 600.0);
        assert_eq!(Field::from_viewport(0.0).width, FIELD_MIN_WIDTH);
        assert_eq!(Field::from_viewport(640.0).ground_y(), FIELD_HEIGHT - GROUND_HEIGHT);
    }

    #[test]
    fn test_reset_keeps_high_score() {
        let mut state = GameState::new(DifficultyProfile::medium(), Field::default());
        state.session.score = 42;
        state.session.high_score = 99;
        state.session.frame = 500;
        state.session.game_speed = 7.0;
        state.session.phase = GamePhase::GameOver;
        state.runner.y = 30.0;
        state.runner.airborne = true;
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle {
            id,
            x: 100.0,
            height: 40.0,
            kind: ObstacleKind::Boba,
        });

        state.reset();
        assert_eq!(state.session.score, 0);
        assert_eq!(state.session.high_score, 99);
        assert_eq!(state.session.frame, 0);
        assert_eq!(state.session.game_speed, state.profile.initial_speed);
        assert_eq!(state.session.phase, GamePhase::Ready);
        assert_eq!(state.runner, RunnerState::grounded());
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_profile_locked_while_running() {
        let mut state = GameState::new(DifficultyProfile::easy(), Field::default());
        state.session.phase = GamePhase::Running;
        assert!(!state.set_profile(DifficultyProfile::extreme()));
        assert_eq!(state.profile.name, "Easy");

        state.session.phase = GamePhase::GameOver;
        assert!(state.set_profile(DifficultyProfile::extreme()));
        assert_eq!(state.profile.name, "Extreme");
        assert_eq!(state.session.game_speed, 10.0);
    }

    #[test]
    fn test_spawn_interval() {
        let mut state = GameState::new(DifficultyProfile::easy(), Field::default());
        // 100 - 4 * 5
        assert_eq!(state.spawn_interval(), 80);
        state.session.game_speed = 8.0;
        assert_eq!(state.spawn_interval(), 60);

        let mut state = GameState::new(DifficultyProfile::extreme(), Field::default());
        assert_eq!(state.spawn_interval(), 15);
        state.session.game_speed = 18.0;
        assert_eq!(state.spawn_interval(), 15);
    }

    #[test]
    fn test_effective_gravity_scales_with_speed() {
        let mut state = GameState::new(DifficultyProfile::extreme(), Field::default());
        assert!((state.effective_gravity() - 0.7).abs() < 1e-6);
        state.session.game_speed = 15.0;
        // 0.7 * (1 + 5 * 0.08)
        assert!((state.effective_gravity() - 0.98).abs() < 1e-5);

        let mut state = GameState::new(DifficultyProfile::easy(), Field::default());
        state.session.game_speed = 8.0;
        assert_eq!(state.effective_gravity(), 0.5);
    }
}
