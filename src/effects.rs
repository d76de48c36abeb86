//! Cosmetic effects
//!
//! Faces, run animation, screen shake, background cycling, distractions and
//! flashes. These run on their own periodic timers and only ever read the
//! simulation state; nothing here can change how a run plays out.

use glam::Vec2;
use rand::Rng;

use crate::settings::Settings;
use crate::sim::{GameEvent, GameState};

/// Runner expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Grin,
    Laughing,
    SweatSmile,
    Joy,
    Rofl,
    Smile,
    Cool,
    /// Shown mid-jump
    Scared,
    /// Shown after a collision
    Dead,
}

/// Faces picked at random while running
pub const RUNNING_FACES: [Face; 7] = [
    Face::Grin,
    Face::Laughing,
    Face::SweatSmile,
    Face::Joy,
    Face::Rofl,
    Face::Smile,
    Face::Cool,
];

impl Face {
    pub fn glyph(&self) -> &'static str {
        match self {
            Face::Grin => "😁",
            Face::Laughing => "😆",
            Face::SweatSmile => "😅",
            Face::Joy => "😂",
            Face::Rofl => "🤣",
            Face::Smile => "😊",
            Face::Cool => "😎",
            Face::Scared => "😱",
            Face::Dead => "😵",
        }
    }

    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        RUNNING_FACES[rng.random_range(0..RUNNING_FACES.len())]
    }
}

/// Background colour pairs cycled on chaos profiles
pub const GRADIENT_SETS: [[&str; 2]; 5] = [
    ["#ff416c", "#ff4b2b"],
    ["#fc4a1a", "#f7b733"],
    ["#7303c0", "#ec38bc"],
    ["#20002c", "#cbb4d4"],
    ["#000046", "#1CB5E0"],
];

pub const DISTRACTION_GLYPHS: [&str; 8] = ["💥", "⚡", "✨", "💫", "🌀", "🔥", "⭐", "💢"];

/// Oldest distractions are dropped beyond this
pub const MAX_DISTRACTIONS: usize = 12;

/// How long a speed-up shake lasts
const SPEED_UP_SHAKE_MS: f64 = 200.0;
/// How long a screen flash lasts
const FLASH_MS: f64 = 100.0;
/// Per-frame flash probability on chaos profiles
const FLASH_CHANCE: f32 = 0.01;
/// A timer fires at most this many times per advance, after a long stall
const MAX_CATCH_UP: u32 = 4;

/// Periodic cosmetic jobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CosmeticTask {
    /// New running face (skipped while airborne)
    FaceChange,
    /// Toggle the two-frame run cycle
    RunAnimation,
    /// Pick a new background colour pair
    GradientColors,
    /// Rotate the background gradient
    GradientAngle,
    /// Random screen jitter
    Shake,
    /// Maybe add a floating distraction
    DistractionSpawn,
    /// Spin and wobble existing distractions
    DistractionDrift,
}

impl CosmeticTask {
    pub fn period_ms(&self) -> f64 {
        match self {
            CosmeticTask::FaceChange => 3000.0,
            CosmeticTask::RunAnimation => 100.0,
            CosmeticTask::GradientColors => 2000.0,
            CosmeticTask::GradientAngle => 200.0,
            CosmeticTask::Shake => 100.0,
            CosmeticTask::DistractionSpawn => 800.0,
            CosmeticTask::DistractionDrift => 100.0,
        }
    }

    /// Only scheduled on profiles with chaos effects
    pub fn chaos_only(&self) -> bool {
        !matches!(self, CosmeticTask::FaceChange | CosmeticTask::RunAnimation)
    }

    const ALL: [CosmeticTask; 7] = [
        CosmeticTask::FaceChange,
        CosmeticTask::RunAnimation,
        CosmeticTask::GradientColors,
        CosmeticTask::GradientAngle,
        CosmeticTask::Shake,
        CosmeticTask::DistractionSpawn,
        CosmeticTask::DistractionDrift,
    ];
}

#[derive(Debug, Clone)]
struct Timer {
    task: CosmeticTask,
    elapsed_ms: f64,
}

/// A set of periodic timers that can be cancelled all at once
#[derive(Debug, Clone, Default)]
pub struct TaskScheduler {
    timers: Vec<Timer>,
}

impl TaskScheduler {
    /// Scheduler with nothing running
    pub fn new() -> Self {
        Self::default()
    }

    /// Timers for one run
    pub fn for_run(chaos: bool) -> Self {
        let timers = CosmeticTask::ALL
            .iter()
            .filter(|t| chaos || !t.chaos_only())
            .map(|&task| Timer {
                task,
                elapsed_ms: 0.0,
            })
            .collect();
        Self { timers }
    }

    /// Advance every timer and return the tasks that came due, in
    /// scheduling order
    pub fn advance(&mut self, dt_ms: f64) -> Vec<CosmeticTask> {
        let mut due = Vec::new();
        if dt_ms <= 0.0 || !dt_ms.is_finite() {
            return due;
        }
        for timer in &mut self.timers {
            let period = timer.task.period_ms();
            timer.elapsed_ms += dt_ms;
            let mut fired = 0;
            while timer.elapsed_ms >= period {
                timer.elapsed_ms -= period;
                if fired < MAX_CATCH_UP {
                    due.push(timer.task);
                    fired += 1;
                }
            }
        }
        due
    }

    /// Stop every timer. Further advances fire nothing.
    pub fn cancel(&mut self) {
        if !self.timers.is_empty() {
            log::debug!("Cancelled {} cosmetic timers", self.timers.len());
        }
        self.timers.clear();
    }

    pub fn is_active(&self) -> bool {
        !self.timers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

/// A floating decoration drawn over the field
#[derive(Debug, Clone, PartialEq)]
pub struct Distraction {
    pub pos: Vec2,
    pub glyph: &'static str,
    pub size: f32,
    /// Degrees
    pub rotation: f32,
}

/// Display-only state read by the renderer
#[derive(Debug, Clone)]
pub struct Effects {
    pub face: Face,
    /// 0 or 1
    pub run_frame: u8,
    /// Index into `GRADIENT_SETS`
    pub gradient: usize,
    /// Degrees
    pub gradient_angle: f32,
    /// Screen offset in pixels
    pub shake: Vec2,
    pub distractions: Vec<Distraction>,
    /// Time left on a temporary shake
    shake_hold_ms: f64,
    /// Time left on the current flash
    flash_ms: f64,
    allow_shake: bool,
    allow_flash: bool,
    allow_distractions: bool,
}

impl Effects {
    pub fn new(settings: &Settings) -> Self {
        Self {
            face: Face::Cool,
            run_frame: 0,
            gradient: 0,
            gradient_angle: 0.0,
            shake: Vec2::ZERO,
            distractions: Vec::new(),
            shake_hold_ms: 0.0,
            flash_ms: 0.0,
            allow_shake: settings.effective_screen_shake(),
            allow_flash: settings.effective_flashes(),
            allow_distractions: settings.effective_distractions(),
        }
    }

    /// Back to calm visuals for a new run
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.face = Face::random(rng);
        self.run_frame = 0;
        self.gradient = 0;
        self.gradient_angle = 0.0;
        self.shake = Vec2::ZERO;
        self.distractions.clear();
        self.shake_hold_ms = 0.0;
        self.flash_ms = 0.0;
    }

    pub fn gradient_colors(&self) -> [&'static str; 2] {
        GRADIENT_SETS[self.gradient % GRADIENT_SETS.len()]
    }

    pub fn is_flashing(&self) -> bool {
        self.flash_ms > 0.0
    }

    fn random_shake<R: Rng + ?Sized>(&mut self, intensity: f32, rng: &mut R) {
        if !self.allow_shake {
            return;
        }
        self.shake = Vec2::new(
            (rng.random::<f32>() - 0.5) * intensity,
            (rng.random::<f32>() - 0.5) * intensity,
        );
    }

    /// React to what the simulation reported this frame
    pub fn on_event<R: Rng + ?Sized>(&mut self, event: &GameEvent, chaos: bool, rng: &mut R) {
        match event {
            GameEvent::Started => self.reset(rng),
            GameEvent::Jumped { .. } => self.face = Face::Scared,
            GameEvent::Landed => self.face = Face::random(rng),
            GameEvent::SpeedUp { .. } if chaos => {
                self.random_shake(10.0, rng);
                self.shake_hold_ms = SPEED_UP_SHAKE_MS;
            }
            GameEvent::GameOver { .. } => {
                self.face = Face::Dead;
                if chaos {
                    self.random_shake(20.0, rng);
                }
            }
            _ => {}
        }
    }

    /// Run one scheduled task against a read-only view of the simulation
    pub fn run_task<R: Rng + ?Sized>(&mut self, task: CosmeticTask, state: &GameState, rng: &mut R) {
        match task {
            CosmeticTask::FaceChange => {
                if !state.runner.airborne {
                    self.face = Face::random(rng);
                }
            }
            CosmeticTask::RunAnimation => self.run_frame ^= 1,
            CosmeticTask::GradientColors => {
                self.gradient = rng.random_range(0..GRADIENT_SETS.len());
            }
            CosmeticTask::GradientAngle => {
                self.gradient_angle = (self.gradient_angle + 15.0) % 360.0;
            }
            CosmeticTask::Shake => {
                if rng.random::<f32>() > 0.7 {
                    let intensity = 3.0 + rng.random_range(0..5) as f32;
                    self.random_shake(intensity, rng);
                } else {
                    self.shake = Vec2::ZERO;
                }
            }
            CosmeticTask::DistractionSpawn => {
                if self.allow_distractions && rng.random::<f32>() > 0.7 {
                    let field = state.field;
                    let distraction = Distraction {
                        pos: Vec2::new(
                            rng.random::<f32>() * field.width,
                            rng.random::<f32>() * field.height,
                        ),
                        glyph: DISTRACTION_GLYPHS[rng.random_range(0..DISTRACTION_GLYPHS.len())],
                        size: 20.0 + rng.random::<f32>() * 30.0,
                        rotation: rng.random::<f32>() * 360.0,
                    };
                    if self.distractions.len() >= MAX_DISTRACTIONS {
                        self.distractions.remove(0);
                    }
                    self.distractions.push(distraction);
                }
            }
            CosmeticTask::DistractionDrift => {
                for d in &mut self.distractions {
                    d.rotation += 10.0;
                    d.pos.x += (rng.random::<f32>() - 0.5) * 5.0;
                    d.pos.y += (rng.random::<f32>() - 0.5) * 5.0;
                }
            }
        }
    }

    /// Per-frame bookkeeping: expire temporary effects, roll for a flash
    pub fn on_frame<R: Rng + ?Sized>(&mut self, dt_ms: f64, chaos: bool, rng: &mut R) {
        if self.shake_hold_ms > 0.0 {
            self.shake_hold_ms -= dt_ms;
            if self.shake_hold_ms <= 0.0 {
                self.shake_hold_ms = 0.0;
                self.shake = Vec2::ZERO;
            }
        }
        if self.flash_ms > 0.0 {
            self.flash_ms = (self.flash_ms - dt_ms).max(0.0);
        }
        if chaos && self.allow_flash && rng.random::<f32>() < FLASH_CHANCE {
            self.flash_ms = FLASH_MS;
        }
    }
}
