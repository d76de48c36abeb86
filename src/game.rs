//! Host session
//!
//! Owns the simulation state, cosmetic effects and their timers, and tells
//! the host whether it should keep scheduling frames. The browser front end
//! and the native simulator both drive the game through this type.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::effects::{Effects, TaskScheduler};
use crate::highscores::HighScores;
use crate::platform::{InputAction, action_for_key, action_for_touch};
use crate::settings::Settings;
use crate::sim::{
    DifficultyProfile, Field, GameEvent, GamePhase, GameState, ProfileSet, TickInput, TickOutcome,
    tick,
};

/// Stream used for the cosmetic RNG so it never shares draws with the sim
const EFFECTS_STREAM: u64 = 0x5eed_f00d;

/// What the host should do after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// Schedule another frame
    Continue,
    /// The run is not in progress; stop scheduling until the next start
    Stopped,
}

/// A game session: one selected profile, any number of runs
pub struct Game {
    pub state: GameState,
    pub effects: Effects,
    pub high_scores: HighScores,
    pub settings: Settings,
    profiles: ProfileSet,
    profile_index: usize,
    input: TickInput,
    sim_rng: Pcg32,
    fx_rng: Pcg32,
    tasks: TaskScheduler,
}

impl Game {
    pub fn new(seed: u64, settings: Settings, profiles: ProfileSet) -> Self {
        let profile_index = match profiles.position(&settings.difficulty) {
            Some(i) => i,
            None => {
                log::warn!(
                    "Unknown difficulty `{}`, using {}",
                    settings.difficulty,
                    profiles.get(0).map(|p| p.name.as_str()).unwrap_or("default")
                );
                0
            }
        };
        let profile = profiles.get(profile_index).cloned().unwrap_or_default();
        log::info!("Game created with seed {} on {}", seed, profile.name);

        Self {
            state: GameState::new(profile, Field::default()),
            effects: Effects::new(&settings),
            high_scores: HighScores::new(),
            settings,
            profiles,
            profile_index,
            input: TickInput::default(),
            sim_rng: Pcg32::seed_from_u64(seed),
            fx_rng: Pcg32::new(seed, EFFECTS_STREAM),
            tasks: TaskScheduler::new(),
        }
    }

    /// Built-in profiles and default settings
    pub fn with_defaults(seed: u64) -> Self {
        Self::new(seed, Settings::default(), ProfileSet::default())
    }

    pub fn profiles(&self) -> &ProfileSet {
        &self.profiles
    }

    pub fn profile_index(&self) -> usize {
        self.profile_index
    }

    pub fn profile(&self) -> &DifficultyProfile {
        &self.state.profile
    }

    pub fn phase(&self) -> GamePhase {
        self.state.session.phase
    }

    /// Whether cosmetic timers are currently scheduled
    pub fn tasks_active(&self) -> bool {
        self.tasks.is_active()
    }

    /// Choose a profile for the next run. Refused while a run is in
    /// progress or for an unknown index.
    pub fn select_profile(&mut self, index: usize) -> bool {
        let Some(profile) = self.profiles.get(index).cloned() else {
            return false;
        };
        let name = profile.name.clone();
        if !self.state.set_profile(profile) {
            log::debug!("Profile change to {} refused mid-run", name);
            return false;
        }
        self.profile_index = index;
        log::info!("Selected profile {}", name);
        true
    }

    /// Resize the field for a new viewport width
    pub fn resize(&mut self, viewport_width: f32) {
        self.state.field = Field::from_viewport(viewport_width);
        log::debug!("Field resized to {}x{}", self.state.field.width, self.state.field.height);
    }

    /// Queue a jump for the next frame. Dropped unless a run is in progress.
    pub fn press_jump(&mut self) {
        if self.state.session.is_running() {
            self.input.jump = true;
        }
    }

    /// Queue a start (or restart). Returns true if the host needs to begin
    /// scheduling frames.
    pub fn press_start(&mut self) -> bool {
        if self.state.session.is_running() {
            return false;
        }
        self.input.start = true;
        true
    }

    fn apply(&mut self, action: InputAction) -> bool {
        match action {
            InputAction::Jump => {
                self.press_jump();
                false
            }
            InputAction::Start | InputAction::Restart => self.press_start(),
        }
    }

    /// Handle a key press. Returns true if the host must start its frame loop.
    pub fn handle_key(&mut self, key: &str) -> bool {
        match action_for_key(key, self.phase()) {
            Some(action) => self.apply(action),
            None => false,
        }
    }

    /// Handle a tap. Returns true if the host must start its frame loop.
    pub fn handle_touch(&mut self) -> bool {
        self.apply(action_for_touch(self.phase()))
    }

    /// Run one display frame: one simulation step, then cosmetics
    pub fn frame(&mut self, dt_ms: f64) -> FrameStatus {
        let input = std::mem::take(&mut self.input);
        let outcome = tick(&mut self.state, &input, &mut self.sim_rng);
        let chaos = self.state.profile.chaos_effects;

        for event in &self.state.events {
            if *event == GameEvent::Started {
                self.tasks = TaskScheduler::for_run(chaos);
            }
            self.effects.on_event(event, chaos, &mut self.fx_rng);
        }

        match outcome {
            TickOutcome::Running => {
                for task in self.tasks.advance(dt_ms) {
                    self.effects.run_task(task, &self.state, &mut self.fx_rng);
                }
                self.effects.on_frame(dt_ms, chaos, &mut self.fx_rng);
                FrameStatus::Continue
            }
            TickOutcome::GameOver => {
                self.tasks.cancel();
                let session = &self.state.session;
                self.high_scores.record(&self.state.profile.name, session.score);
                FrameStatus::Stopped
            }
            TickOutcome::Idle => {
                self.tasks.cancel();
                FrameStatus::Stopped
            }
        }
    }

    /// Component is going away: drop pending input, stop every timer and
    /// abandon any run in progress. The next `frame` reports `Stopped` and a
    /// later start begins a fresh run.
    pub fn teardown(&mut self) {
        self.input = TickInput::default();
        self.tasks.cancel();
        if self.state.session.is_running() {
            log::info!("Abandoning run at score {}", self.state.session.score);
            self.state.reset();
            self.effects.reset(&mut self.fx_rng);
        }
        log::info!("Game torn down");
    }
}
