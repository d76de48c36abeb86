//! Frame-step simulation
//!
//! Advances the run by exactly one display frame. The step never blocks and
//! never fails; all randomness comes from the RNG passed in.

use rand::Rng;

use super::collision::find_collision;
use super::spawn::plan_spawn;
use super::state::{GameEvent, GamePhase, GameState, Obstacle};
use crate::consts::SCORE_FRAME_INTERVAL;

/// Input events delivered since the previous frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Jump (space/up/tap while running)
    pub jump: bool,
    /// Start a run, or restart after game over
    pub start: bool,
}

/// Result of a frame step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running; nothing was simulated
    Idle,
    /// Frame simulated, run continues
    Running,
    /// This frame ended the run
    GameOver,
}

/// Begin a run. From `GameOver` the state is reset first.
///
/// Returns false if a run is already in progress.
pub fn start(state: &mut GameState) -> bool {
    match state.session.phase {
        GamePhase::Running => false,
        GamePhase::Ready | GamePhase::GameOver => {
            if state.session.phase == GamePhase::GameOver {
                state.reset();
            }
            state.session.phase = GamePhase::Running;
            state.events.push(GameEvent::Started);
            log::info!(
                "Run started on {} (speed {})",
                state.profile.name,
                state.session.game_speed
            );
            true
        }
    }
}

/// Apply the profile's jump impulse if the runner is on the ground.
///
/// A no-op outside a running game or while airborne.
pub fn jump(state: &mut GameState) -> bool {
    if !state.session.is_running() {
        return false;
    }
    let impulse = state.profile.jump_force;
    if !state.runner.jump(impulse) {
        return false;
    }
    state.events.push(GameEvent::Jumped { impulse });
    log::debug!("Jump height: {:.1}", state.profile.max_jump_height());
    true
}

/// Advance the game state by one frame
pub fn tick<R: Rng + ?Sized>(state: &mut GameState, input: &TickInput, rng: &mut R) -> TickOutcome {
    state.events.clear();

    if input.start {
        start(state);
    }

    // Nothing moves before the first start or after a collision
    if !state.session.is_running() {
        return TickOutcome::Idle;
    }

    if input.jump {
        jump(state);
    }

    state.session.frame += 1;
    let frame = state.session.frame;

    if frame.is_multiple_of(SCORE_FRAME_INTERVAL) {
        state.session.score += 1;
    }

    update_speed(state);
    maybe_spawn(state, rng);
    move_obstacles(state, rng);

    let gravity = state.effective_gravity();
    if state.runner.integrate(gravity) {
        state.events.push(GameEvent::Landed);
    }

    if let Some(obstacle_id) = find_collision(&state.runner, &state.obstacles, &state.field).map(|o| o.id) {
        end_run(state, obstacle_id);
        return TickOutcome::GameOver;
    }

    TickOutcome::Running
}

/// Pure variant of [`tick`]: returns the next state, leaving `prev` untouched
pub fn step<R: Rng + ?Sized>(prev: &GameState, input: &TickInput, rng: &mut R) -> (GameState, TickOutcome) {
    let mut next = prev.clone();
    let outcome = tick(&mut next, input, rng);
    (next, outcome)
}

/// Speed ramps up on a fixed frame cadence, clamped to the profile cap
fn update_speed(state: &mut GameState) {
    let profile = &state.profile;
    let session = &mut state.session;
    if !session.frame.is_multiple_of(profile.speed_ramp_frames) || session.game_speed >= profile.max_speed {
        return;
    }
    session.game_speed = (session.game_speed + profile.speed_increase).min(profile.max_speed);
    state.events.push(GameEvent::SpeedUp {
        speed: session.game_speed,
    });
    log::debug!("Speed up to {:.2} at frame {}", session.game_speed, session.frame);
}

/// Spawn a new group on the spawn cadence, or whenever the field is empty
fn maybe_spawn<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R) {
    let interval = state.spawn_interval();
    if !state.session.frame.is_multiple_of(interval) && !state.obstacles.is_empty() {
        return;
    }

    let speed = state.session.game_speed;
    let plan = plan_spawn(&state.profile, state.field.width, speed, rng);

    // Keep groups apart: the last obstacle must be well clear of the edge
    let min_spacing = state.profile.spawn.min_spacing(speed);
    let crowded = state
        .obstacles
        .last()
        .is_some_and(|last| state.field.width - last.x < min_spacing);
    if crowded {
        state.events.push(GameEvent::SpawnSuppressed);
        return;
    }

    let count = plan.obstacles.len();
    for planned in plan.obstacles {
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle {
            id,
            x: planned.x,
            height: planned.height,
            kind: planned.kind,
        });
    }
    state.events.push(GameEvent::Spawned {
        pattern: plan.pattern,
        count,
    });
}

/// Scroll obstacles left and forget the ones that left the field
fn move_obstacles<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R) {
    let speed = state.session.game_speed;
    let burst = state.profile.speed_burst;

    for obstacle in &mut state.obstacles {
        let factor = match burst {
            Some(b) if rng.random::<f32>() < b.chance => b.factor,
            _ => 1.0,
        };
        obstacle.x -= speed * factor;
    }
    state.obstacles.retain(|o| !o.has_exited());
}

fn end_run(state: &mut GameState, obstacle_id: u32) {
    let session = &mut state.session;
    session.phase = GamePhase::GameOver;
    let new_record = session.score > session.high_score;
    session.high_score = session.high_score.max(session.score);

    state.events.push(GameEvent::Collision { obstacle_id });
    state.events.push(GameEvent::GameOver {
        score: session.score,
        high_score: session.high_score,
        new_record,
    });
    log::info!(
        "Game over at frame {}: score {} (high {})",
        session.frame,
        session.score,
        session.high_score
    );
}
