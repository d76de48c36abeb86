//! Obstacle spawn planning
//!
//! Patterns are picked from a per-profile weight table, then laid out beyond
//! the right edge of the field. All randomness comes from the caller's RNG so
//! spawns are reproducible from a seed.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::profile::DifficultyProfile;
use super::state::ObstacleKind;

/// Shape of a spawn group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnPattern {
    /// One obstacle
    Single,
    /// Two obstacles with a wide gap
    Double,
    /// Three obstacles in quick succession
    Triple,
    /// A short obstacle followed by a tall one
    Staggered,
}

/// Relative weights for each pattern
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnTable {
    pub single: f32,
    #[serde(default)]
    pub double: f32,
    #[serde(default)]
    pub triple: f32,
    #[serde(default)]
    pub staggered: f32,
}

impl Default for SpawnTable {
    fn default() -> Self {
        Self::single_only()
    }
}

impl SpawnTable {
    pub fn single_only() -> Self {
        Self {
            single: 1.0,
            double: 0.0,
            triple: 0.0,
            staggered: 0.0,
        }
    }

    fn weights(&self) -> [(SpawnPattern, f32); 4] {
        [
            (SpawnPattern::Single, self.single),
            (SpawnPattern::Double, self.double),
            (SpawnPattern::Triple, self.triple),
            (SpawnPattern::Staggered, self.staggered),
        ]
    }

    fn total(&self) -> f32 {
        self.weights().iter().map(|(_, w)| w).sum()
    }

    /// Weights are finite, non-negative and not all zero
    pub fn is_valid(&self) -> bool {
        self.weights()
            .iter()
            .all(|(_, w)| w.is_finite() && *w >= 0.0)
            && self.total() > 0.0
    }

    /// Probability of a pattern after normalization
    pub fn probability(&self, pattern: SpawnPattern) -> f32 {
        let total = self.total();
        if total <= 0.0 {
            return 0.0;
        }
        self.weights()
            .iter()
            .find(|(p, _)| *p == pattern)
            .map(|(_, w)| w / total)
            .unwrap_or(0.0)
    }

    /// Map a roll in `[0, 1)` to a pattern
    pub fn pick(&self, roll: f32) -> SpawnPattern {
        let mut remaining = roll.clamp(0.0, 1.0) * self.total();
        for (pattern, weight) in self.weights() {
            if weight > 0.0 && remaining < weight {
                return pattern;
            }
            remaining -= weight;
        }
        // Roll landed on the upper edge; take the last non-empty bucket
        self.weights()
            .iter()
            .rev()
            .find(|(_, w)| *w > 0.0)
            .map(|(p, _)| *p)
            .unwrap_or(SpawnPattern::Single)
    }
}

/// One obstacle of a planned spawn group
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannedObstacle {
    pub x: f32,
    pub height: f32,
    pub kind: ObstacleKind,
}

/// A spawn group ready to be appended to the obstacle list
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnPlan {
    pub pattern: SpawnPattern,
    pub obstacles: Vec<PlannedObstacle>,
}

/// `floor(r * span) + base`, the integer-pixel draw used for sizes and gaps
fn roll_span<R: Rng + ?Sized>(rng: &mut R, span: f32, base: f32) -> f32 {
    (rng.random::<f32>() * span).floor() + base
}

fn roll_kind<R: Rng + ?Sized>(rng: &mut R, kinds: &[ObstacleKind]) -> ObstacleKind {
    if kinds.is_empty() {
        return ObstacleKind::Boba;
    }
    kinds[rng.random_range(0..kinds.len())]
}

/// Plan the next spawn group for the given field width and speed
pub fn plan_spawn<R: Rng + ?Sized>(
    profile: &DifficultyProfile,
    field_width: f32,
    speed: f32,
    rng: &mut R,
) -> SpawnPlan {
    let rules = &profile.spawn;
    let kinds = &profile.obstacle_kinds;
    let bonus = rules.height_bonus;

    let height = roll_span(rng, 30.0, 30.0 + bonus);
    let min_distance = rules.distance_floor(speed);
    let distance = (rng.random::<f32>() * (rules.max_distance - min_distance) + min_distance).floor();
    let start = field_width + distance;

    let pattern = rules.patterns.pick(rng.random::<f32>());

    let obstacles = match pattern {
        SpawnPattern::Single => vec![PlannedObstacle {
            x: start,
            height,
            kind: roll_kind(rng, kinds),
        }],
        SpawnPattern::Double => {
            let gap = roll_span(rng, 70.0, 130.0);
            vec![
                PlannedObstacle {
                    x: start,
                    height,
                    kind: roll_kind(rng, kinds),
                },
                PlannedObstacle {
                    x: start + gap,
                    height: roll_span(rng, 30.0, 30.0 + bonus),
                    kind: roll_kind(rng, kinds),
                },
            ]
        }
        SpawnPattern::Triple => {
            let gap = roll_span(rng, 30.0, 120.0);
            [(0.0, -10.0), (1.0, 0.0), (2.0, -5.0)]
                .into_iter()
                .map(|(step, dh)| PlannedObstacle {
                    x: start + gap * step,
                    height: height + dh,
                    kind: roll_kind(rng, kinds),
                })
                .collect()
        }
        SpawnPattern::Staggered => {
            let gap = roll_span(rng, 100.0, 180.0);
            let short = roll_span(rng, 20.0, 20.0);
            let tall = roll_span(rng, 20.0, 60.0);
            vec![
                PlannedObstacle {
                    x: start,
                    height: short,
                    kind: roll_kind(rng, kinds),
                },
                PlannedObstacle {
                    x: start + gap,
                    height: tall,
                    kind: roll_kind(rng, kinds),
                },
            ]
        }
    };

    SpawnPlan { pattern, obstacles }
}
