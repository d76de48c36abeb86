//! Hitboxes and overlap testing
//!
//! Hitboxes are axis-aligned rectangles in screen space (y grows downward).
//! Both the runner and obstacle hitboxes are inset from their sprites, so a
//! near miss reads as a miss.

use glam::Vec2;

use super::state::{Field, Obstacle, RunnerState};
use crate::consts::*;

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    /// Top-left corner
    pub min: Vec2,
    /// Bottom-right corner
    pub max: Vec2,
}

impl Hitbox {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            min: Vec2::new(left, top),
            max: Vec2::new(right, bottom),
        }
    }

    pub fn left(&self) -> f32 {
        self.min.x
    }

    pub fn right(&self) -> f32 {
        self.max.x
    }

    pub fn top(&self) -> f32 {
        self.min.y
    }

    pub fn bottom(&self) -> f32 {
        self.max.y
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Strict overlap on both axes; touching edges do not count
    #[inline]
    pub fn overlaps(&self, other: &Hitbox) -> bool {
        self.right() > other.left()
            && self.left() < other.right()
            && self.bottom() > other.top()
            && self.top() < other.bottom()
    }

    /// Same box moved by `offset`
    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }
}

/// Runner hitbox for the current vertical offset
pub fn runner_hitbox(runner: &RunnerState, field: &Field) -> Hitbox {
    let ground = field.ground_y();
    let left = RUNNER_X;
    let right = left + RUNNER_WIDTH * RUNNER_HITBOX_WIDTH_SCALE;
    let top = ground - RUNNER_HEIGHT + RUNNER_HITBOX_TOP_INSET - runner.y;
    let bottom = ground - RUNNER_HITBOX_BOTTOM_INSET - runner.y;
    Hitbox::new(left, top, right, bottom)
}

/// Obstacle hitbox, standing on the ground line
pub fn obstacle_hitbox(obstacle: &Obstacle, field: &Field) -> Hitbox {
    let ground = field.ground_y();
    Hitbox::new(
        obstacle.x + OBSTACLE_HITBOX_INSET,
        ground - obstacle.height + OBSTACLE_HITBOX_INSET,
        obstacle.x + OBSTACLE_WIDTH - OBSTACLE_HITBOX_INSET,
        ground - OBSTACLE_HITBOX_INSET,
    )
}

/// First obstacle the runner overlaps, if any
pub fn find_collision<'a>(
    runner: &RunnerState,
    obstacles: &'a [Obstacle],
    field: &Field,
) -> Option<&'a Obstacle> {
    let runner_box = runner_hitbox(runner, field);
    obstacles
        .iter()
        .find(|o| runner_box.overlaps(&obstacle_hitbox(o, field)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::ObstacleKind;

    fn obstacle_at(x: f32, height: f32) -> Obstacle {
        Obstacle {
            id: 1,
            x,
            height,
            kind: ObstacleKind::Sushi,
        }
    }

    #[test]
    fn test_overlap_and_shift() {
        let a = Hitbox::new(0.0, 0.0, 20.0, 20.0);
        let b = Hitbox::new(10.0, 10.0, 30.0, 30.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));

        // Combined half-widths are 10 + 10
        let shifted = b.translated(Vec2::new(25.0, 0.0));
        assert!(!a.overlaps(&shifted));
        assert!(!shifted.overlaps(&a));
    }

    #[test]
    fn test_shifting_obstacle_past_half_widths_separates() {
        let field = Field::default();
        let runner = runner_hitbox(&RunnerState::grounded(), &field);
        let mut obstacle = obstacle_at(55.0, 40.0);
        assert!(runner.overlaps(&obstacle_hitbox(&obstacle, &field)));

        let half_widths = runner.size().x / 2.0 + obstacle_hitbox(&obstacle, &field).size().x / 2.0;
        let runner_center = (runner.left() + runner.right()) / 2.0;
        let hb = obstacle_hitbox(&obstacle, &field);
        let obstacle_center = (hb.left() + hb.right()) / 2.0;
        obstacle.x += runner_center + half_widths + 1.0 - obstacle_center;

        let shifted = obstacle_hitbox(&obstacle, &field);
        assert!(!runner.overlaps(&shifted));
        assert!(!shifted.overlaps(&runner));
        assert!(find_collision(&RunnerState::grounded(), &[obstacle], &field).is_none());
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Hitbox::new(0.0, 0.0, 10.0, 10.0);
        let b = Hitbox::new(10.0, 0.0, 20.0, 10.0);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_runner_hitbox_is_inset() {
        let field = Field::default();
        let hb = runner_hitbox(&RunnerState::grounded(), &field);
        assert_eq!(hb.left(), 50.0);
        assert_eq!(hb.size().x, 24.0);
        assert_eq!(hb.bottom(), field.ground_y() - 6.0);
        assert_eq!(hb.top(), field.ground_y() - 45.0);
    }

    #[test]
    fn test_jumping_moves_hitbox_up() {
        let field = Field::default();
        let ground = runner_hitbox(&RunnerState::grounded(), &field);
        let air = runner_hitbox(
            &RunnerState {
                y: 50.0,
                velocity: 0.0,
                airborne: true,
            },
            &field,
        );
        assert_eq!(air.translated(Vec2::new(0.0, 50.0)), ground);
    }

    #[test]
    fn test_obstacle_under_runner_collides() {
        let field = Field::default();
        let runner = RunnerState::grounded();
        let obstacles = [obstacle_at(55.0, 40.0)];
        let hit = find_collision(&runner, &obstacles, &field);
        assert_eq!(hit.map(|o| o.id), Some(1));
    }

    #[test]
    fn test_high_jump_clears_obstacle() {
        let field = Field::default();
        let runner = RunnerState {
            y: 80.0,
            velocity: 2.0,
            airborne: true,
        };
        let obstacles = [obstacle_at(55.0, 60.0)];
        assert!(find_collision(&runner, &obstacles, &field).is_none());
    }

    #[test]
    fn test_sprite_overlap_inside_inset_is_a_miss() {
        // Sprites overlap by 4px but the insets keep the hitboxes apart
        let field = Field::default();
        let runner = RunnerState::grounded();
        let obstacles = [obstacle_at(RUNNER_X + RUNNER_WIDTH - 4.0, 40.0)];
        assert!(find_collision(&runner, &obstacles, &field).is_none());
    }

    #[test]
    fn test_collision_is_deterministic() {
        let field = Field::default();
        let runner = RunnerState {
            y: 20.0,
            velocity: 5.0,
            airborne: true,
        };
        let obstacles = [obstacle_at(60.0, 50.0), obstacle_at(300.0, 50.0)];
        let first = find_collision(&runner, &obstacles, &field).map(|o| o.x);
        for _ in 0..10 {
            assert_eq!(find_collision(&runner, &obstacles, &field).map(|o| o.x), first);
        }
    }
}
