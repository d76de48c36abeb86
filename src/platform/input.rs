//! Keyboard and touch mapping

use crate::sim::GamePhase;

/// A discrete action delivered to the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Jump,
    /// Begin the first run
    Start,
    /// Begin a new run after game over
    Restart,
}

/// Map a `KeyboardEvent.key` value to an action for the current phase
pub fn action_for_key(key: &str, phase: GamePhase) -> Option<InputAction> {
    match (key, phase) {
        (" " | "Spacebar" | "ArrowUp", GamePhase::Ready) => Some(InputAction::Start),
        (" " | "Spacebar" | "ArrowUp", GamePhase::Running) => Some(InputAction::Jump),
        ("Enter", GamePhase::GameOver) => Some(InputAction::Restart),
        _ => None,
    }
}

/// A tap does whatever makes sense for the current phase
pub fn action_for_touch(phase: GamePhase) -> InputAction {
    match phase {
        GamePhase::Ready => InputAction::Start,
        GamePhase::Running => InputAction::Jump,
        GamePhase::GameOver => InputAction::Restart,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_depends_on_phase() {
        assert_eq!(action_for_key(" ", GamePhase::Ready), Some(InputAction::Start));
        assert_eq!(action_for_key("ArrowUp", GamePhase::Running), Some(InputAction::Jump));
        assert_eq!(action_for_key(" ", GamePhase::GameOver), None);
    }

    #[test]
    fn test_enter_only_restarts() {
        assert_eq!(action_for_key("Enter", GamePhase::GameOver), Some(InputAction::Restart));
        assert_eq!(action_for_key("Enter", GamePhase::Running), None);
        assert_eq!(action_for_key("Enter", GamePhase::Ready), None);
        assert_eq!(action_for_key("x", GamePhase::Running), None);
    }

    #[test]
    fn test_touch() {
        assert_eq!(action_for_touch(GamePhase::Ready), InputAction::Start);
        assert_eq!(action_for_touch(GamePhase::Running), InputAction::Jump);
        assert_eq!(action_for_touch(GamePhase::GameOver), InputAction::Restart);
    }
}
