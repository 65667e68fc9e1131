use bevy::prelude::*;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerAction {
    MoveForward,
    MoveBackward,
    MoveLeft,
    MoveRight,
    Ascend,
    Descend,
}

#[derive(Default, Resource)]
pub struct ActionState {
    pressed: HashSet<PlayerAction>,
    /// Pointer travel this frame while looking, in pixels.
    look: Vec2,
}

impl ActionState {
    pub fn set(&mut self, action: PlayerAction, is_pressed: bool) {
        if is_pressed {
            self.pressed.insert(action);
        } else {
            self.pressed.remove(&action);
        }
    }

    pub fn pressed(&self, action: PlayerAction) -> bool {
        self.pressed.contains(&action)
    }

    pub fn set_look(&mut self, delta: Vec2) {
        self.look = delta;
    }

    pub fn look(&self) -> Vec2 {
        self.look
    }

    /// Camera-local direction (x right, y up, -z forward), not normalized.
    pub fn move_axis(&self) -> Vec3 {
        let mut dir = Vec3::ZERO;
        if self.pressed(PlayerAction::MoveForward) { dir.z -= 1.0; }
        if self.pressed(PlayerAction::MoveBackward) { dir.z += 1.0; }
        if self.pressed(PlayerAction::MoveLeft) { dir.x -= 1.0; }
        if self.pressed(PlayerAction::MoveRight) { dir.x += 1.0; }
        if self.pressed(PlayerAction::Ascend) { dir.y += 1.0; }
        if self.pressed(PlayerAction::Descend) { dir.y -= 1.0; }
        dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_keys_cancel() {
        let mut s = ActionState::default();
        s.set(PlayerAction::MoveForward, true);
        s.set(PlayerAction::MoveBackward, true);
        s.set(PlayerAction::MoveRight, true);
        assert_eq!(s.move_axis(), Vec3::X);
    }

    #[test]
    fn release_clears_action() {
        let mut s = ActionState::default();
        s.set(PlayerAction::Ascend, true);
        s.set(PlayerAction::Ascend, false);
        assert!(!s.pressed(PlayerAction::Ascend));
        assert_eq!(s.move_axis(), Vec3::ZERO);
    }
}
