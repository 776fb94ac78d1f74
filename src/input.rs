use std::collections::HashSet;

use glam::Vec3;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::transform::{Controls, Velocity};

/// Identifier for a physical keyboard key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    Named(NamedKey),
    Character(char),
}

/// Non-character keys the exercises react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NamedKey {
    Left,
    Right,
    Up,
    Down,
    Escape,
}

/// Set of keys currently held down.
#[derive(Debug, Default)]
pub struct InputState {
    keys: RwLock<HashSet<KeyCode>>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_key_down(&self, key: KeyCode) {
        self.keys.write().insert(key);
    }

    pub fn set_key_up(&self, key: KeyCode) {
        self.keys.write().remove(&key);
    }

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys.read().contains(&key)
    }

    /// Actions bound to the held keys, in no particular order.
    pub fn actions(&self) -> Vec<Action> {
        self.keys.read().iter().filter_map(|key| binding(*key)).collect()
    }

    /// Sums the contribution of every held control key.
    pub fn velocity(&self, controls: &Controls) -> Velocity {
        let mut velocity = Velocity {
            rotation_degrees: Vec3::new(0.0, controls.spin, 0.0),
            ..Default::default()
        };
        for action in self.actions() {
            action.apply(controls, &mut velocity);
        }
        velocity
    }
}

/// Model adjustments driven by the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    MoveAway,
    MoveCloser,
    Shrink,
    Grow,
    PitchUp,
    PitchDown,
    YawLeft,
    YawRight,
}

impl Action {
    fn apply(self, controls: &Controls, velocity: &mut Velocity) {
        let step = controls.move_speed;
        let turn = controls.rotate_speed;
        let grow = controls.scale_speed;
        match self {
            Self::MoveUp => velocity.translation.y += step,
            Self::MoveDown => velocity.translation.y -= step,
            Self::MoveLeft => velocity.translation.x -= step,
            Self::MoveRight => velocity.translation.x += step,
            Self::MoveAway => velocity.translation.z -= step,
            Self::MoveCloser => velocity.translation.z += step,
            Self::Shrink => {
                velocity.scale.x -= grow;
                velocity.scale.y -= grow;
            }
            Self::Grow => {
                velocity.scale.x += grow;
                velocity.scale.y += grow;
            }
            Self::PitchUp => velocity.rotation_degrees.x += turn,
            Self::PitchDown => velocity.rotation_degrees.x -= turn,
            Self::YawLeft => velocity.rotation_degrees.y -= turn,
            Self::YawRight => velocity.rotation_degrees.y += turn,
        }
    }
}

/// Fixed key map shared by every exercise.
pub fn binding(key: KeyCode) -> Option<Action> {
    use Action::*;
    Some(match key {
        KeyCode::Character('W') => MoveUp,
        KeyCode::Character('S') => MoveDown,
        KeyCode::Character('A') => MoveLeft,
        KeyCode::Character('D') => MoveRight,
        KeyCode::Character('Z') => MoveAway,
        KeyCode::Character('X') => MoveCloser,
        KeyCode::Character('Q') => Shrink,
        KeyCode::Character('E') => Grow,
        KeyCode::Named(NamedKey::Up) => PitchUp,
        KeyCode::Named(NamedKey::Down) => PitchDown,
        KeyCode::Named(NamedKey::Left) => YawLeft,
        KeyCode::Named(NamedKey::Right) => YawRight,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_state_tracks_keys() {
        let state = InputState::new();
        let escape = KeyCode::Named(NamedKey::Escape);
        state.set_key_down(escape);
        assert!(state.is_key_down(escape));
        state.set_key_up(escape);
        assert!(!state.is_key_down(escape));
    }

    #[test]
    fn only_control_keys_have_bindings() {
        assert_eq!(binding(KeyCode::Named(NamedKey::Escape)), None);
        assert_eq!(binding(KeyCode::Character('W')), Some(Action::MoveUp));
        assert_eq!(binding(KeyCode::Named(NamedKey::Down)), Some(Action::PitchDown));
    }

    #[test]
    fn held_keys_drive_velocity() {
        let state = InputState::new();
        let controls = Controls::default();
        state.set_key_down(KeyCode::Character('W'));
        state.set_key_down(KeyCode::Character('E'));
        state.set_key_down(KeyCode::Named(NamedKey::Left));
        let velocity = state.velocity(&controls);
        assert_eq!(velocity.translation, Vec3::new(0.0, 10.0, 0.0));
        assert_eq!(velocity.scale, Vec3::new(10.0, 10.0, 0.0));
        assert_eq!(velocity.rotation_degrees, Vec3::new(0.0, -100.0, 0.0));
    }

    #[test]
    fn opposite_keys_cancel() {
        let state = InputState::new();
        state.set_key_down(KeyCode::Character('A'));
        state.set_key_down(KeyCode::Character('D'));
        assert_eq!(state.velocity(&Controls::default()).translation, Vec3::ZERO);
    }

    #[test]
    fn releasing_a_key_stops_its_motion() {
        let state = InputState::new();
        state.set_key_down(KeyCode::Character('Z'));
        state.set_key_up(KeyCode::Character('Z'));
        assert_eq!(state.velocity(&Controls::default()), Velocity::default());
    }

    #[test]
    fn spin_adds_to_yaw() {
        let state = InputState::new();
        let controls = Controls {
            spin: 30.0,
            ..Default::default()
        };
        state.set_key_down(KeyCode::Named(NamedKey::Right));
        assert_eq!(state.velocity(&controls).rotation_degrees.y, 130.0);
        assert_eq!(binding(KeyCode::Character('P')), None);
    }
}
