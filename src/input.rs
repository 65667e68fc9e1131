use bevy::input::mouse::MouseMotion;
use bevy::input::{keyboard::KeyCode, ButtonInput};
use bevy::prelude::*;

use crate::actions::{ActionState, PlayerAction};
use crate::settings::{FlyCameraSettings, SceneSettings};

pub const MAX_CAMERA_DT: f32 = 0.05; // never use a dt larger than 50ms
const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

/// Free-flying camera with banked turns.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct FlyCamera {
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
}

impl FlyCamera {
    /// Take yaw and pitch from an existing orientation.
    pub fn from_rotation(rotation: Quat) -> Self {
        let (yaw, pitch, roll) = rotation.to_euler(EulerRot::YXZ);
        Self { yaw, pitch, roll }
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, self.roll)
    }
}

/// Whether the camera listens to pointer and keyboard input.
/// Detach requests are applied at the start of the next frame; attach is immediate.
#[derive(Resource, Debug)]
pub struct CameraControl {
    attached: bool,
    pending_detach: bool,
}

impl Default for CameraControl {
    fn default() -> Self {
        Self { attached: true, pending_detach: false }
    }
}

impl CameraControl {
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn request_detach(&mut self) {
        self.pending_detach = true;
    }

    /// Re-attach now; also drops a detach that has not landed yet.
    pub fn attach(&mut self) {
        self.attached = true;
        self.pending_detach = false;
    }

    /// Returns true if a pending detach was applied.
    pub fn apply_pending(&mut self) -> bool {
        if !self.pending_detach {
            return false;
        }
        self.pending_detach = false;
        self.attached = false;
        true
    }
}

/// New roll after a turn of `yaw_delta`: lean into the turn up to the bank
/// limit, then ease back toward level by `1 / roll_correct`.
pub fn bank_roll(roll: f32, yaw_delta: f32, cfg: &FlyCameraSettings) -> f32 {
    let mut r = roll;
    if cfg.banked_turn {
        let limit = cfg.bank_limit.abs();
        r = (r + yaw_delta * cfg.bank_multiplier).clamp(-limit, limit);
    }
    r - r / cfg.roll_correct.max(1.0)
}

/// First schedule: land detach requests made during the previous frame.
pub fn apply_deferred_camera_detach(mut control: ResMut<CameraControl>) {
    if control.apply_pending() {
        debug!("Camera: pointer control detached");
    }
}

pub fn input_mapping_system(
    keys: Res<ButtonInput<KeyCode>>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut motion_evr: EventReader<MouseMotion>,
    mut action_state: ResMut<ActionState>,
) {
    action_state.set(PlayerAction::MoveForward, keys.pressed(KeyCode::KeyW));
    action_state.set(PlayerAction::MoveBackward, keys.pressed(KeyCode::KeyS));
    action_state.set(PlayerAction::MoveLeft, keys.pressed(KeyCode::KeyA));
    action_state.set(PlayerAction::MoveRight, keys.pressed(KeyCode::KeyD));
    action_state.set(PlayerAction::Ascend, keys.pressed(KeyCode::KeyE));
    action_state.set(PlayerAction::Descend, keys.pressed(KeyCode::KeyQ));

    let travel: Vec2 = motion_evr.read().map(|ev| ev.delta).sum();
    let look = if mouse_buttons.pressed(MouseButton::Left) { travel } else { Vec2::ZERO };
    action_state.set_look(look);
}

pub fn fly_camera_controller(
    time: Res<Time>,
    control: Res<CameraControl>,
    action_state: Res<ActionState>,
    settings: Res<SceneSettings>,
    mut query: Query<(&mut Transform, &mut FlyCamera)>,
) {
    let Ok((mut tf, mut cam)) = query.single_mut() else { return; };
    let cfg = &settings.camera;
    let dt = time.delta_secs().min(MAX_CAMERA_DT);

    // Detached cameras still level out.
    let (look, axis) = if control.is_attached() {
        (action_state.look(), action_state.move_axis())
    } else {
        (Vec2::ZERO, Vec3::ZERO)
    };

    // 1) Look
    let yaw_delta = -look.x * cfg.look_speed * dt;
    cam.yaw += yaw_delta;
    cam.pitch = (cam.pitch - look.y * cfg.look_speed * dt).clamp(-PITCH_LIMIT, PITCH_LIMIT);

    // 2) Bank
    cam.roll = bank_roll(cam.roll, yaw_delta, cfg);
    tf.rotation = cam.rotation();

    // 3) Fly along camera axes
    if axis != Vec3::ZERO {
        let step = tf.rotation * axis.normalize() * cfg.move_speed * dt;
        tf.translation += step;
    }
}
