// src/drag/systems.rs

use bevy::input::mouse::MouseButton;
use bevy::input::ButtonInput;
use bevy::picking::mesh_picking::ray_cast::{MeshRayCast, MeshRayCastSettings, RayCastVisibility};
use bevy::prelude::*;
use bevy::window::{CursorMoved, PrimaryWindow};

use crate::input::CameraControl;
use crate::setup::MainCamera;
use crate::terrain::Ground;

use super::controller::{DragBackend, DragController, PointerEvent};

/// Never returned by the pointer hit test (particles).
#[derive(Component, Default)]
pub struct Unpickable;

/// World-space ray from the main camera through the cursor, refreshed once per
/// frame. `None` while the cursor is outside the window.
#[derive(Resource, Default, Clone, Copy, Debug)]
pub struct CursorRay(pub Option<Ray3d>);

pub fn update_cursor_ray(
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    mut cursor_ray: ResMut<CursorRay>,
) {
    cursor_ray.0 = windows
        .single()
        .ok()
        .and_then(Window::cursor_position)
        .zip(cameras.single().ok())
        .and_then(|(cursor, (camera, cam_transform))| camera.viewport_to_world(cam_transform, cursor).ok());
}

/// Turn raw mouse input into hit-tested `PointerEvent`s, in down/move/up order.
pub fn collect_pointer_events(
    buttons: Res<ButtonInput<MouseButton>>,
    mut cursor_moved: EventReader<CursorMoved>,
    cursor_ray: Res<CursorRay>,
    unpickable: Query<(), With<Unpickable>>,
    mut ray_cast: MeshRayCast,
    mut out: EventWriter<PointerEvent>,
) {
    if buttons.just_pressed(MouseButton::Left) {
        let hit = cursor_ray.0.and_then(|ray| {
            let pickable = |e: Entity| !unpickable.contains(e);
            let settings = MeshRayCastSettings::default().with_filter(&pickable);
            ray_cast.cast_ray(ray, &settings).first().map(|(e, _)| *e)
        });
        out.write(PointerEvent::Down { hit });
    }

    if cursor_moved.read().count() > 0 {
        out.write(PointerEvent::Move);
    }

    if buttons.just_released(MouseButton::Left) {
        out.write(PointerEvent::Up);
    }
}

/// One frame's view of the scene for the controller. The cursor does not move
/// within a frame, so the ground cast runs at most once.
struct FrameBackend<'a> {
    cast_ground: &'a mut dyn FnMut() -> Option<Vec3>,
    cached_ground: Option<Option<Vec3>>,
    is_ground: &'a dyn Fn(Entity) -> bool,
    moves: Vec<(Entity, Vec3)>,
    control: &'a mut CameraControl,
}

impl DragBackend for FrameBackend<'_> {
    fn ground_point(&mut self) -> Option<Vec3> {
        if self.cached_ground.is_none() {
            self.cached_ground = Some((self.cast_ground)());
        }
        self.cached_ground.flatten()
    }

    fn is_ground(&self, entity: Entity) -> bool {
        (self.is_ground)(entity)
    }

    fn translate(&mut self, entity: Entity, delta: Vec3) {
        self.moves.push((entity, delta));
    }

    fn request_camera_detach(&mut self) {
        self.control.request_detach();
    }

    fn attach_camera(&mut self) {
        self.control.attach();
    }
}

pub fn apply_pointer_events(
    mut events: EventReader<PointerEvent>,
    mut controller: ResMut<DragController>,
    mut control: ResMut<CameraControl>,
    cursor_ray: Res<CursorRay>,
    grounds: Query<(), With<Ground>>,
    mut movable: Query<&mut Transform, Without<MainCamera>>,
    mut ray_cast: MeshRayCast,
) {
    if events.is_empty() {
        return;
    }

    let ray = cursor_ray.0;
    let mut cast_ground = || {
        let ray = ray?;
        let only_ground = |e: Entity| grounds.contains(e);
        let settings = MeshRayCastSettings::default()
            .with_filter(&only_ground)
            .with_visibility(RayCastVisibility::Any);
        ray_cast.cast_ray(ray, &settings).first().map(|(_, hit)| hit.point)
    };
    let is_ground = |e: Entity| grounds.contains(e);

    let mut backend = FrameBackend {
        cast_ground: &mut cast_ground,
        cached_ground: None,
        is_ground: &is_ground,
        moves: Vec::new(),
        control: &mut control,
    };

    for ev in events.read() {
        let was_dragging = controller.is_dragging();
        controller.handle(*ev, &mut backend);
        match (was_dragging, controller.session()) {
            (false, Some(session)) => debug!("Drag: picked {:?}", session.mesh),
            (true, None) => debug!("Drag: released"),
            _ => {}
        }
    }

    for (entity, delta) in backend.moves {
        if let Ok(mut tf) = movable.get_mut(entity) {
            tf.translation += delta;
        }
    }
}
