// src/drag/controller.rs
//! Idle/Dragging state machine. All engine access goes through `DragBackend`.

use bevy::prelude::*;

/// Pointer input, already hit-tested.
#[derive(Event, Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    /// `hit` is the nearest pickable mesh under the cursor, ground included.
    Down { hit: Option<Entity> },
    Move,
    Up,
}

pub trait DragBackend {
    /// Where the cursor ray meets the ground mesh, if it does.
    fn ground_point(&mut self) -> Option<Vec3>;
    fn is_ground(&self, entity: Entity) -> bool;
    /// Add `delta` to the mesh position.
    fn translate(&mut self, entity: Entity, delta: Vec3);
    /// Stop camera input starting next tick.
    fn request_camera_detach(&mut self);
    fn attach_camera(&mut self);
}

/// The dragged mesh and the last ground point seen under the cursor.
/// Both live or die together.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSession {
    pub mesh: Entity,
    pub last_point: Vec3,
}

#[derive(Resource, Default, Debug)]
pub struct DragController {
    session: Option<DragSession>,
}

impl DragController {
    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn handle(&mut self, event: PointerEvent, backend: &mut impl DragBackend) {
        match event {
            PointerEvent::Down { hit } => self.pointer_down(hit, backend),
            PointerEvent::Move => self.pointer_move(backend),
            PointerEvent::Up => self.pointer_up(backend),
        }
    }

    fn pointer_down(&mut self, hit: Option<Entity>, backend: &mut impl DragBackend) {
        if self.session.is_some() {
            return;
        }
        let Some(mesh) = hit.filter(|e| !backend.is_ground(*e)) else { return };
        let Some(point) = backend.ground_point() else { return };

        self.session = Some(DragSession { mesh, last_point: point });
        backend.request_camera_detach();
    }

    fn pointer_move(&mut self, backend: &mut impl DragBackend) {
        let Some(session) = self.session.as_mut() else { return };
        let Some(current) = backend.ground_point() else { return };

        backend.translate(session.mesh, current - session.last_point);
        session.last_point = current;
    }

    fn pointer_up(&mut self, backend: &mut impl DragBackend) {
        if self.session.take().is_some() {
            backend.attach_camera();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, VecDeque};

    const GROUND: Entity = Entity::from_raw(1);
    const SPHERE: Entity = Entity::from_raw(2);

    /// Scripted ground hits plus a log of everything the controller asked for.
    #[derive(Default)]
    struct FakeScene {
        ground_hits: VecDeque<Option<Vec3>>,
        positions: HashMap<Entity, Vec3>,
        detach_requests: usize,
        attaches: usize,
    }

    impl FakeScene {
        fn with_hits(hits: &[Option<Vec3>]) -> Self {
            Self { ground_hits: hits.iter().copied().collect(), ..default() }
        }
    }

    impl DragBackend for FakeScene {
        fn ground_point(&mut self) -> Option<Vec3> {
            self.ground_hits.pop_front().flatten()
        }
        fn is_ground(&self, entity: Entity) -> bool {
            entity == GROUND
        }
        fn translate(&mut self, entity: Entity, delta: Vec3) {
            *self.positions.entry(entity).or_default() += delta;
        }
        fn request_camera_detach(&mut self) {
            self.detach_requests += 1;
        }
        fn attach_camera(&mut self) {
            self.attaches += 1;
        }
    }

    /// The session holds exactly the expected mesh and last ground point.
    fn assert_session(c: &DragController, expected: Option<(Entity, Vec3)>) {
        assert_eq!(c.session().map(|s| (s.mesh, s.last_point)), expected);
        assert_eq!(c.is_dragging(), expected.is_some());
    }

    #[test]
    fn drag_moves_mesh_by_ground_delta() {
        let mut scene = FakeScene::with_hits(&[Some(Vec3::ZERO), Some(Vec3::new(2.0, 0.0, 0.0))]);
        let mut c = DragController::default();

        c.handle(PointerEvent::Down { hit: Some(SPHERE) }, &mut scene);
        assert!(c.is_dragging());
        assert_eq!(scene.detach_requests, 1);
        assert_session(&c, Some((SPHERE, Vec3::ZERO)));

        c.handle(PointerEvent::Move, &mut scene);
        assert_eq!(scene.positions[&SPHERE], Vec3::new(2.0, 0.0, 0.0));
        assert_session(&c, Some((SPHERE, Vec3::new(2.0, 0.0, 0.0))));

        c.handle(PointerEvent::Up, &mut scene);
        assert!(!c.is_dragging());
        assert_eq!(scene.attaches, 1);
        assert_session(&c, None);
    }

    #[test]
    fn successive_moves_accumulate() {
        let mut scene = FakeScene::with_hits(&[
            Some(Vec3::new(1.0, 0.0, 1.0)),
            Some(Vec3::new(2.0, 0.5, 1.0)),
            Some(Vec3::new(0.0, 0.5, 4.0)),
        ]);
        let mut c = DragController::default();

        c.handle(PointerEvent::Down { hit: Some(SPHERE) }, &mut scene);
        c.handle(PointerEvent::Move, &mut scene);
        c.handle(PointerEvent::Move, &mut scene);

        assert!(scene.positions[&SPHERE].abs_diff_eq(Vec3::new(-1.0, 0.5, 3.0), 1e-6));
        assert_session(&c, Some((SPHERE, Vec3::new(0.0, 0.5, 4.0))));
    }

    #[test]
    fn move_while_idle_changes_nothing() {
        let mut scene = FakeScene::with_hits(&[Some(Vec3::ONE)]);
        let mut c = DragController::default();

        c.handle(PointerEvent::Move, &mut scene);

        assert!(scene.positions.is_empty());
        assert_eq!(scene.ground_hits.len(), 1, "idle move must not ray cast");
        assert_session(&c, None);
    }

    #[test]
    fn up_while_idle_is_a_no_op() {
        let mut scene = FakeScene::default();
        let mut c = DragController::default();

        c.handle(PointerEvent::Up, &mut scene);
        c.handle(PointerEvent::Up, &mut scene);

        assert_eq!(scene.attaches, 0);
        assert_eq!(scene.detach_requests, 0);
        assert!(!c.is_dragging());
    }

    #[test]
    fn down_that_misses_stays_idle() {
        let mut scene = FakeScene::with_hits(&[Some(Vec3::ZERO)]);
        let mut c = DragController::default();

        c.handle(PointerEvent::Down { hit: None }, &mut scene);

        assert!(!c.is_dragging());
        assert_eq!(scene.detach_requests, 0);
        assert_session(&c, None);
    }

    #[test]
    fn down_on_ground_stays_idle() {
        let mut scene = FakeScene::with_hits(&[Some(Vec3::ZERO)]);
        let mut c = DragController::default();

        c.handle(PointerEvent::Down { hit: Some(GROUND) }, &mut scene);

        assert!(!c.is_dragging());
        assert_eq!(scene.detach_requests, 0);
    }

    #[test]
    fn down_without_ground_point_stays_idle() {
        let mut scene = FakeScene::with_hits(&[None]);
        let mut c = DragController::default();

        c.handle(PointerEvent::Down { hit: Some(SPHERE) }, &mut scene);

        assert!(!c.is_dragging());
        assert_eq!(scene.detach_requests, 0);
        assert_session(&c, None);
    }

    #[test]
    fn move_off_the_ground_is_ignored() {
        let mut scene = FakeScene::with_hits(&[
            Some(Vec3::ZERO),
            None,
            Some(Vec3::new(0.0, 0.0, 3.0)),
        ]);
        let mut c = DragController::default();

        c.handle(PointerEvent::Down { hit: Some(SPHERE) }, &mut scene);
        c.handle(PointerEvent::Move, &mut scene);
        assert!(scene.positions.is_empty());
        assert_session(&c, Some((SPHERE, Vec3::ZERO)));

        c.handle(PointerEvent::Move, &mut scene);
        assert_eq!(scene.positions[&SPHERE], Vec3::new(0.0, 0.0, 3.0));
    }

    #[test]
    fn second_down_keeps_first_session() {
        let other = Entity::from_raw(3);
        let mut scene = FakeScene::with_hits(&[Some(Vec3::ZERO), Some(Vec3::ONE)]);
        let mut c = DragController::default();

        c.handle(PointerEvent::Down { hit: Some(SPHERE) }, &mut scene);
        c.handle(PointerEvent::Down { hit: Some(other) }, &mut scene);

        assert_eq!(c.session().unwrap().mesh, SPHERE);
        assert_eq!(scene.detach_requests, 1);
    }
}
