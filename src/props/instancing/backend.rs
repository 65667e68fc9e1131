// src/props/instancing/backend.rs
//! The seam between field construction and the engine. Fields only talk to an
//! `InstanceBackend`; `CommandsBackend` is the Bevy one.

use avian3d::prelude::*;
use bevy::prelude::*;
use bevy::render::mesh::MeshAabb;
use serde::{Deserialize, Serialize};

use super::components::{InstanceOf, PhysicsAggregate};

/// Collision shape family. Dimensions come from the template mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Box,
    Sphere,
    Mesh,
}

/// Shape + body + material, as one unit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AggregateDesc {
    pub shape: ShapeKind,
    /// Zero or less means the body never moves.
    pub mass: f32,
    pub restitution: f32,
    pub friction: f32,
}

impl AggregateDesc {
    pub fn body(&self) -> RigidBody {
        if self.mass > 0.0 {
            RigidBody::Dynamic
        } else {
            RigidBody::Static
        }
    }

    /// Derive a collider from the mesh geometry.
    /// `None` when the mesh has no positions or cannot be turned into a trimesh.
    pub fn collider_for(&self, mesh: &Mesh) -> Option<Collider> {
        match self.shape {
            ShapeKind::Box => mesh.compute_aabb().map(|aabb| {
                let size = Vec3::from(aabb.half_extents) * 2.0;
                Collider::cuboid(size.x, size.y, size.z)
            }),
            ShapeKind::Sphere => mesh
                .compute_aabb()
                .map(|aabb| Collider::sphere(aabb.half_extents.max_element())),
            ShapeKind::Mesh => Collider::trimesh_from_mesh(mesh),
        }
    }

    /// Everything avian needs on a body, given an already built collider.
    pub fn bundle(&self, collider: Collider) -> impl Bundle {
        let body = self.body();
        let mass = if body == RigidBody::Dynamic { self.mass } else { 0.0 };
        (
            body,
            collider,
            Mass(mass),
            Restitution::new(self.restitution),
            Friction::new(self.friction),
        )
    }
}

/// The mesh every instance shares. The entity itself stays hidden.
#[derive(Clone, Debug)]
pub struct InstanceTemplate {
    pub entity: Entity,
    pub mesh: Handle<Mesh>,
    pub material: Handle<StandardMaterial>,
}

pub trait InstanceBackend {
    /// Create one instance of `template` per transform, in one call.
    fn register_instances(&mut self, template: &InstanceTemplate, transforms: &[Mat4]);
    /// Associate one aggregate with `template`; it applies to all its instances.
    fn attach_aggregate(&mut self, template: &InstanceTemplate, desc: AggregateDesc);
}

pub struct CommandsBackend<'a, 'w, 's> {
    commands: &'a mut Commands<'w, 's>,
}

impl<'a, 'w, 's> CommandsBackend<'a, 'w, 's> {
    pub fn new(commands: &'a mut Commands<'w, 's>) -> Self {
        Self { commands }
    }
}

impl InstanceBackend for CommandsBackend<'_, '_, '_> {
    fn register_instances(&mut self, template: &InstanceTemplate, transforms: &[Mat4]) {
        let owner = template.entity;
        let batch: Vec<_> = transforms
            .iter()
            .map(|m| {
                (
                    Mesh3d(template.mesh.clone()),
                    MeshMaterial3d(template.material.clone()),
                    Transform::from_matrix(*m),
                    InstanceOf(owner),
                )
            })
            .collect();
        self.commands.spawn_batch(batch);
    }

    fn attach_aggregate(&mut self, template: &InstanceTemplate, desc: AggregateDesc) {
        self.commands
            .entity(template.entity)
            .insert(PhysicsAggregate(desc));
    }
}
