// src/props/showcase.rs
//! The hand-placed props: a rotating root with a child box, a spinning box and
//! the big dynamic sphere that trails smoke.

use avian3d::prelude::*;
use bevy::prelude::*;

use crate::particles::ParticleEmitter;

use super::fields::BoxField;
use super::instancing::{AggregateDesc, ShapeKind};

/// Continuous rotation around +Y.
#[derive(Component, Clone, Copy, Debug)]
pub struct Spin {
    pub radians_per_second: f32,
}

/// Centre of the rotating root; 0.01 rad per frame at 60 fps.
const ROOT_SPIN: f32 = 0.6;
/// One full turn every 12 s (360 frames at 30 fps).
const BOX_SPIN: f32 = std::f32::consts::TAU / 12.0;

pub const BIG_SPHERE_AGGREGATE: AggregateDesc = AggregateDesc {
    shape: ShapeKind::Sphere,
    mass: 1.0,
    restitution: 0.6,
    friction: 0.2,
};

pub fn spawn_showcase(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    boxes: Res<BoxField>,
) {
    let plain = materials.add(StandardMaterial::default());

    commands
        .spawn((
            Transform::default(),
            Visibility::default(),
            Spin { radians_per_second: ROOT_SPIN },
            Name::new("root"),
        ))
        .with_children(|root| {
            root.spawn((
                Mesh3d(meshes.add(Cuboid::from_length(2.0))),
                MeshMaterial3d(plain.clone()),
                Name::new("Box"),
            ));
        });

    // Shares the field's atlas material.
    commands.spawn((
        Mesh3d(boxes.template.mesh.clone()),
        MeshMaterial3d(boxes.template.material.clone()),
        Transform::default(),
        Spin { radians_per_second: BOX_SPIN },
        Name::new("boxTmp"),
    ));

    // Collider radius 1 inside a radius 1.5 mesh.
    commands.spawn((
        Mesh3d(meshes.add(Sphere::new(1.5).mesh().uv(32, 32))),
        MeshMaterial3d(plain),
        Transform::from_xyz(0.0, 4.0, 0.0),
        BIG_SPHERE_AGGREGATE.bundle(Collider::sphere(1.0)),
        ParticleEmitter::smoke(),
        Name::new("sphere"),
    ));

    info!("Showcase: spawned root, boxTmp and sphere");
}

pub fn spin_system(time: Res<Time>, mut q: Query<(&Spin, &mut Transform)>) {
    let dt = time.delta_secs();
    for (spin, mut tf) in &mut q {
        tf.rotate_y(spin.radians_per_second * dt);
    }
}
