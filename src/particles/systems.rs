// src/particles/systems.rs

use bevy::pbr::NotShadowCaster;
use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;

use crate::drag::Unpickable;
use crate::settings::SceneSettings;

use super::components::{Particle, ParticleEmitter, ParticleKind};

/// Where the sun flares hang, up along the light's source direction.
const SUN_POSITION: Vec3 = Vec3::new(0.0, 120.0, -160.0);

#[derive(Resource)]
pub struct ParticleAssets {
    mesh: Handle<Mesh>,
    smoke: Handle<StandardMaterial>,
    sun: Handle<StandardMaterial>,
}

impl ParticleAssets {
    fn material(&self, kind: ParticleKind) -> Handle<StandardMaterial> {
        match kind {
            ParticleKind::Smoke => self.smoke.clone(),
            ParticleKind::Sun => self.sun.clone(),
        }
    }
}

#[derive(Resource, Deref, DerefMut)]
pub struct ParticleRng(pub ChaCha8Rng);

pub fn init_particle_assets(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<SceneSettings>,
) {
    let mesh = meshes.add(Sphere::new(0.5).mesh().uv(8, 6));
    let smoke = materials.add(StandardMaterial {
        base_color: Color::linear_rgba(0.35, 0.35, 0.35, 0.25),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        ..default()
    });
    let sun = materials.add(StandardMaterial {
        base_color: Color::linear_rgba(1.0, 0.8, 0.3, 0.4),
        emissive: LinearRgba::rgb(8.0, 5.0, 1.5),
        alpha_mode: AlphaMode::Add,
        unlit: true,
        ..default()
    });

    commands.insert_resource(ParticleAssets { mesh, smoke, sun });
    commands.insert_resource(ParticleRng(ChaCha8Rng::seed_from_u64(settings.world_seed)));
}

pub fn spawn_sun(mut commands: Commands) {
    commands.spawn((
        Transform::from_translation(SUN_POSITION),
        ParticleEmitter::sun(),
        Name::new("sun"),
    ));
}

pub fn emit_particles(
    mut commands: Commands,
    time: Res<Time>,
    assets: Res<ParticleAssets>,
    mut rng: ResMut<ParticleRng>,
    mut emitters: Query<(Entity, &GlobalTransform, &mut ParticleEmitter)>,
    particles: Query<&Particle>,
) {
    let dt = time.delta_secs();
    let mut live: HashMap<Entity, usize> = HashMap::new();
    for p in &particles {
        *live.entry(p.emitter).or_default() += 1;
    }

    for (entity, origin, mut emitter) in &mut emitters {
        let count = emitter.tick(dt, live.get(&entity).copied().unwrap_or(0));
        if count == 0 {
            continue;
        }
        let material = assets.material(emitter.kind);
        let at = origin.translation();
        for _ in 0..count {
            let particle = emitter.spawn(entity, &mut rng.0);
            commands.spawn((
                Mesh3d(assets.mesh.clone()),
                MeshMaterial3d(material.clone()),
                Transform::from_translation(at).with_scale(Vec3::splat(particle.scale())),
                particle,
                NotShadowCaster,
                Unpickable,
            ));
        }
    }
}

pub fn update_particles(
    mut commands: Commands,
    time: Res<Time>,
    mut q: Query<(Entity, &mut Particle, &mut Transform)>,
) {
    let dt = time.delta_secs();
    for (entity, mut particle, mut tf) in &mut q {
        match particle.advance(dt) {
            Some(step) => {
                tf.translation += step;
                tf.scale = Vec3::splat(particle.scale());
            }
            None => commands.entity(entity).despawn(),
        }
    }
}
