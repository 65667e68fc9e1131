use bevy::prelude::*;

use super::systems::{emit_particles, init_particle_assets, spawn_sun, update_particles};

pub struct ParticlesPlugin;

impl Plugin for ParticlesPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (init_particle_assets, spawn_sun))
            .add_systems(Update, (update_particles, emit_particles).chain());
    }
}
