use bevy::prelude::*;

use crate::terrain::systems::spawn_ground;

/// Startup ordering so anything placed on the ground waits for it.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum TerrainStartupSet {
    Load,
}

pub struct TerrainPlugin;

impl Plugin for TerrainPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_ground.in_set(TerrainStartupSet::Load));
    }
}
