//! Props plugin wiring (glue).
//! - Field templates + showcase props at startup
//! - Field instancing once the asset queue drains
//! - Aggregate replication onto instances

use bevy::prelude::*;

use crate::loading::LoadingSet;
use crate::terrain::TerrainStartupSet;

use super::fields::{create_box_field, create_sphere_field, spawn_box_template, spawn_sphere_template};
use super::instancing::systems::replicate_aggregates;
use super::showcase::{spawn_showcase, spin_system};

pub struct PropsPlugin;

impl Plugin for PropsPlugin {
    fn build(&self, app: &mut App) {
        app
            // templates must exist before the showcase borrows the box material
            .add_systems(
                Startup,
                (spawn_box_template, spawn_sphere_template, spawn_showcase)
                    .chain()
                    .after(TerrainStartupSet::Load),
            )
            .add_systems(
                Update,
                (
                    (create_box_field, create_sphere_field).after(LoadingSet::Poll),
                    replicate_aggregates.after(create_box_field).after(create_sphere_field),
                    spin_system,
                ),
            );
    }
}
