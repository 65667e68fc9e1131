// src/props/instancing/systems.rs

use bevy::prelude::*;
use std::collections::HashMap;

use avian3d::prelude::Collider;

use super::components::{AggregateApplied, InstanceOf, PhysicsAggregate};

/// Give each instance a body built from its template's aggregate.
/// Instances wait until both the aggregate and the template mesh exist.
pub fn replicate_aggregates(
    mut commands: Commands,
    pending: Query<(Entity, &InstanceOf, &Mesh3d), Without<AggregateApplied>>,
    templates: Query<&PhysicsAggregate>,
    meshes: Res<Assets<Mesh>>,
) {
    // One collider per template per run; Collider clones share the shape.
    let mut colliders: HashMap<Entity, Option<Collider>> = HashMap::new();
    let mut applied = 0usize;

    for (entity, owner, mesh) in &pending {
        let Ok(PhysicsAggregate(desc)) = templates.get(owner.0) else { continue };
        let Some(mesh) = meshes.get(&mesh.0) else { continue };

        let collider = colliders
            .entry(owner.0)
            .or_insert_with(|| desc.collider_for(mesh))
            .clone();

        match collider {
            Some(c) => {
                commands.entity(entity).insert((desc.bundle(c), AggregateApplied));
                applied += 1;
            }
            None => {
                warn!("Instancing: template {:?} mesh has no usable collider", owner.0);
                commands.entity(entity).insert(AggregateApplied);
            }
        }
    }

    if applied > 0 {
        debug!("Instancing: attached physics to {applied} instances");
    }
}
