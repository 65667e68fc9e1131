use bevy::prelude::*;

use super::backend::AggregateDesc;

/// Points an instance back at the template it was cloned from.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct InstanceOf(pub Entity);

/// Aggregate definition on a template, shared by all its instances.
#[derive(Component, Clone, Copy, Debug)]
pub struct PhysicsAggregate(pub AggregateDesc);

/// Set on an instance once its body has been built.
#[derive(Component)]
pub struct AggregateApplied;
