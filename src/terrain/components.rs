// src/terrain/components.rs
use bevy::prelude::*;

/// The one mesh ground ray casts are allowed to hit.
#[derive(Component)]
pub struct Ground;
