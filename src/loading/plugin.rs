use bevy::prelude::*;

use super::queue::{AssetLoadEvent, AssetQueue};
use super::systems::{enqueue_scene_assets, log_load_failures, poll_asset_queue, spawn_loaded_entities};

/// Consumers of `AssetLoadEvent` order themselves after `Poll`.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum LoadingSet {
    Poll,
}

pub struct LoadingPlugin;

impl Plugin for LoadingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AssetQueue>()
            .add_event::<AssetLoadEvent>()
            .add_systems(Startup, enqueue_scene_assets)
            .add_systems(Update, poll_asset_queue.in_set(LoadingSet::Poll))
            .add_systems(
                Update,
                (spawn_loaded_entities, log_load_failures).after(LoadingSet::Poll),
            );
    }
}
