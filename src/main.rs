use avian3d::prelude::*;
use bevy::prelude::*;

mod actions;
mod drag;
mod heightmap_data;
mod input;
mod loading;
mod particles;
mod props;
mod settings;
mod setup;
mod terrain;

use actions::ActionState;
use drag::DragPlugin;
use input::{fly_camera_controller, input_mapping_system, CameraControl};
use loading::LoadingPlugin;
use particles::ParticlesPlugin;
use props::PropsPlugin;
use settings::SettingsPlugin;
use terrain::TerrainPlugin;

fn main() {
    App::new()
        .add_plugins(
            DefaultPlugins.set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Physics playground".into(),
                    ..default()
                }),
                ..default()
            }),
        )
        // physics engine
        .add_plugins(PhysicsPlugins::default())
        // scene configuration first: every Startup system reads it
        .add_plugins(SettingsPlugin::default())
        .add_plugins(TerrainPlugin)     // heightmap ground + static body
        .add_plugins(LoadingPlugin)     // mesh-load queue
        .add_plugins(PropsPlugin)       // fields, showcase props
        .add_plugins(ParticlesPlugin)   // smoke + sun
        .add_plugins(DragPlugin)        // drag-to-move
        .init_resource::<ActionState>()
        .init_resource::<CameraControl>()
        // lights, skybox, cameras
        .add_systems(Startup, setup::setup)
        .add_systems(Update, (setup::fit_inset_viewport, setup::prepare_skybox))
        .add_systems(Update, (input_mapping_system, fly_camera_controller).chain())
        .run();
}
