// src/loading/systems.rs

use bevy::asset::LoadState;
use bevy::gltf::{Gltf, GltfAssetLabel};
use bevy::prelude::*;

use crate::settings::SceneSettings;

use super::queue::{AssetLoadEvent, AssetQueue, LoadStatus, MeshTask, PendingLoad};

/// Startup: request every model the scene needs, then let the queue report.
pub fn enqueue_scene_assets(
    mut queue: ResMut<AssetQueue>,
    settings: Res<SceneSettings>,
    asset_server: Res<AssetServer>,
) {
    let ball = &settings.bowling_ball;
    let task = MeshTask {
        name: ball.name.clone(),
        path: ball.path.clone(),
        overrides: ball.overrides,
        aggregate: ball.aggregate,
    };
    queue.enqueue(request(task, &asset_server));
    queue.start();
    info!("Loading: {} mesh task(s) queued", queue.pending());
}

/// The first primitive of the first mesh stands in for the whole model.
/// The file itself is loaded too: a loader error only fails the root handle.
fn request(task: MeshTask, asset_server: &AssetServer) -> PendingLoad {
    let root = asset_server.load::<Gltf>(task.path.clone());
    let mesh = asset_server.load(
        GltfAssetLabel::Primitive { mesh: 0, primitive: 0 }.from_asset(task.path.clone()),
    );
    let material = asset_server.load(
        GltfAssetLabel::Material { index: 0, is_scale_inverted: false }.from_asset(task.path.clone()),
    );
    PendingLoad { task, root, mesh, material }
}

/// Combine the file and mesh load states. Labeled assets land before their
/// root, so a loaded root with an unloaded mesh means the label is missing.
/// The material is optional; `spawn_loaded_entities` falls back to a default.
fn resolve(root: &LoadState, mesh: &LoadState) -> LoadStatus {
    match (root, mesh) {
        (_, LoadState::Loaded) => LoadStatus::Loaded,
        (LoadState::Failed(err), _) | (_, LoadState::Failed(err)) => LoadStatus::Failed(err.to_string()),
        (LoadState::Loaded, _) => LoadStatus::Failed("model has no mesh primitive 0".to_string()),
        _ => LoadStatus::Loading,
    }
}

fn status_of(asset_server: &AssetServer, load: &PendingLoad) -> LoadStatus {
    resolve(&asset_server.load_state(&load.root), &asset_server.load_state(&load.mesh))
}

pub fn poll_asset_queue(
    mut queue: ResMut<AssetQueue>,
    asset_server: Res<AssetServer>,
    mut out: EventWriter<AssetLoadEvent>,
) {
    if queue.is_finished() {
        return;
    }
    let events = queue.poll(|load| status_of(&asset_server, load));
    out.write_batch(events);
}

/// Place each loaded mesh at the origin (plus overrides) with its aggregate.
pub fn spawn_loaded_entities(
    mut commands: Commands,
    mut events: EventReader<AssetLoadEvent>,
    meshes: Res<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for ev in events.read() {
        let AssetLoadEvent::Loaded(load) = ev else { continue };
        let Some(mesh) = meshes.get(&load.mesh) else {
            warn!("Loading: '{}' reported loaded but mesh is gone", load.task.name);
            continue;
        };

        let material = if materials.contains(&load.material) {
            load.material.clone()
        } else {
            materials.add(StandardMaterial::default())
        };

        let mut entity = commands.spawn((
            Mesh3d(load.mesh.clone()),
            MeshMaterial3d(material),
            load.task.overrides.transform(),
            Name::new(load.task.name.clone()),
        ));

        match load.task.aggregate.collider_for(mesh) {
            Some(collider) => {
                entity.insert(load.task.aggregate.bundle(collider));
            }
            None => warn!("Loading: '{}' has no usable collider; spawned without physics", load.task.name),
        }
        info!("Loading: spawned '{}'", load.task.name);
    }
}

pub fn log_load_failures(mut events: EventReader<AssetLoadEvent>) {
    for ev in events.read() {
        match ev {
            AssetLoadEvent::Failed { name, error } => error!("Loading: '{name}' failed: {error}"),
            AssetLoadEvent::Finished => info!("Loading: asset queue finished"),
            AssetLoadEvent::Loaded(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props::instancing::{AggregateDesc, ShapeKind};
    use bevy::asset::io::Reader;
    use bevy::asset::{AssetLoader, LoadContext};
    use std::time::Duration;

    /// Stands in for the glTF loader on a file that does not parse.
    #[derive(Default)]
    struct CorruptGlbLoader;

    impl AssetLoader for CorruptGlbLoader {
        type Asset = Gltf;
        type Settings = ();
        type Error = std::io::Error;

        async fn load(
            &self,
            _reader: &mut dyn Reader,
            _settings: &(),
            _load_context: &mut LoadContext<'_>,
        ) -> Result<Gltf, Self::Error> {
            Err(std::io::Error::new(std::io::ErrorKind::InvalidData, "corrupt glb"))
        }

        fn extensions(&self) -> &[&str] {
            &["glb"]
        }
    }

    #[derive(Resource, Default)]
    struct Seen(Vec<AssetLoadEvent>);

    fn record(mut events: EventReader<AssetLoadEvent>, mut seen: ResMut<Seen>) {
        seen.0.extend(events.read().cloned());
    }

    fn task(name: &str, path: &str) -> MeshTask {
        MeshTask {
            name: name.to_string(),
            path: path.to_string(),
            overrides: default(),
            aggregate: AggregateDesc { shape: ShapeKind::Mesh, mass: 1.0, restitution: 0.88, friction: 0.5 },
        }
    }

    #[test]
    fn corrupt_model_fails_and_drains_the_queue() {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()))
            .init_asset::<Gltf>()
            .init_asset::<Mesh>()
            .init_asset::<StandardMaterial>()
            .register_asset_loader(CorruptGlbLoader)
            .init_resource::<AssetQueue>()
            .init_resource::<Seen>()
            .add_event::<AssetLoadEvent>()
            .add_systems(Update, (poll_asset_queue, record).chain());

        let load = {
            let server = app.world().resource::<AssetServer>();
            request(task("corrupt", "fixtures/corrupt.glb"), server)
        };
        {
            let mut queue = app.world_mut().resource_mut::<AssetQueue>();
            queue.enqueue(load);
            queue.start();
        }

        for _ in 0..200 {
            app.update();
            if app.world().resource::<AssetQueue>().is_finished() {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }

        assert!(app.world().resource::<AssetQueue>().is_finished());
        let seen = &app.world().resource::<Seen>().0;
        assert!(seen
            .iter()
            .any(|e| matches!(e, AssetLoadEvent::Failed { name, .. } if name == "corrupt")));
        assert!(matches!(seen.last(), Some(AssetLoadEvent::Finished)));
    }

    #[test]
    fn loaded_file_without_the_mesh_label_fails() {
        assert!(matches!(
            resolve(&LoadState::Loaded, &LoadState::Loading),
            LoadStatus::Failed(_)
        ));
        assert!(matches!(
            resolve(&LoadState::Loaded, &LoadState::NotLoaded),
            LoadStatus::Failed(_)
        ));
    }

    #[test]
    fn mesh_in_flight_keeps_loading() {
        assert_eq!(resolve(&LoadState::Loading, &LoadState::Loading), LoadStatus::Loading);
        assert_eq!(resolve(&LoadState::Loading, &LoadState::Loaded), LoadStatus::Loaded);
        assert_eq!(resolve(&LoadState::Loaded, &LoadState::Loaded), LoadStatus::Loaded);
    }
}
