// src/props/fields.rs
//! Instanced box and sphere fields.
//! Templates are created at startup; the instances themselves are registered
//! once the asset queue reports `Finished`.

use bevy::prelude::*;
use bevy::render::mesh::VertexAttributeValues;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::loading::AssetLoadEvent;
use crate::settings::SceneSettings;

use super::instancing::{AggregateDesc, CommandsBackend, InstanceBackend, InstanceTemplate, ShapeKind};
use super::placement::{build_grid, range, scatter, PlacementGrid};

/// Faces in a cube atlas laid out left to right.
pub const CUBE_ATLAS_COLUMNS: usize = 6;

const BOX_SEED_SALT: u64 = 0xB0C5_0000_0000_0001;
const SPHERE_SEED_SALT: u64 = 0x5F3E_0000_0000_0002;

/// Register one instance of `template` per grid cell, as a single batch.
pub fn instantiate(backend: &mut impl InstanceBackend, template: &InstanceTemplate, grid: &PlacementGrid) {
    backend.register_instances(template, grid.transforms());
}

/// One aggregate for the template; the engine side fans it out to instances.
pub fn attach_physics(
    backend: &mut impl InstanceBackend,
    template: &InstanceTemplate,
    shape: ShapeKind,
    mass: f32,
    restitution: f32,
    friction: f32,
) {
    backend.attach_aggregate(template, AggregateDesc { shape, mass, restitution, friction });
}

#[derive(Resource)]
pub struct BoxField {
    pub template: InstanceTemplate,
    /// Kept after registration; nothing mutates it.
    pub grid: Option<PlacementGrid>,
}

#[derive(Resource)]
pub struct SphereField {
    pub template: InstanceTemplate,
    pub placed: usize,
}

/// Marker on the hidden template entities.
#[derive(Component)]
pub struct FieldTemplate;

/// Map face `face` of a cube mesh into its column of a horizontal atlas.
#[inline]
pub fn atlas_uv(face: usize, uv: [f32; 2], columns: usize) -> [f32; 2] {
    let cols = columns.max(1) as f32;
    [(face as f32 + uv[0]) / cols, uv[1]]
}

/// Cuboid meshes emit four vertices per face in +z, -z, +x, -x, +y, -y order.
pub fn apply_cube_atlas(mesh: &mut Mesh, columns: usize) {
    if let Some(VertexAttributeValues::Float32x2(uvs)) = mesh.attribute_mut(Mesh::ATTRIBUTE_UV_0) {
        for (i, uv) in uvs.iter_mut().enumerate() {
            *uv = atlas_uv(i / 4, *uv, columns);
        }
    }
}

pub fn spawn_box_template(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    asset_server: Res<AssetServer>,
    settings: Res<SceneSettings>,
) {
    let cfg = &settings.boxes;

    let mut cube = Mesh::from(Cuboid::from_length(cfg.size));
    apply_cube_atlas(&mut cube, CUBE_ATLAS_COLUMNS);
    let mesh = meshes.add(cube);

    let material = materials.add(StandardMaterial {
        base_color_texture: Some(asset_server.load(cfg.texture.as_str())),
        perceptual_roughness: 1.0,
        ..default()
    });

    let entity = commands
        .spawn((
            Mesh3d(mesh.clone()),
            MeshMaterial3d(material.clone()),
            Transform::default(),
            Visibility::Hidden,
            FieldTemplate,
            Name::new("box"),
        ))
        .id();

    commands.insert_resource(BoxField {
        template: InstanceTemplate { entity, mesh, material },
        grid: None,
    });
}

pub fn spawn_sphere_template(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<SceneSettings>,
) {
    let cfg = &settings.spheres;
    if !cfg.enabled {
        return;
    }
    let mesh = meshes.add(Sphere::new(cfg.diameter * 0.5).mesh().uv(32, 16));
    let material = materials.add(StandardMaterial {
        metallic: 0.5,
        perceptual_roughness: 0.5,
        clearcoat: 1.0,
        ..default()
    });

    let entity = commands
        .spawn((
            Mesh3d(mesh.clone()),
            MeshMaterial3d(material.clone()),
            Transform::default(),
            Visibility::Hidden,
            FieldTemplate,
            Name::new("sphere"),
        ))
        .id();

    commands.insert_resource(SphereField {
        template: InstanceTemplate { entity, mesh, material },
        placed: 0,
    });
}

pub fn create_box_field(
    mut commands: Commands,
    mut events: EventReader<AssetLoadEvent>,
    field: Option<ResMut<BoxField>>,
    settings: Res<SceneSettings>,
) {
    if !events.read().any(|e| matches!(e, AssetLoadEvent::Finished)) {
        return;
    }
    let Some(mut field) = field else { return };
    if field.grid.is_some() {
        return;
    }

    let cfg = &settings.boxes;
    if !cfg.enabled {
        return;
    }
    let mut rng = ChaCha8Rng::seed_from_u64(settings.world_seed ^ BOX_SEED_SALT);
    let grid = build_grid(cfg.rows, cfg.cols, cfg.spacing, range(cfg.jitter), range(cfg.vertical), &mut rng);
    if grid.is_empty() {
        warn!("Fields: box grid {}x{} has no cells", cfg.rows, cfg.cols);
        field.grid = Some(grid);
        return;
    }

    let mut backend = CommandsBackend::new(&mut commands);
    instantiate(&mut backend, &field.template, &grid);
    let agg = cfg.aggregate;
    attach_physics(&mut backend, &field.template, agg.shape, agg.mass, agg.restitution, agg.friction);

    info!("Fields: registered {} boxes ({}x{})", grid.len(), grid.rows(), grid.cols());
    debug!("Fields: first box at {:?}", grid.get(0, 0).map(|m| m.w_axis.truncate()));
    field.grid = Some(grid);
}

pub fn create_sphere_field(
    mut commands: Commands,
    mut events: EventReader<AssetLoadEvent>,
    field: Option<ResMut<SphereField>>,
    settings: Res<SceneSettings>,
) {
    if !events.read().any(|e| matches!(e, AssetLoadEvent::Finished)) {
        return;
    }
    let Some(mut field) = field else { return };
    if field.placed > 0 {
        return;
    }

    let cfg = &settings.spheres;
    let mut rng = ChaCha8Rng::seed_from_u64(settings.world_seed ^ SPHERE_SEED_SALT);
    let transforms = scatter(cfg.count, range(cfg.x), range(cfg.y), range(cfg.z), &mut rng);

    let mut backend = CommandsBackend::new(&mut commands);
    backend.register_instances(&field.template, &transforms);
    let agg = cfg.aggregate;
    attach_physics(&mut backend, &field.template, agg.shape, agg.mass, agg.restitution, agg.friction);

    info!("Fields: scattered {} spheres", transforms.len());
    field.placed = transforms.len();
}
