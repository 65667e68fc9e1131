use bevy::image::{ImageAddressMode, ImageLoaderSettings, ImageSampler, ImageSamplerDescriptor};
use bevy::prelude::*;
use bevy::render::mesh::{Indices, Mesh};
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::PrimitiveTopology;

use crate::heightmap_data::{Heightmap, HeightmapOptions};
use crate::settings::{SceneSettings, TerrainSettings};
use crate::terrain::components::Ground;

impl From<&TerrainSettings> for HeightmapOptions {
    fn from(t: &TerrainSettings) -> Self {
        Self {
            width: t.width,
            depth: t.depth,
            subdivisions: t.subdivisions,
            min_height: t.min_height,
            max_height: t.max_height,
            uv_scale: t.uv_scale,
        }
    }
}

/// Build a ground `Mesh` of `(subdivisions + 1)^2` vertices centred on the
/// origin. The top image row lands on the far (+Z) edge.
pub fn build_heightmap_mesh(heightmap: &Heightmap, opts: &HeightmapOptions) -> Mesh {
    let res = opts.subdivisions.max(1);
    let verts = res + 1;
    let dx = opts.width / res as f32;
    let dz = opts.depth / res as f32;

    // 1) Positions & UVs
    let mut positions = Vec::with_capacity((verts * verts) as usize);
    let mut uvs = Vec::with_capacity((verts * verts) as usize);
    for j in 0..=res {
        let t = j as f32 / res as f32;
        for i in 0..=res {
            let s = i as f32 / res as f32;

            let x = i as f32 * dx - opts.width * 0.5;
            let z = j as f32 * dz - opts.depth * 0.5;
            let h = heightmap.height(s, 1.0 - t, opts);

            positions.push([x, h, z]);
            uvs.push([s * opts.uv_scale, t * opts.uv_scale]);
        }
    }

    // 2) Indices (two tris per quad, wound to face +Y)
    let mut indices = Vec::with_capacity((res * res * 6) as usize);
    for j in 0..res {
        for i in 0..res {
            let a = j * verts + i;
            let c = a + verts;
            indices.extend_from_slice(&[a, c, a + 1, a + 1, c, c + 1]);
        }
    }

    // 3) Assemble; normals follow the relief
    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(Indices::U32(indices));
    mesh.compute_smooth_normals();
    mesh
}

/// Load the heightmap, build the ground and give it a static trimesh body.
/// A missing or unreadable heightmap degrades to flat ground.
pub fn spawn_ground(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    asset_server: Res<AssetServer>,
    settings: Res<SceneSettings>,
) {
    let cfg = &settings.terrain;
    let opts = HeightmapOptions::from(cfg);

    let heightmap = match Heightmap::open(&cfg.heightmap) {
        Ok(hm) => hm,
        Err(e) => {
            error!("Terrain: {e}; falling back to flat ground");
            Heightmap::flat()
        }
    };

    let mesh = build_heightmap_mesh(&heightmap, &opts);
    let collider = cfg.aggregate.collider_for(&mesh);

    let texture = asset_server.load_with_settings(cfg.texture.as_str(), |s: &mut ImageLoaderSettings| {
        s.sampler = ImageSampler::Descriptor(ImageSamplerDescriptor {
            address_mode_u: ImageAddressMode::Repeat,
            address_mode_v: ImageAddressMode::Repeat,
            ..default()
        });
    });
    let material = materials.add(StandardMaterial {
        base_color_texture: Some(texture),
        perceptual_roughness: 1.0,
        ..default()
    });

    let mut ground = commands.spawn((
        Mesh3d(meshes.add(mesh)),
        MeshMaterial3d(material),
        Transform::from_xyz(0.0, cfg.offset_y, 0.0),
        Ground,
        Name::new("ground"),
    ));

    match collider {
        Some(c) => {
            ground.insert(cfg.aggregate.bundle(c));
        }
        None => warn!("Terrain: ground mesh produced no collider"),
    }

    let (w, h) = heightmap.resolution();
    info!(
        "Terrain: {}x{} ground from {}x{} heightmap, heights {}..{}",
        opts.width, opts.depth, w, h, opts.min_height, opts.max_height
    );
}
