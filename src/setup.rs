use bevy::asset::LoadState;
use bevy::core_pipeline::Skybox;
use bevy::pbr::{light_consts, CascadeShadowConfigBuilder};
use bevy::prelude::*;
use bevy::render::camera::Viewport;
use bevy::render::render_resource::{TextureViewDescriptor, TextureViewDimension};
use bevy::window::{PrimaryWindow, WindowResized};

use crate::input::FlyCamera;
use crate::settings::SceneSettings;

/// Six square faces stacked top to bottom: +X, -X, +Y, -Y, +Z, -Z.
pub const SKYBOX_CUBEMAP: &str = "textures/skybox_cubemap.png";
const FAR_PLANE: f32 = 20_480.0;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SkyboxError {
    #[error("skybox image is {width}x{height}; expected six square faces stacked vertically")]
    NotStacked { width: u32, height: u32 },
}

/// The skybox image until it has been turned into a cube view.
#[derive(Resource)]
pub struct SkyboxCubemap {
    image: Handle<Image>,
    ready: bool,
}

#[derive(Component)]
pub struct MainCamera;

/// Secondary camera drawn into a fraction of the window.
#[derive(Component, Clone, Copy, Debug)]
pub struct InsetCamera {
    /// Top-left corner, as a fraction of the window.
    pub origin: Vec2,
    pub size: Vec2,
}

/// Pixel rectangle for a fractional viewport; never zero-sized.
pub fn inset_rect(window: UVec2, origin: Vec2, size: Vec2) -> (UVec2, UVec2) {
    let w = window.as_vec2();
    let pos = (w * origin.clamp(Vec2::ZERO, Vec2::ONE)).floor().as_uvec2();
    let max = window.saturating_sub(pos).max(UVec2::ONE);
    let extent = (w * size).floor().as_uvec2().clamp(UVec2::ONE, max);
    (pos, extent)
}

/// Reinterpret a vertical strip of six faces as a cube texture.
pub fn stacked_to_cubemap(image: &mut Image) -> Result<(), SkyboxError> {
    if image.texture_descriptor.array_layer_count() == 1 {
        let (width, height) = (image.width(), image.height());
        if width == 0 || height != width * 6 {
            return Err(SkyboxError::NotStacked { width, height });
        }
        image.reinterpret_stacked_2d_as_array(6);
    }
    image.texture_view_descriptor = Some(TextureViewDescriptor {
        dimension: Some(TextureViewDimension::Cube),
        ..default()
    });
    Ok(())
}

pub fn prepare_skybox(
    asset_server: Res<AssetServer>,
    mut images: ResMut<Assets<Image>>,
    mut cubemap: ResMut<SkyboxCubemap>,
) {
    if cubemap.ready {
        return;
    }
    match asset_server.load_state(&cubemap.image) {
        LoadState::Loaded => {}
        LoadState::Failed(err) => {
            error!("Setup: skybox failed to load: {err}");
            cubemap.ready = true;
            return;
        }
        LoadState::NotLoaded | LoadState::Loading => return,
    }
    let Some(image) = images.get_mut(&cubemap.image) else { return };
    match stacked_to_cubemap(image) {
        Ok(()) => info!("Setup: skybox cubemap ready"),
        Err(e) => error!("Setup: {e}"),
    }
    cubemap.ready = true;
}

pub fn setup(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    settings: Res<SceneSettings>,
) {
    let cam = &settings.camera;

    // 1) Sky and fill light
    commands.insert_resource(ClearColor(Color::BLACK));
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 240.0,
        ..default()
    });

    // 2) Sun with shadows between 10 and 130 units
    commands.spawn((
        DirectionalLight {
            illuminance: light_consts::lux::AMBIENT_DAYLIGHT * 0.5,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(0.0, 10.0, 0.0).looking_to(Vec3::new(0.0, -1.0, 1.0), Vec3::Y),
        CascadeShadowConfigBuilder {
            minimum_distance: 10.0,
            maximum_distance: 130.0,
            ..default()
        }
        .build(),
        Name::new("light"),
    ));

    // 3) Skybox cubemap, drawn behind everything by the main camera
    let sky: Handle<Image> = asset_server.load(SKYBOX_CUBEMAP);
    commands.insert_resource(SkyboxCubemap { image: sky.clone(), ready: false });

    // 4) Main fly camera
    let main_tf = Transform::from_translation(cam.position).looking_at(Vec3::ZERO, Vec3::Y);
    commands.spawn((
        Camera3d::default(),
        Projection::from(PerspectiveProjection {
            far: FAR_PLANE,
            ..default()
        }),
        Skybox {
            image: sky,
            brightness: 1000.0,
            ..default()
        },
        main_tf,
        FlyCamera::from_rotation(main_tf.rotation),
        MainCamera,
        Name::new("FlyCamera"),
    ));

    // 5) Picture-in-picture camera, top-right 20%
    commands.spawn((
        Camera3d::default(),
        Camera {
            order: 1,
            ..default()
        },
        Projection::from(PerspectiveProjection {
            far: FAR_PLANE,
            ..default()
        }),
        Transform::from_translation(cam.inset_position).looking_at(Vec3::ZERO, Vec3::Y),
        InsetCamera {
            origin: Vec2::new(0.8, 0.0),
            size: Vec2::splat(0.2),
        },
        Name::new("InsetCamera"),
    ));

    info!("Setup: lights, skybox and cameras spawned");
}

/// Keep inset viewports matched to the window size.
pub fn fit_inset_viewport(
    mut resized: EventReader<WindowResized>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut cameras: Query<(&mut Camera, &InsetCamera)>,
    mut initialized: Local<bool>,
) {
    let changed = resized.read().count() > 0;
    if !changed && *initialized {
        return;
    }
    let Ok(window) = windows.single() else { return; };
    let size = window.physical_size();
    if size.x == 0 || size.y == 0 {
        return;
    }

    for (mut camera, inset) in &mut cameras {
        let (physical_position, physical_size) = inset_rect(size, inset.origin, inset.size);
        camera.viewport = Some(Viewport {
            physical_position,
            physical_size,
            ..default()
        });
    }
    *initialized = true;
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::asset::RenderAssetUsages;
    use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};

    fn strip(width: u32, height: u32) -> Image {
        Image::new_fill(
            Extent3d { width, height, depth_or_array_layers: 1 },
            TextureDimension::D2,
            &[0, 0, 0, 255],
            TextureFormat::Rgba8UnormSrgb,
            RenderAssetUsages::default(),
        )
    }

    #[test]
    fn stacked_strip_becomes_a_cube() {
        let mut image = strip(4, 24);
        stacked_to_cubemap(&mut image).unwrap();
        assert_eq!(image.texture_descriptor.array_layer_count(), 6);
        assert_eq!(image.height(), 4);
        assert_eq!(
            image.texture_view_descriptor.as_ref().and_then(|d| d.dimension),
            Some(TextureViewDimension::Cube)
        );
    }

    #[test]
    fn flat_panorama_is_rejected() {
        let mut image = strip(8, 4);
        assert_eq!(
            stacked_to_cubemap(&mut image),
            Err(SkyboxError::NotStacked { width: 8, height: 4 })
        );
        assert!(image.texture_view_descriptor.is_none());
    }

    #[test]
    fn inset_occupies_top_right_fifth() {
        let (pos, size) = inset_rect(UVec2::new(1000, 500), Vec2::new(0.8, 0.0), Vec2::splat(0.2));
        assert_eq!(pos, UVec2::new(800, 0));
        assert_eq!(size, UVec2::new(200, 100));
    }

    #[test]
    fn inset_never_overflows_or_vanishes() {
        let (pos, size) = inset_rect(UVec2::new(3, 3), Vec2::new(0.9, 0.9), Vec2::splat(0.9));
        assert!(pos.x + size.x <= 3 && pos.y + size.y <= 3);
        assert!(size.x >= 1 && size.y >= 1);
    }
}
