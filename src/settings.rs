// src/settings.rs
//! Scene configuration, read once from `assets/scene.ron` at app build time.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::loading::EntityOverrides;
use crate::props::instancing::{AggregateDesc, ShapeKind};

pub const SETTINGS_PATH: &str = "assets/scene.ron";

#[derive(Resource, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    /// Seeds every random draw in the scene (field jitter, particles).
    pub world_seed: u64,
    pub terrain: TerrainSettings,
    pub boxes: GridFieldSettings,
    pub spheres: ScatterFieldSettings,
    pub bowling_ball: LoadedEntitySettings,
    pub camera: FlyCameraSettings,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            world_seed: 1337,
            terrain: TerrainSettings::default(),
            boxes: GridFieldSettings::default(),
            spheres: ScatterFieldSettings::default(),
            bowling_ball: LoadedEntitySettings::default(),
            camera: FlyCameraSettings::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainSettings {
    pub heightmap: String,
    pub texture: String,
    pub width: f32,
    pub depth: f32,
    pub subdivisions: u32,
    pub min_height: f32,
    pub max_height: f32,
    /// Vertical offset applied to the whole ground mesh.
    pub offset_y: f32,
    /// How many times the ground texture repeats across the terrain.
    pub uv_scale: f32,
    pub aggregate: AggregateDesc,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            heightmap: "assets/textures/heightMap.png".to_string(),
            texture: "textures/grass.png".to_string(),
            width: 256.0,
            depth: 256.0,
            subdivisions: 512,
            min_height: 0.0,
            max_height: 10.0,
            offset_y: -20.0,
            uv_scale: 32.0,
            aggregate: AggregateDesc {
                shape: ShapeKind::Mesh,
                mass: 0.0,
                restitution: 0.1,
                friction: 10.0,
            },
        }
    }
}

/// Jittered lattice of boxes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridFieldSettings {
    pub enabled: bool,
    pub rows: u32,
    pub cols: u32,
    pub spacing: f32,
    /// Horizontal jitter range, drawn independently for x and z.
    pub jitter: (f32, f32),
    /// Height range for each instance.
    pub vertical: (f32, f32),
    pub size: f32,
    pub texture: String,
    pub aggregate: AggregateDesc,
}

impl Default for GridFieldSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            rows: 20,
            cols: 20,
            spacing: 10.0,
            jitter: (-1.0, 1.0),
            vertical: (0.0, 20.0),
            size: 4.0,
            texture: "textures/cubes/grass_cube.png".to_string(),
            aggregate: AggregateDesc {
                shape: ShapeKind::Box,
                mass: 2.0,
                restitution: 0.5,
                friction: 1.0,
            },
        }
    }
}

/// Uniformly scattered spheres. Off unless a settings file turns it on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScatterFieldSettings {
    pub enabled: bool,
    pub count: usize,
    pub x: (f32, f32),
    pub y: (f32, f32),
    pub z: (f32, f32),
    pub diameter: f32,
    pub aggregate: AggregateDesc,
}

impl Default for ScatterFieldSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            count: 100,
            x: (-64.0, 64.0),
            y: (4.0, 22.0),
            z: (-64.0, 64.0),
            diameter: 2.0,
            aggregate: AggregateDesc {
                shape: ShapeKind::Sphere,
                mass: 1.0,
                restitution: 0.2,
                friction: 1.0,
            },
        }
    }
}

/// A model pulled through the asset queue and dropped into the scene.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadedEntitySettings {
    pub name: String,
    pub path: String,
    pub overrides: EntityOverrides,
    pub aggregate: AggregateDesc,
}

impl Default for LoadedEntitySettings {
    fn default() -> Self {
        Self {
            name: "bowlingBall".to_string(),
            path: "meshes/bowlingBall.glb".to_string(),
            overrides: EntityOverrides::default(),
            aggregate: AggregateDesc {
                shape: ShapeKind::Mesh,
                mass: 1.0,
                restitution: 0.88,
                friction: 0.5,
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlyCameraSettings {
    pub position: Vec3,
    pub move_speed: f32,
    pub look_speed: f32,
    /// Frames it takes to level out a roll. Higher is slower.
    pub roll_correct: f32,
    pub banked_turn: bool,
    pub bank_limit: f32,
    pub bank_multiplier: f32,
    pub inset_position: Vec3,
}

impl Default for FlyCameraSettings {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 5.0, -50.0),
            move_speed: 20.0,
            look_speed: 0.2,
            roll_correct: 50.0,
            banked_turn: true,
            bank_limit: std::f32::consts::FRAC_PI_4,
            bank_multiplier: 1.0,
            inset_position: Vec3::new(10.0, 5.0, -10.0),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("I/O while reading settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

pub fn parse_settings(text: &str) -> Result<SceneSettings, SettingsError> {
    Ok(ron::from_str(text)?)
}

pub fn read_settings(path: impl AsRef<Path>) -> Result<SceneSettings, SettingsError> {
    let text = std::fs::read_to_string(path)?;
    parse_settings(&text)
}

/// Where the active settings came from, kept around so startup can log it.
#[derive(Resource, Debug)]
pub enum SettingsSource {
    File(PathBuf),
    Defaults { reason: String },
}

pub struct SettingsPlugin {
    pub path: PathBuf,
}

impl Default for SettingsPlugin {
    fn default() -> Self {
        Self { path: PathBuf::from(SETTINGS_PATH) }
    }
}

impl Plugin for SettingsPlugin {
    fn build(&self, app: &mut App) {
        // Read synchronously: every Startup system depends on these values.
        let (settings, source) = match read_settings(&self.path) {
            Ok(s) => (s, SettingsSource::File(self.path.clone())),
            Err(e) => (
                SceneSettings::default(),
                SettingsSource::Defaults { reason: e.to_string() },
            ),
        };
        app.insert_resource(settings)
            .insert_resource(source)
            .add_systems(Startup, report_settings_source);
    }
}

fn report_settings_source(source: Res<SettingsSource>, settings: Res<SceneSettings>) {
    match &*source {
        SettingsSource::File(path) => info!(
            "Settings: loaded '{}' (seed={})",
            path.display(),
            settings.world_seed
        ),
        SettingsSource::Defaults { reason } => {
            warn!("Settings: using defaults ({reason})");
        }
    }
}
