//! Small CPU particle effects: each particle is its own entity in world space.

mod components;
mod plugin;
mod systems;

pub use components::ParticleEmitter;
pub use plugin::ParticlesPlugin;
