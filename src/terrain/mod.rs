mod components;
mod plugin;
mod systems;

// Re-export the plugin and the marker the drag controller filters on.
pub use components::Ground;
pub use plugin::{TerrainPlugin, TerrainStartupSet};
