pub mod fields;
pub mod instancing;
pub mod placement;
pub mod plugin;
pub mod showcase;

pub use plugin::PropsPlugin;
