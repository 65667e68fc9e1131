//! Mesh-load queue. Results surface as `AssetLoadEvent`s instead of callbacks.

mod plugin;
mod queue;
mod systems;

pub use plugin::{LoadingPlugin, LoadingSet};
pub use queue::{AssetLoadEvent, EntityOverrides};
