//! Drag-to-move: pick a mesh, slide it across the ground under the cursor.

mod controller;
mod plugin;
mod systems;

pub use plugin::DragPlugin;
pub use systems::Unpickable;
