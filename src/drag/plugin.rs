use bevy::prelude::*;

use crate::input::{apply_deferred_camera_detach, fly_camera_controller};

use super::controller::{DragController, PointerEvent};
use super::systems::{apply_pointer_events, collect_pointer_events, update_cursor_ray, CursorRay};

pub struct DragPlugin;

impl Plugin for DragPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DragController>()
            .init_resource::<CursorRay>()
            .add_event::<PointerEvent>()
            .add_systems(First, apply_deferred_camera_detach)
            .add_systems(
                Update,
                (update_cursor_ray, collect_pointer_events, apply_pointer_events)
                    .chain()
                    .before(fly_camera_controller),
            );
    }
}
