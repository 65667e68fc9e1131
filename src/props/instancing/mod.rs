//! Instanced copies of a single template mesh.
//! A field registers all of its transforms in one batch call, then attaches a
//! single physics aggregate to the template; `replicate_aggregates` copies that
//! aggregate onto every instance once the template mesh is available.

pub mod backend;
pub mod components;
pub mod systems;

pub use backend::{AggregateDesc, CommandsBackend, InstanceBackend, InstanceTemplate, ShapeKind};
