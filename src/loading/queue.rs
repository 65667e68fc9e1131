// src/loading/queue.rs

use bevy::gltf::Gltf;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::props::instancing::AggregateDesc;

/// Optional placement applied to a loaded mesh. Each field is independent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityOverrides {
    pub scaling: Option<Vec3>,
    pub position: Option<Vec3>,
}

impl EntityOverrides {
    /// Origin, no rotation, then whatever is overridden.
    pub fn transform(&self) -> Transform {
        let mut tf = Transform::IDENTITY;
        if let Some(s) = self.scaling {
            tf.scale = s;
        }
        if let Some(p) = self.position {
            tf.translation = p;
        }
        tf
    }
}

/// What to load and how to place it.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshTask {
    pub name: String,
    pub path: String,
    pub overrides: EntityOverrides,
    pub aggregate: AggregateDesc,
}

/// A task whose handles are in flight. `root` carries load errors for the
/// whole file; the labeled handles only ever see their own sub-asset.
#[derive(Clone, Debug)]
pub struct PendingLoad {
    pub task: MeshTask,
    pub root: Handle<Gltf>,
    pub mesh: Handle<Mesh>,
    pub material: Handle<StandardMaterial>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum LoadStatus {
    Loading,
    Loaded,
    Failed(String),
}

#[derive(Event, Clone, Debug)]
pub enum AssetLoadEvent {
    Loaded(PendingLoad),
    Failed { name: String, error: String },
    /// Every queued task has either loaded or failed. Sent once.
    Finished,
}

#[derive(Resource, Default)]
pub struct AssetQueue {
    pending: Vec<PendingLoad>,
    started: bool,
    finished: bool,
}

impl AssetQueue {
    pub fn enqueue(&mut self, load: PendingLoad) {
        self.pending.push(load);
    }

    /// Start reporting. Tasks enqueued later are still tracked.
    pub fn start(&mut self) {
        self.started = true;
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Resolve every task `status` says is done, in enqueue order.
    /// Emits `Finished` on the first poll that leaves nothing pending.
    pub fn poll(&mut self, mut status: impl FnMut(&PendingLoad) -> LoadStatus) -> Vec<AssetLoadEvent> {
        let mut out = Vec::new();
        if !self.started || self.finished {
            return out;
        }

        let mut still = Vec::with_capacity(self.pending.len());
        for load in self.pending.drain(..) {
            match status(&load) {
                LoadStatus::Loading => still.push(load),
                LoadStatus::Loaded => out.push(AssetLoadEvent::Loaded(load)),
                LoadStatus::Failed(error) => out.push(AssetLoadEvent::Failed {
                    name: load.task.name.clone(),
                    error,
                }),
            }
        }
        self.pending = still;

        if self.pending.is_empty() {
            self.finished = true;
            out.push(AssetLoadEvent::Finished);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props::instancing::ShapeKind;

    fn load(name: &str) -> PendingLoad {
        PendingLoad {
            task: MeshTask {
                name: name.to_string(),
                path: format!("meshes/{name}.glb"),
                overrides: EntityOverrides::default(),
                aggregate: AggregateDesc { shape: ShapeKind::Mesh, mass: 1.0, restitution: 0.88, friction: 0.5 },
            },
            root: Handle::default(),
            mesh: Handle::default(),
            material: Handle::default(),
        }
    }

    fn names(events: &[AssetLoadEvent]) -> Vec<String> {
        events
            .iter()
            .map(|e| match e {
                AssetLoadEvent::Loaded(l) => format!("ok:{}", l.task.name),
                AssetLoadEvent::Failed { name, .. } => format!("err:{name}"),
                AssetLoadEvent::Finished => "finished".to_string(),
            })
            .collect()
    }

    #[test]
    fn empty_queue_finishes_on_first_poll() {
        let mut q = AssetQueue::default();
        q.start();
        assert_eq!(names(&q.poll(|_| LoadStatus::Loading)), vec!["finished"]);
        assert!(q.is_finished());
        assert!(q.poll(|_| LoadStatus::Loaded).is_empty());
    }

    #[test]
    fn nothing_is_reported_before_start() {
        let mut q = AssetQueue::default();
        q.enqueue(load("stud"));
        assert!(q.poll(|_| LoadStatus::Loaded).is_empty());
        assert_eq!(q.pending(), 1);
    }

    #[test]
    fn failures_still_count_toward_finishing() {
        let mut q = AssetQueue::default();
        q.enqueue(load("bowlingBall"));
        q.enqueue(load("stud"));
        q.start();

        let first = q.poll(|l| {
            if l.task.name == "stud" {
                LoadStatus::Failed("missing file".into())
            } else {
                LoadStatus::Loading
            }
        });
        assert_eq!(names(&first), vec!["err:stud"]);
        assert!(!q.is_finished());

        let second = q.poll(|_| LoadStatus::Loaded);
        assert_eq!(names(&second), vec!["ok:bowlingBall", "finished"]);
        assert_eq!(q.pending(), 0);
    }

    #[test]
    fn overrides_are_independent() {
        let scaled = EntityOverrides { scaling: Some(Vec3::splat(2.0)), position: None };
        assert_eq!(scaled.transform().scale, Vec3::splat(2.0));
        assert_eq!(scaled.transform().translation, Vec3::ZERO);

        let moved = EntityOverrides { scaling: None, position: Some(Vec3::new(1.0, 2.0, 3.0)) };
        assert_eq!(moved.transform().scale, Vec3::ONE);
        assert_eq!(moved.transform().translation, Vec3::new(1.0, 2.0, 3.0));

        assert_eq!(EntityOverrides::default().transform(), Transform::IDENTITY);
    }
}
