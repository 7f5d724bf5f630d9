use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use super::context::SceneContext;
use super::state::SceneAction;
use super::{Founds, SceneKind};
use crate::error::SceneError;

/// Read-only copy of the context's current scene, safe to hand to other tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SceneSnapshot {
    pub kind: SceneKind,
    pub name_en: String,
    pub name_cn: String,
    pub targets: Vec<&'static str>,
}

/// A [`SceneContext`] behind a mutex. Every operation holds the lock for its
/// whole duration, so `update` is atomic with respect to readers.
#[derive(Debug, Clone, Default)]
pub struct SharedSceneContext {
    inner: Arc<Mutex<SceneContext>>,
}

impl SharedSceneContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_context(context: SceneContext) -> Self {
        Self {
            inner: Arc::new(Mutex::new(context)),
        }
    }

    // Every operation leaves both slots valid, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, SceneContext> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn update(&self, founds: &Founds) -> SceneAction {
        self.lock().update(founds)
    }

    pub fn next_state(&self, kind: SceneKind) {
        self.lock().next_state(kind);
    }

    pub fn next_state_named(&self, name: &str) -> Result<(), SceneError> {
        self.lock().next_state_named(name)
    }

    pub fn prev_state(&self) {
        self.lock().prev_state();
    }

    pub fn current_kind(&self) -> SceneKind {
        self.lock().current().kind()
    }

    pub fn current_scene_name(&self) -> String {
        self.lock().current_scene_name().into_owned()
    }

    pub fn current_scene_name_cn(&self) -> String {
        self.lock().current_scene_name_cn().into_owned()
    }

    pub fn current_scene_targets(&self) -> Vec<&'static str> {
        self.lock().current_scene_targets()
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        let ctx = self.lock();
        let current = ctx.current();
        SceneSnapshot {
            kind: current.kind(),
            name_en: current.name_en().into_owned(),
            name_cn: current.name_cn().into_owned(),
            targets: current.expected_markers(),
        }
    }

    /// Runs `f` with the lock held.
    pub fn with<R>(&self, f: impl FnOnce(&mut SceneContext) -> R) -> R {
        f(&mut self.lock())
    }
}
