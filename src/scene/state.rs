use std::borrow::Cow;

use super::battle::BattleProgress;
use super::{Founds, SceneKind};

/// A live scene instance. Only Battle carries state of its own.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Scene {
    #[default]
    Unknown,
    Login,
    Index,
    Index2,
    Explore,
    Battle(BattleProgress),
}

/// What the context should do after a scene has looked at a tick's founds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneAction {
    Stay,
    Advance(SceneKind),
    RollBack,
}

impl Scene {
    /// A freshly constructed instance of `kind`.
    pub fn fresh(kind: SceneKind) -> Self {
        match kind {
            SceneKind::Unknown => Scene::Unknown,
            SceneKind::Login => Scene::Login,
            SceneKind::Index => Scene::Index,
            SceneKind::Index2 => Scene::Index2,
            SceneKind::Explore => Scene::Explore,
            SceneKind::Battle => Scene::Battle(BattleProgress::new()),
        }
    }

    pub fn kind(&self) -> SceneKind {
        match self {
            Scene::Unknown => SceneKind::Unknown,
            Scene::Login => SceneKind::Login,
            Scene::Index => SceneKind::Index,
            Scene::Index2 => SceneKind::Index2,
            Scene::Explore => SceneKind::Explore,
            Scene::Battle(_) => SceneKind::Battle,
        }
    }

    /// English label; Battle is qualified with its phase once one has been observed.
    pub fn name_en(&self) -> Cow<'static, str> {
        match self {
            Scene::Battle(progress) => match progress.observed_phase() {
                Some(phase) => Cow::Owned(format!(
                    "{} | {}",
                    SceneKind::Battle.name_en(),
                    phase.description_en()
                )),
                None => Cow::Borrowed(SceneKind::Battle.name_en()),
            },
            other => Cow::Borrowed(other.kind().name_en()),
        }
    }

    pub fn name_cn(&self) -> Cow<'static, str> {
        match self {
            Scene::Battle(progress) => match progress.observed_phase() {
                Some(phase) => Cow::Owned(format!(
                    "{} | {}",
                    SceneKind::Battle.name_cn(),
                    phase.description_cn()
                )),
                None => Cow::Borrowed(SceneKind::Battle.name_cn()),
            },
            other => Cow::Borrowed(other.kind().name_cn()),
        }
    }

    pub fn expected_markers(&self) -> Vec<&'static str> {
        self.kind().expected_markers()
    }

    /// Decides this tick's action from `founds`.
    ///
    /// Ordinary scenes take the first matching row of their transition table. Battle
    /// first checks for completion (rolling back and ignoring `founds`), otherwise it
    /// only updates its embedded phase and never advances.
    pub fn handle(&mut self, founds: &Founds) -> SceneAction {
        match self {
            Scene::Battle(progress) => {
                if progress.is_completed() {
                    SceneAction::RollBack
                } else {
                    progress.observe(founds);
                    SceneAction::Stay
                }
            }
            other => other
                .kind()
                .next_for(founds)
                .map_or(SceneAction::Stay, SceneAction::Advance),
        }
    }
}
