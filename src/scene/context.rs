use std::borrow::Cow;
use std::mem;

use tracing::info;

use super::state::{Scene, SceneAction};
use super::{Founds, SceneKind};
use crate::error::SceneError;

/// Holds the active scene and exactly one previous scene.
///
/// `next_state` pushes the current scene into the previous slot; `prev_state`
/// swaps the two slots, so rolling back twice returns to where it started.
#[derive(Debug, Clone, Default)]
pub struct SceneContext {
    current: Scene,
    previous: Scene,
}

impl SceneContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lets the current scene inspect `founds` and applies the resulting action.
    pub fn update(&mut self, founds: &Founds) -> SceneAction {
        let action = self.current.handle(founds);
        match action {
            SceneAction::Stay => {}
            SceneAction::Advance(kind) => self.next_state(kind),
            SceneAction::RollBack => self.prev_state(),
        }
        action
    }

    /// Replaces the current scene with a fresh instance of `kind`.
    pub fn next_state(&mut self, kind: SceneKind) {
        let fresh = Scene::fresh(kind);
        self.previous = mem::replace(&mut self.current, fresh);
        info!(
            "Scene switch {} -> {} ({} -> {})",
            self.previous.name_en(),
            self.current.name_en(),
            self.previous.name_cn(),
            self.current.name_cn()
        );
    }

    /// Same as [`next_state`](Self::next_state) but resolves the kind by name.
    pub fn next_state_named(&mut self, name: &str) -> Result<(), SceneError> {
        let kind = name.parse::<SceneKind>()?;
        self.next_state(kind);
        Ok(())
    }

    pub fn prev_state(&mut self) {
        mem::swap(&mut self.current, &mut self.previous);
        info!(
            "Scene roll back {} -> {}",
            self.previous.name_en(),
            self.current.name_en()
        );
    }

    pub fn current(&self) -> &Scene {
        &self.current
    }

    pub fn previous(&self) -> &Scene {
        &self.previous
    }

    pub fn current_scene_name(&self) -> Cow<'static, str> {
        self.current.name_en()
    }

    pub fn current_scene_name_cn(&self) -> Cow<'static, str> {
        self.current.name_cn()
    }

    pub fn current_scene_targets(&self) -> Vec<&'static str> {
        self.current.expected_markers()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::battle::BattlePhase;
    use crate::scene::markers::*;

    fn founds(markers: &[&str]) -> Founds {
        markers.iter().copied().collect()
    }

    #[test]
    fn starts_unknown_in_both_slots() {
        let ctx = SceneContext::new();
        assert_eq!(ctx.current().kind(), SceneKind::Unknown);
        assert_eq!(ctx.previous().kind(), SceneKind::Unknown);
        assert_eq!(ctx.current_scene_name(), "Unknown");
    }

    #[test]
    fn next_then_prev_twice_is_identity() {
        let mut ctx = SceneContext::new();
        ctx.next_state(SceneKind::Login);
        ctx.next_state(SceneKind::Index);

        ctx.prev_state();
        assert_eq!(ctx.current().kind(), SceneKind::Login);
        assert_eq!(ctx.previous().kind(), SceneKind::Index);

        ctx.prev_state();
        assert_eq!(ctx.current().kind(), SceneKind::Index);
        assert_eq!(ctx.previous().kind(), SceneKind::Login);
    }

    #[test]
    fn next_state_always_builds_a_fresh_instance() {
        let mut ctx = SceneContext::new();
        ctx.next_state(SceneKind::Battle);
        ctx.update(&founds(&[BATTLE_AUTO_BTN]));
        assert_eq!(ctx.current_scene_name(), "Battle | progress");

        ctx.next_state(SceneKind::Battle);
        assert_eq!(ctx.current_scene_name(), "Battle");
        assert_eq!(ctx.previous().name_en(), "Battle | progress");
    }

    #[test]
    fn named_transition_rejects_unknown_names() {
        let mut ctx = SceneContext::new();
        assert!(ctx.next_state_named("explore").is_ok());
        assert_eq!(ctx.current().kind(), SceneKind::Explore);
        assert_eq!(
            ctx.next_state_named("Shop"),
            Err(SceneError::UnknownVariant("Shop".into()))
        );
        assert_eq!(ctx.current().kind(), SceneKind::Explore);
    }

    #[test]
    fn update_with_no_hits_changes_nothing() {
        let mut ctx = SceneContext::new();
        assert_eq!(ctx.update(&Founds::new()), SceneAction::Stay);
        assert_eq!(ctx.current().kind(), SceneKind::Unknown);
    }

    #[test]
    fn targets_follow_the_current_scene() {
        let mut ctx = SceneContext::new();
        ctx.next_state(SceneKind::Login);
        assert_eq!(
            ctx.current_scene_targets(),
            vec![INDEX_INDEX2_BTN, INDEX_EXPLORE_BTN]
        );
    }

    #[test]
    fn login_then_index() {
        let mut ctx = SceneContext::new();
        ctx.update(&founds(&[LOGIN_TAG]));
        assert_eq!(ctx.current_scene_name(), "Login");
        ctx.update(&founds(&[INDEX_INDEX2_BTN]));
        assert_eq!(ctx.current_scene_name(), "Index");
        assert_eq!(ctx.previous().kind(), SceneKind::Login);
    }

    #[test]
    fn explore_battle_round_trip() {
        let mut ctx = SceneContext::new();

        ctx.update(&founds(&[LOGIN_TAG]));
        assert_eq!(ctx.current().kind(), SceneKind::Login);

        ctx.update(&founds(&[INDEX_EXPLORE_BTN]));
        assert_eq!(ctx.current().kind(), SceneKind::Index);

        ctx.update(&founds(&[EXPLORE_TAG]));
        assert_eq!(ctx.current().kind(), SceneKind::Explore);

        ctx.update(&founds(&[BATTLE_READY_BTN]));
        assert_eq!(ctx.current().kind(), SceneKind::Battle);
        assert_eq!(ctx.current_scene_name(), "Battle");

        ctx.update(&founds(&[BATTLE_READY_BTN]));
        assert_eq!(ctx.current_scene_name(), "Battle | ready");

        ctx.update(&founds(&[BATTLE_AUTO_BTN]));
        assert_eq!(ctx.current_scene_name_cn(), "战斗 | 进行中");

        ctx.update(&founds(&[BATTLE_CLICK_CONTINUE_TAG]));
        assert!(
            matches!(ctx.current(), Scene::Battle(p) if p.phase() == BattlePhase::Completed)
        );
        assert_eq!(ctx.current().kind(), SceneKind::Battle);

        // Completion is acted on one tick later, whatever that tick sees.
        assert_eq!(ctx.update(&Founds::new()), SceneAction::RollBack);
        assert_eq!(ctx.current().kind(), SceneKind::Explore);
        assert_eq!(ctx.previous().kind(), SceneKind::Battle);
    }
}
