use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::battle::BATTLE_WORKFLOW;
use super::markers::*;
use crate::error::SceneError;

/// The closed set of scenes the engine can recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SceneKind {
    Unknown,
    Login,
    Index,
    Index2,
    Explore,
    Battle,
}

/// One rule of a transition table: seeing `marker` moves to `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub marker: &'static str,
    pub target: SceneKind,
}

impl Transition {
    const fn new(marker: &'static str, target: SceneKind) -> Self {
        Self { marker, target }
    }
}

const UNKNOWN_TRANSITIONS: &[Transition] = &[
    Transition::new(LOGIN_TAG, SceneKind::Login),
    Transition::new(LOGIN_ENTER_BTN, SceneKind::Login),
    Transition::new(INDEX_INDEX2_BTN, SceneKind::Index),
    Transition::new(INDEX_EXPLORE_BTN, SceneKind::Index),
    Transition::new(EXPLORE_TAG, SceneKind::Explore),
    Transition::new(INDEX2_INDEX_BTN, SceneKind::Index2),
];

const LOGIN_TRANSITIONS: &[Transition] = &[
    Transition::new(INDEX_INDEX2_BTN, SceneKind::Index),
    Transition::new(INDEX_EXPLORE_BTN, SceneKind::Index),
];

const INDEX_TRANSITIONS: &[Transition] = &[
    Transition::new(EXPLORE_TAG, SceneKind::Explore),
    Transition::new(INDEX2_INDEX_BTN, SceneKind::Index2),
];

// Index2 and Explore share a table: back to Index, or into a battle.
const INDEX2_TRANSITIONS: &[Transition] = &[
    Transition::new(INDEX_INDEX2_BTN, SceneKind::Index),
    Transition::new(INDEX_EXPLORE_BTN, SceneKind::Index),
    Transition::new(BATTLE_PRESET_BTN, SceneKind::Battle),
    Transition::new(BATTLE_READY_BTN, SceneKind::Battle),
];

const EXPLORE_TRANSITIONS: &[Transition] = INDEX2_TRANSITIONS;

impl SceneKind {
    pub const ALL: [SceneKind; 6] = [
        SceneKind::Unknown,
        SceneKind::Login,
        SceneKind::Index,
        SceneKind::Index2,
        SceneKind::Explore,
        SceneKind::Battle,
    ];

    pub fn name_en(self) -> &'static str {
        match self {
            SceneKind::Unknown => "Unknown",
            SceneKind::Login => "Login",
            SceneKind::Index => "Index",
            SceneKind::Index2 => "Index2",
            SceneKind::Explore => "Explore",
            SceneKind::Battle => "Battle",
        }
    }

    pub fn name_cn(self) -> &'static str {
        match self {
            SceneKind::Unknown => "未知",
            SceneKind::Login => "登录",
            SceneKind::Index => "庭院",
            SceneKind::Index2 => "町中",
            SceneKind::Explore => "探索",
            SceneKind::Battle => "战斗",
        }
    }

    /// Rules evaluated in declaration order; the first marker present wins.
    /// Battle has none: it leaves only by rolling back.
    pub fn transitions(self) -> &'static [Transition] {
        match self {
            SceneKind::Unknown => UNKNOWN_TRANSITIONS,
            SceneKind::Login => LOGIN_TRANSITIONS,
            SceneKind::Index => INDEX_TRANSITIONS,
            SceneKind::Index2 => INDEX2_TRANSITIONS,
            SceneKind::Explore => EXPLORE_TRANSITIONS,
            SceneKind::Battle => &[],
        }
    }

    /// Markers the matcher should test while this scene is active.
    pub fn expected_markers(self) -> Vec<&'static str> {
        match self {
            SceneKind::Battle => BATTLE_WORKFLOW.iter().map(|(marker, _)| *marker).collect(),
            other => other.transitions().iter().map(|t| t.marker).collect(),
        }
    }

    /// First transition whose marker is in `founds`.
    pub fn next_for(self, founds: &super::Founds) -> Option<SceneKind> {
        self.transitions()
            .iter()
            .find(|t| founds.contains(t.marker))
            .map(|t| t.target)
    }
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name_en())
    }
}

impl FromStr for SceneKind {
    type Err = SceneError;

    /// Accepts the display name in any case, optionally suffixed with `SceneState`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let base = trimmed.strip_suffix("SceneState").unwrap_or(trimmed);
        SceneKind::ALL
            .into_iter()
            .find(|kind| kind.name_en().eq_ignore_ascii_case(base))
            .ok_or_else(|| SceneError::UnknownVariant(s.to_owned()))
    }
}
