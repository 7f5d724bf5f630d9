use serde::{Deserialize, Serialize};

use super::markers::*;
use super::Founds;

/// Progress inside a battle. Tracked inside the Battle scene, never as a scene of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BattlePhase {
    #[default]
    Ready,
    InProgress,
    Completed,
}

impl BattlePhase {
    pub fn description_en(self) -> &'static str {
        match self {
            BattlePhase::Ready => "ready",
            BattlePhase::InProgress => "progress",
            BattlePhase::Completed => "completed",
        }
    }

    pub fn description_cn(self) -> &'static str {
        match self {
            BattlePhase::Ready => "准备",
            BattlePhase::InProgress => "进行中",
            BattlePhase::Completed => "结束",
        }
    }
}

/// Marker -> phase map. Scanned in full every tick; the last hit wins.
pub const BATTLE_WORKFLOW: &[(&str, BattlePhase)] = &[
    (BATTLE_READY_BTN, BattlePhase::Ready),
    (BATTLE_PRESET_BTN, BattlePhase::Ready),
    (BATTLE_AUTO_BTN, BattlePhase::InProgress),
    (BATTLE_CLICK_CONTINUE_TAG, BattlePhase::Completed),
];

/// Embedded battle sub-state. `phase` stays `None` until a workflow marker is seen,
/// which keeps the plain "Battle" label; gating treats `None` as `Ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BattleProgress {
    phase: Option<BattlePhase>,
}

impl BattleProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase.unwrap_or_default()
    }

    pub fn observed_phase(&self) -> Option<BattlePhase> {
        self.phase
    }

    pub fn is_completed(&self) -> bool {
        self.phase() == BattlePhase::Completed
    }

    /// Applies every workflow marker present in `founds`; returns whether the phase changed.
    pub fn observe(&mut self, founds: &Founds) -> bool {
        let before = self.phase;
        for (marker, phase) in BATTLE_WORKFLOW {
            if founds.contains(marker) {
                self.phase = Some(*phase);
            }
        }
        before != self.phase
    }
}
