//! Scene recognition state machine.
//!
//! Each tick the engine asks the current scene which markers to look for, runs
//! detection, and feeds the resulting [`Founds`] back through [`SceneContext::update`].

pub mod battle;
pub mod context;
pub mod founds;
pub mod kind;
pub mod markers;
pub mod shared;
pub mod state;

pub use battle::{BattlePhase, BattleProgress, BATTLE_WORKFLOW};
pub use context::SceneContext;
pub use founds::Founds;
pub use kind::{SceneKind, Transition};
pub use shared::{SceneSnapshot, SharedSceneContext};
pub use state::{Scene, SceneAction};
