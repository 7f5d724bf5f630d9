pub mod engine;
pub mod report;

pub use engine::SceneEngine;
pub use report::{EngineSnapshot, MarkerHit, TickOutcome, TickReport};
