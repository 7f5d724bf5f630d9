pub mod app;
pub mod catalog;
pub mod common;
pub mod config;
pub mod detection;
pub mod error;
pub mod intake;
pub mod pipeline;
pub mod scene;

pub use app::{Application, OperatorCommand};
pub use catalog::{Catalog, TemplateRecord};
pub use common::Frame;
pub use config::Settings;
pub use detection::{MatchResult, TemplateMatcher};
pub use error::{AppError, CatalogError, DetectError, FrameError, SceneError, SettingsError};
pub use intake::{DirectoryFrameSource, FrameSource, StaticFrameSource};
pub use pipeline::{SceneEngine, TickOutcome};
pub use scene::{Founds, SceneContext, SceneKind, SharedSceneContext};
