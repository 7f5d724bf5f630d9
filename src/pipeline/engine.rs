use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use super::report::{EngineSnapshot, MarkerHit, TickOutcome, TickReport};
use crate::catalog::Catalog;
use crate::common::{Frame, LogOnce};
use crate::detection::TemplateMatcher;
use crate::error::{DetectError, FrameError};
use crate::intake::FrameSource;
use crate::scene::{Founds, SharedSceneContext};

/// Runs one detection pass per tick: capture, match the current scene's markers,
/// and feed the hits to the scene context.
pub struct SceneEngine {
    catalog: Arc<Catalog>,
    matcher: TemplateMatcher,
    context: SharedSceneContext,
    log_once: LogOnce,
    last_hits: Vec<MarkerHit>,
    last_frame: Option<Frame>,
}

impl SceneEngine {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self::with_context(catalog, SharedSceneContext::new())
    }

    pub fn with_context(catalog: Arc<Catalog>, context: SharedSceneContext) -> Self {
        Self {
            catalog,
            matcher: TemplateMatcher::new(),
            context,
            log_once: LogOnce::new(),
            last_hits: Vec::new(),
            last_frame: None,
        }
    }

    pub fn context(&self) -> &SharedSceneContext {
        &self.context
    }

    pub fn last_frame(&self) -> Option<&Frame> {
        self.last_frame.as_ref()
    }

    /// Captures from `source` and processes the frame.
    ///
    /// An unavailable source yields `Skipped` and leaves the scene untouched; any
    /// other capture failure is returned to the caller.
    pub fn tick(&mut self, source: &mut dyn FrameSource) -> Result<TickOutcome, FrameError> {
        match source.capture_frame() {
            Ok(frame) => {
                let report = self.process_frame(&frame);
                self.last_frame = Some(frame);
                Ok(TickOutcome::Detected(report))
            }
            Err(FrameError::Unavailable) => Ok(TickOutcome::Skipped),
            Err(e) => Err(e),
        }
    }

    /// Matches every marker the current scene expects and applies the result.
    pub fn process_frame(&mut self, frame: &Frame) -> TickReport {
        let started = Instant::now();
        let targets = self.context.current_scene_targets();
        let normalized = self.matcher.normalize(frame.image());

        let mut founds = Founds::new();
        let mut hits = Vec::new();
        for marker in targets {
            let detected = match self.catalog.find(marker) {
                Some(record) => self.matcher.detect_normalized(&normalized, record),
                None => Err(DetectError::UnknownMarker(marker.to_owned())),
            };
            match detected {
                Ok(Some(result)) => {
                    debug!("Found {} ({:.3})", marker, result.confidence);
                    founds.insert(marker);
                    hits.push(MarkerHit {
                        marker: marker.to_owned(),
                        result,
                    });
                }
                Ok(None) => {}
                Err(e) => {
                    self.log_once.error_once(&e.to_string());
                }
            }
        }

        let before = self.context.current_scene_name();
        let action = self.context.update(&founds);
        let snapshot = self.context.snapshot();
        if snapshot.name_en != before {
            info!("Current scene: {} ({})", snapshot.name_en, snapshot.name_cn);
        }

        self.last_hits = hits.clone();
        TickReport {
            founds,
            hits,
            action,
            scene: snapshot.kind,
            scene_name: snapshot.name_en,
            scene_name_cn: snapshot.name_cn,
            captured_at: frame.captured_at(),
            analysis_duration: started.elapsed(),
        }
    }

    pub fn snapshot(&self, fps: Option<f64>) -> EngineSnapshot {
        let scene = self.context.snapshot();
        EngineSnapshot {
            scene_name: scene.name_en,
            scene_name_cn: scene.name_cn,
            expected_markers: scene.targets,
            last_hits: self.last_hits.clone(),
            fps,
        }
    }
}
