use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

use crate::common::Size;
use crate::detection::MatchResult;
use crate::scene::{Founds, SceneAction, SceneKind};

/// One marker located during a tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerHit {
    pub marker: String,
    /// Box in reference-resolution coordinates.
    pub result: MatchResult,
}

impl MarkerHit {
    /// The box mapped back onto the capture it was found in, for drawing overlays.
    pub fn overlay_box(&self, display: Size) -> MatchResult {
        self.result.scaled_to(display)
    }
}

/// Everything one detection pass produced.
#[derive(Debug, Clone)]
pub struct TickReport {
    pub founds: Founds,
    pub hits: Vec<MarkerHit>,
    pub action: SceneAction,
    pub scene: SceneKind,
    pub scene_name: String,
    pub scene_name_cn: String,
    pub captured_at: DateTime<Utc>,
    pub analysis_duration: Duration,
}

impl TickReport {
    /// Every hit mapped onto a debug display of the given size.
    pub fn overlay_boxes(&self, display: Size) -> Vec<(String, MatchResult)> {
        self.hits
            .iter()
            .map(|hit| (hit.marker.clone(), hit.overlay_box(display)))
            .collect()
    }
}

#[derive(Debug, Clone)]
pub enum TickOutcome {
    /// No frame was available; the scene was left untouched.
    Skipped,
    Detected(TickReport),
}

impl TickOutcome {
    pub fn report(&self) -> Option<&TickReport> {
        match self {
            TickOutcome::Skipped => None,
            TickOutcome::Detected(report) => Some(report),
        }
    }
}

/// Read-only view of the engine for a host or UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineSnapshot {
    pub scene_name: String,
    pub scene_name_cn: String,
    pub expected_markers: Vec<&'static str>,
    pub last_hits: Vec<MarkerHit>,
    pub fps: Option<f64>,
}

impl EngineSnapshot {
    pub fn fps_label(&self) -> String {
        format!("FPS: {:.2}", self.fps.unwrap_or(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Point;

    #[test]
    fn overlay_maps_back_to_capture_resolution() {
        let hit = MarkerHit {
            marker: "login_tag".into(),
            result: MatchResult {
                top_left: Point::new(100, 50),
                bottom_right: Point::new(200, 90),
                confidence: 0.93,
            },
        };
        let boxed = hit.overlay_box(Size::new(2272, 1280));
        assert_eq!(boxed.top_left, Point::new(200, 100));
        assert_eq!(boxed.bottom_right, Point::new(400, 180));
        assert_eq!(boxed.confidence, 0.93);
    }

    #[test]
    fn fps_label_has_two_decimals() {
        let snapshot = EngineSnapshot {
            scene_name: "Unknown".into(),
            scene_name_cn: "未知".into(),
            expected_markers: Vec::new(),
            last_hits: Vec::new(),
            fps: Some(12.346),
        };
        assert_eq!(snapshot.fps_label(), "FPS: 12.35");
    }
}
