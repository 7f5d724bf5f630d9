use image::{imageops, imageops::FilterType, RgbImage};
use serde::Serialize;
use std::borrow::Cow;
use tracing::trace;

use super::correlation;
use super::region::SearchRegion;
use crate::catalog::{TemplateRecord, REFERENCE_SIZE};
use crate::common::{Frame, Point, Size};
use crate::error::DetectError;

/// Minimum correlation for a hit, inclusive.
pub const MATCH_THRESHOLD: f64 = 0.8;

pub fn accepts(confidence: f64) -> bool {
    confidence >= MATCH_THRESHOLD
}

/// A located marker, in reference-resolution coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchResult {
    pub top_left: Point,
    pub bottom_right: Point,
    pub confidence: f64,
}

impl MatchResult {
    /// Maps the box from the reference resolution onto a display of another size.
    pub fn scaled_to(&self, display: Size) -> Self {
        let sx = display.width as f64 / REFERENCE_SIZE.width as f64;
        let sy = display.height as f64 / REFERENCE_SIZE.height as f64;
        let scale = |p: Point| Point::new((p.x as f64 * sx) as u32, (p.y as f64 * sy) as u32);
        Self {
            top_left: scale(self.top_left),
            bottom_right: scale(self.bottom_right),
            confidence: self.confidence,
        }
    }
}

/// Stateless template matcher working at a fixed reference resolution.
#[derive(Debug, Clone)]
pub struct TemplateMatcher {
    reference: Size,
}

impl TemplateMatcher {
    pub fn new() -> Self {
        Self {
            reference: REFERENCE_SIZE,
        }
    }

    /// Resizes a capture to the reference resolution, borrowing when it already matches.
    pub fn normalize<'a>(&self, image: &'a RgbImage) -> Cow<'a, RgbImage> {
        if image.dimensions() == (self.reference.width, self.reference.height) {
            Cow::Borrowed(image)
        } else {
            Cow::Owned(imageops::resize(
                image,
                self.reference.width,
                self.reference.height,
                FilterType::Triangle,
            ))
        }
    }

    /// Looks for `record` in `frame`. `Ok(None)` is a miss.
    pub fn detect(
        &self,
        frame: &Frame,
        record: &TemplateRecord,
    ) -> Result<Option<MatchResult>, DetectError> {
        let normalized = self.normalize(frame.image());
        self.detect_normalized(&normalized, record)
    }

    /// Same as [`detect`](Self::detect) for an image already at the reference resolution,
    /// so one resize can serve every marker of a tick.
    pub fn detect_normalized(
        &self,
        image: &RgbImage,
        record: &TemplateRecord,
    ) -> Result<Option<MatchResult>, DetectError> {
        let region = SearchRegion::for_template(record, image.width(), image.height())?;

        let Some(peak) = correlation::best_match(image, region, record.image()) else {
            trace!("{} does not fit in {:?}", record.name(), region);
            return Ok(None);
        };
        if !accepts(peak.score) {
            trace!("{} best score {:.3} below threshold", record.name(), peak.score);
            return Ok(None);
        }

        let size = record.size();
        let top_left = Point::new(region.x + peak.x, region.y + peak.y);
        let bottom_right = Point::new(top_left.x + size.width, top_left.y + size.height);
        trace!(
            "{} found at {:?} with score {:.3}",
            record.name(),
            top_left,
            peak.score
        );

        Ok(Some(MatchResult {
            top_left,
            bottom_right,
            confidence: peak.score,
        }))
    }
}

impl Default for TemplateMatcher {
    fn default() -> Self {
        Self::new()
    }
}
