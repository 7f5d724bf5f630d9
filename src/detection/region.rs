use crate::catalog::TemplateRecord;
use crate::error::DetectError;

/// Extra pixels searched past the trailing edges of an anchored template.
pub const SEARCH_MARGIN: u32 = 20;

/// Rectangular region of a frame searched for one template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl SearchRegion {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn full_image(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Computes the region to scan for `record` in a frame of the given size.
    ///
    /// Anchored templates get `[anchor, anchor + size + margin)` per axis. Full-scan
    /// templates start at 0 on both axes and run to the frame edge on any axis whose
    /// anchor is 0, or to `anchor + size + margin` otherwise. Everything is clipped.
    pub fn for_template(
        record: &TemplateRecord,
        frame_width: u32,
        frame_height: u32,
    ) -> Result<Self, DetectError> {
        let anchor = record.anchor();
        let size = record.size();
        let full_scan = record.full_scan();

        let (x0, x1) = axis_span(anchor.x, size.width, frame_width, full_scan);
        let (y0, y1) = axis_span(anchor.y, size.height, frame_height, full_scan);

        let region = Self::new(x0, y0, x1 - x0, y1 - y0);
        if region.is_empty() {
            return Err(DetectError::InvalidRegion {
                name: record.name().to_owned(),
            });
        }
        Ok(region)
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

fn axis_span(anchor: u32, extent: u32, limit: u32, full_scan: bool) -> (u32, u32) {
    let bounded_end = anchor.saturating_add(extent).saturating_add(SEARCH_MARGIN);
    let (start, end) = match (full_scan, anchor) {
        (false, _) => (anchor, bounded_end),
        (true, 0) => (0, limit),
        (true, _) => (0, bounded_end),
    };
    let end = end.min(limit);
    (start.min(end), end)
}
