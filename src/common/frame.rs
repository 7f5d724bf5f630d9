use chrono::{DateTime, Utc};
use image::{DynamicImage, RgbImage};
use std::sync::Arc;
use uuid::Uuid;

/// A single capture handed to the engine. Cloning shares the pixel buffer.
#[derive(Debug, Clone)]
pub struct Frame {
    image: Arc<RgbImage>,
    captured_at: DateTime<Utc>,
    frame_id: Uuid,
}

impl Frame {
    pub fn new(image: RgbImage, captured_at: DateTime<Utc>) -> Self {
        Self {
            image: Arc::new(image),
            captured_at,
            frame_id: Uuid::new_v4(),
        }
    }

    /// Converts any decoded capture (BGRA window grabs, PNG replays, ...) into RGB.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self::new(image.to_rgb8(), Utc::now())
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    pub fn frame_id(&self) -> Uuid {
        self.frame_id
    }
}
