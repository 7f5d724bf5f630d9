use chrono::Utc;
use image::RgbImage;

use crate::common::Frame;
use crate::error::FrameError;

/// Anything that can hand the engine the current contents of the target window.
///
/// `FrameError::Unavailable` means "nothing to look at right now" (window closed,
/// minimised, directory empty) and is not treated as a failure by callers.
pub trait FrameSource: Send {
    fn capture_frame(&mut self) -> Result<Frame, FrameError>;
}

/// Yields the same image on every capture, each time with a fresh timestamp.
#[derive(Debug, Default)]
pub struct StaticFrameSource {
    image: Option<RgbImage>,
}

impl StaticFrameSource {
    pub fn new(image: RgbImage) -> Self {
        Self { image: Some(image) }
    }

    /// A source with no window behind it.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn set_image(&mut self, image: Option<RgbImage>) {
        self.image = image;
    }
}

impl FrameSource for StaticFrameSource {
    fn capture_frame(&mut self) -> Result<Frame, FrameError> {
        match &self.image {
            Some(image) => Ok(Frame::new(image.clone(), Utc::now())),
            None => Err(FrameError::Unavailable),
        }
    }
}
