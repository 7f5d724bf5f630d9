use std::path::Path;

use tracing::info;

use crate::common::Frame;
use crate::error::FrameError;

/// Writes `frame` to `path`, picking the format from the extension.
pub fn save_frame(frame: &Frame, path: &Path) -> Result<(), FrameError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| FrameError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    frame.image().save(path).map_err(|source| FrameError::Save {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Saved frame {} to {:?}", frame.frame_id(), path);
    Ok(())
}
