use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::source::FrameSource;
use crate::common::Frame;
use crate::error::FrameError;

const FRAME_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Replays screenshots from a directory in file-name order, wrapping around at the end.
///
/// The directory is rescanned whenever the cursor wraps, so frames dropped in while
/// running are picked up on the next pass. An empty or missing directory behaves
/// like a missing window.
#[derive(Debug)]
pub struct DirectoryFrameSource {
    dir: PathBuf,
    files: Vec<PathBuf>,
    cursor: usize,
}

impl DirectoryFrameSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            files: Vec::new(),
            cursor: 0,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn rescan(&mut self) {
        let mut files: Vec<PathBuf> = match fs::read_dir(&self.dir) {
            Ok(entries) => entries
                .filter_map(Result::ok)
                .map(|entry| entry.path())
                .filter(|path| path.is_file() && is_frame_file(path))
                .collect(),
            Err(e) => {
                debug!("Cannot list frame directory {:?}: {}", self.dir, e);
                Vec::new()
            }
        };
        files.sort();
        debug!("Found {} frames in {:?}", files.len(), self.dir);
        self.files = files;
        self.cursor = 0;
    }
}

fn is_frame_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            FRAME_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

impl FrameSource for DirectoryFrameSource {
    fn capture_frame(&mut self) -> Result<Frame, FrameError> {
        if self.cursor >= self.files.len() {
            self.rescan();
        }
        let Some(path) = self.files.get(self.cursor).cloned() else {
            return Err(FrameError::Unavailable);
        };
        self.cursor += 1;

        let bytes = fs::read(&path).map_err(|source| FrameError::Io {
            path: path.clone(),
            source,
        })?;
        let image = image::load_from_memory(&bytes)
            .map_err(|source| FrameError::Decode { path, source })?;
        Ok(Frame::from_dynamic(image))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn write_frame(dir: &Path, name: &str, shade: u8) {
        RgbImage::from_pixel(3, 2, Rgb([shade, shade, shade]))
            .save(dir.join(name))
            .expect("write frame");
    }

    #[test]
    fn frames_cycle_in_name_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_frame(dir.path(), "b.png", 20);
        write_frame(dir.path(), "a.png", 10);
        fs::write(dir.path().join("notes.txt"), "ignored").expect("write");

        let mut source = DirectoryFrameSource::new(dir.path());
        let shades: Vec<u8> = (0..3)
            .map(|_| source.capture_frame().expect("frame").image().get_pixel(0, 0).0[0])
            .collect();
        assert_eq!(shades, vec![10, 20, 10]);
    }

    #[test]
    fn empty_or_missing_directory_is_unavailable() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut source = DirectoryFrameSource::new(dir.path());
        assert!(source.capture_frame().unwrap_err().is_unavailable());

        let mut source = DirectoryFrameSource::new(dir.path().join("missing"));
        assert!(source.capture_frame().unwrap_err().is_unavailable());
    }

    #[test]
    fn corrupt_frame_is_a_decode_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("broken.png"), b"not a png").expect("write");
        let mut source = DirectoryFrameSource::new(dir.path());
        assert!(matches!(
            source.capture_frame(),
            Err(FrameError::Decode { .. })
        ));
    }
}
