//! Turns captured marker screenshots into catalog entries.

use std::path::{Path, PathBuf};
use tracing::info;

use super::{CatalogEntry, CatalogIndex, TemplateFile, REFERENCE_SIZE};
use crate::common::Point;
use crate::error::CatalogError;

/// Options for encoding one marker image.
#[derive(Debug, Clone)]
pub struct EncodeRequest {
    pub image_path: PathBuf,
    pub x: u32,
    pub y: u32,
    pub full_scan: bool,
    /// Interpret `x`/`y` as distances from the right/bottom edge of the reference frame.
    pub inverse: bool,
    pub description: String,
}

/// Converts right/bottom-relative coordinates into a top-left anchor.
pub fn anchor_from_inverse(x: u32, y: u32) -> Point {
    Point::new(
        REFERENCE_SIZE.width.saturating_sub(x),
        REFERENCE_SIZE.height.saturating_sub(y),
    )
}

/// Writes `<stem>.json` into `out_dir` and appends it to the index at `index_path`.
/// Returns the marker name, which is the image's file stem.
pub fn encode_template(
    request: &EncodeRequest,
    out_dir: &Path,
    index_path: &Path,
) -> Result<String, CatalogError> {
    let name = request
        .image_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    let image = image::open(&request.image_path).map_err(|source| CatalogError::Image {
        name: name.clone(),
        source,
    })?;

    let anchor = if request.inverse {
        anchor_from_inverse(request.x, request.y)
    } else {
        Point::new(request.x, request.y)
    };

    let file = TemplateFile::from_image(&name, &image, anchor, request.full_scan)?;
    std::fs::create_dir_all(out_dir).map_err(|source| CatalogError::Io {
        path: out_dir.to_path_buf(),
        source,
    })?;
    let file_name = format!("{name}.json");
    file.write(&out_dir.join(&file_name))?;

    let mut index = CatalogIndex::read_or_default(index_path)?;
    index.append(CatalogEntry {
        name: name.clone(),
        file: file_name,
        description: request.description.clone(),
    });
    index.save(index_path)?;

    info!(
        "Encoded template {} at ({}, {}) {}x{}",
        name,
        anchor.x,
        anchor.y,
        file.width,
        file.height
    );
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use image::{Rgb, RgbImage};

    #[test]
    fn inverse_coordinates_count_from_bottom_right() {
        assert_eq!(anchor_from_inverse(100, 40), Point::new(1036, 600));
        assert_eq!(anchor_from_inverse(5000, 0), Point::new(0, 640));
    }

    #[test]
    fn encoded_template_is_loadable() {
        let dir = tempfile::tempdir().expect("tempdir");
        let png = dir.path().join("explore_tag.png");
        RgbImage::from_fn(7, 5, |x, y| Rgb([x as u8 * 30, y as u8 * 50, 90]))
            .save(&png)
            .expect("save png");

        let out_dir = dir.path().join("template");
        let index_path = out_dir.join("template.json");
        let request = EncodeRequest {
            image_path: png,
            x: 12,
            y: 34,
            full_scan: false,
            inverse: false,
            description: "探索".into(),
        };
        let name = encode_template(&request, &out_dir, &index_path).expect("encode");
        assert_eq!(name, "explore_tag");

        let catalog = Catalog::load(&index_path).expect("load");
        let record = catalog.find("explore_tag").expect("record");
        assert_eq!(record.anchor(), Point::new(12, 34));
        assert_eq!((record.size().width, record.size().height), (7, 5));
    }
}
