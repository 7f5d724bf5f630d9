use base64::{engine::general_purpose::STANDARD, Engine};
use image::{DynamicImage, ImageFormat, RgbImage};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Cursor;
use std::path::Path;

use crate::common::{Point, Size};
use crate::error::CatalogError;

/// Resolution every anchor and size in the catalog is expressed in.
pub const REFERENCE_SIZE: Size = Size::new(1136, 640);

/// On-disk form of one template, one JSON document per marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateFile {
    pub lt_x: u32,
    pub lt_y: u32,
    pub width: u32,
    pub height: u32,
    pub is_all_scan: bool,
    /// Base64-encoded PNG.
    pub data: String,
}

impl TemplateFile {
    pub fn read(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| CatalogError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn write(&self, path: &Path) -> Result<(), CatalogError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| CatalogError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Encodes a captured marker image anchored at `anchor` in reference coordinates.
    pub fn from_image(
        name: &str,
        image: &DynamicImage,
        anchor: Point,
        full_scan: bool,
    ) -> Result<Self, CatalogError> {
        let mut png = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|source| CatalogError::Image {
                name: name.to_owned(),
                source,
            })?;

        Ok(Self {
            lt_x: anchor.x,
            lt_y: anchor.y,
            width: image.width(),
            height: image.height(),
            is_all_scan: full_scan,
            data: STANDARD.encode(png),
        })
    }

    pub fn decode(&self, name: &str) -> Result<TemplateRecord, CatalogError> {
        let bytes = STANDARD
            .decode(self.data.trim())
            .map_err(|source| CatalogError::Base64 {
                name: name.to_owned(),
                source,
            })?;
        let image = image::load_from_memory(&bytes)
            .map_err(|source| CatalogError::Image {
                name: name.to_owned(),
                source,
            })?
            .to_rgb8();

        TemplateRecord::new(
            name,
            image,
            Point::new(self.lt_x, self.lt_y),
            Size::new(self.width, self.height),
            self.is_all_scan,
        )
    }
}

/// A decoded marker, immutable once loaded.
#[derive(Debug, Clone)]
pub struct TemplateRecord {
    name: String,
    image: RgbImage,
    anchor: Point,
    size: Size,
    full_scan: bool,
}

impl TemplateRecord {
    pub fn new(
        name: impl Into<String>,
        image: RgbImage,
        anchor: Point,
        size: Size,
        full_scan: bool,
    ) -> Result<Self, CatalogError> {
        let name = name.into();
        let actual = image.dimensions();
        if actual.0 == 0 || actual.1 == 0 {
            return Err(CatalogError::EmptyImage { name });
        }
        if (size.width, size.height) != actual {
            return Err(CatalogError::SizeMismatch {
                name,
                declared: (size.width, size.height),
                actual,
            });
        }

        Ok(Self {
            name,
            image,
            anchor,
            size,
            full_scan,
        })
    }

    /// Builds a record whose declared size is taken from the image itself.
    pub fn from_image(
        name: impl Into<String>,
        image: RgbImage,
        anchor: Point,
        full_scan: bool,
    ) -> Result<Self, CatalogError> {
        let size = Size::from(image.dimensions());
        Self::new(name, image, anchor, size, full_scan)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn anchor(&self) -> Point {
        self.anchor
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn full_scan(&self) -> bool {
        self.full_scan
    }
}
