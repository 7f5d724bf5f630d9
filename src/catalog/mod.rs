pub mod authoring;
pub mod index;
pub mod record;

pub use index::{CatalogEntry, CatalogIndex};
pub use record::{TemplateFile, TemplateRecord, REFERENCE_SIZE};

use indexmap::IndexMap;
use std::path::Path;
use tracing::{debug, info};

use crate::error::CatalogError;

/// In-memory index from marker name to its decoded template.
///
/// Built once at startup and never mutated afterwards, so it can be shared
/// read-only (typically behind an `Arc`) across any number of detections.
#[derive(Debug, Default)]
pub struct Catalog {
    templates: IndexMap<String, TemplateRecord>,
}

impl Catalog {
    /// Loads the index at `index_path`, resolving template files next to it.
    pub fn load(index_path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let index_path = index_path.as_ref();
        let template_dir = index_path.parent().unwrap_or_else(|| Path::new("."));
        Self::load_with_dir(index_path, template_dir)
    }

    /// Loads the index at `index_path`, resolving template files under `template_dir`.
    pub fn load_with_dir(
        index_path: impl AsRef<Path>,
        template_dir: impl AsRef<Path>,
    ) -> Result<Self, CatalogError> {
        let index_path = index_path.as_ref();
        let template_dir = template_dir.as_ref();
        let index = CatalogIndex::read(index_path)?;

        let mut records = Vec::with_capacity(index.templates.len());
        for entry in &index.templates {
            let path = template_dir.join(&entry.file);
            debug!("Loading template {} from {:?}", entry.name, path);
            let record = TemplateFile::read(&path)?.decode(&entry.name)?;
            records.push(record);
        }

        let catalog = Self::from_records(records)?;
        info!(
            "Loaded {} templates from {:?}",
            catalog.len(),
            index_path
        );
        Ok(catalog)
    }

    pub fn from_records(
        records: impl IntoIterator<Item = TemplateRecord>,
    ) -> Result<Self, CatalogError> {
        let mut templates = IndexMap::new();
        for record in records {
            let name = record.name().to_owned();
            if templates.contains_key(&name) {
                return Err(CatalogError::DuplicateName(name));
            }
            templates.insert(name, record);
        }
        Ok(Self { templates })
    }

    pub fn find(&self, name: &str) -> Option<&TemplateRecord> {
        self.templates.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Point;
    use image::{DynamicImage, Rgb, RgbImage};
    use std::fs;

    fn write_template(dir: &Path, name: &str) -> CatalogEntry {
        let image = RgbImage::from_fn(5, 3, |x, _| Rgb([x as u8 * 40, 0, 200]));
        let file = TemplateFile::from_image(
            name,
            &DynamicImage::ImageRgb8(image),
            Point::new(10, 20),
            false,
        )
        .expect("encode");
        let file_name = format!("{name}.json");
        file.write(&dir.join(&file_name)).expect("write template");
        CatalogEntry {
            name: name.to_owned(),
            file: file_name,
            description: String::new(),
        }
    }

    #[test]
    fn load_resolves_files_next_to_index() {
        let dir = tempfile::tempdir().expect("tempdir");
        let index = CatalogIndex {
            templates: vec![
                write_template(dir.path(), "login_tag"),
                write_template(dir.path(), "index_index2_btn"),
            ],
        };
        let index_path = dir.path().join("template.json");
        index.save(&index_path).expect("save index");

        let catalog = Catalog::load(&index_path).expect("load");
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.names().collect::<Vec<_>>(),
            vec!["login_tag", "index_index2_btn"]
        );
        let record = catalog.find("login_tag").expect("login_tag");
        assert_eq!(record.anchor(), Point::new(10, 20));
        assert!(catalog.find("battle_auto_btn").is_none());
    }

    #[test]
    fn missing_index_is_an_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = Catalog::load(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }

    #[test]
    fn malformed_template_json_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("broken.json"), r#"{ "lt_x": 1 }"#).expect("write");
        let index = CatalogIndex {
            templates: vec![CatalogEntry {
                name: "broken".into(),
                file: "broken.json".into(),
                description: String::new(),
            }],
        };
        let index_path = dir.path().join("template.json");
        index.save(&index_path).expect("save index");

        let err = Catalog::load(&index_path).unwrap_err();
        assert!(matches!(err, CatalogError::Json { .. }));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let image = RgbImage::from_pixel(2, 2, Rgb([1, 2, 3]));
        let a = TemplateRecord::from_image("dup", image.clone(), Point::default(), false)
            .expect("record");
        let b = TemplateRecord::from_image("dup", image, Point::default(), false).expect("record");
        let err = Catalog::from_records([a, b]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateName(name) if name == "dup"));
    }
}
