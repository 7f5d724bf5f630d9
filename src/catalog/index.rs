use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::CatalogError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    /// Template JSON path, relative to the template directory.
    pub file: String,
    #[serde(default)]
    pub description: String,
}

/// The catalog index document: `{ "templates": [ { name, file, description } ] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogIndex {
    pub templates: Vec<CatalogEntry>,
}

impl CatalogIndex {
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

    /// Reads an existing index, or starts an empty one when the file does not exist yet.
    pub fn read_or_default(path: &Path) -> Result<Self, CatalogError> {
        if path.exists() {
            Self::read(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), CatalogError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| CatalogError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn append(&mut self, entry: CatalogEntry) {
        self.templates.push(entry);
    }

    pub fn entry(&self, name: &str) -> Option<&CatalogEntry> {
        self.templates.iter().find(|entry| entry.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_is_optional() {
        let index: CatalogIndex =
            serde_json::from_str(r#"{ "templates": [ { "name": "a", "file": "a.json" } ] }"#)
                .expect("parse");
        assert_eq!(index.entry("a").map(|e| e.file.as_str()), Some("a.json"));
        assert_eq!(index.templates[0].description, "");
    }

    #[test]
    fn missing_file_field_is_rejected() {
        let parsed = serde_json::from_str::<CatalogIndex>(r#"{ "templates": [ { "name": "a" } ] }"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn save_then_read_keeps_entry_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("template.json");

        let mut index = CatalogIndex::read_or_default(&path).expect("empty index");
        index.append(CatalogEntry {
            name: "login_tag".into(),
            file: "login_tag.json".into(),
            description: "登录".into(),
        });
        index.append(CatalogEntry {
            name: "explore_tag".into(),
            file: "explore_tag.json".into(),
            description: String::new(),
        });
        index.save(&path).expect("save");

        let names: Vec<_> = CatalogIndex::read(&path)
            .expect("read")
            .templates
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["login_tag", "explore_tag"]);
    }
}
