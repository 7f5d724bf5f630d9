use std::path::PathBuf;
use thiserror::Error;

// Main Application Error Type

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Settings Error: {0}")]
    Settings(#[from] SettingsError),
    #[error("Catalog Error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("Detection Error: {0}")]
    Detect(#[from] DetectError),
    #[error("Scene Error: {0}")]
    Scene(#[from] SceneError),
    #[error("Frame Error: {0}")]
    Frame(#[from] FrameError),
}

// Application settings (conf/config.json)
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to load settings from {path}: {source}")]
    Load {
        path: PathBuf,
        source: config::ConfigError,
    },
    #[error("Invalid setting `{0}`: {1}")]
    Invalid(&'static str, String),
}

// Template catalog loading and authoring. All of these are fatal at startup.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Template `{name}` has invalid base64 data: {source}")]
    Base64 {
        name: String,
        source: base64::DecodeError,
    },
    #[error("Template `{name}` could not be decoded: {source}")]
    Image {
        name: String,
        source: image::ImageError,
    },
    #[error("Template `{name}` has an empty reference image")]
    EmptyImage { name: String },
    #[error("Template `{name}` declares size {declared:?} but its image is {actual:?}")]
    SizeMismatch {
        name: String,
        declared: (u32, u32),
        actual: (u32, u32),
    },
    #[error("Duplicate template name `{0}`")]
    DuplicateName(String),
}

// Template matching against a single frame
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DetectError {
    #[error("Template `{name}` yields an empty search region")]
    InvalidRegion { name: String },
    #[error("Marker `{0}` is not in the template catalog")]
    UnknownMarker(String),
}

// Scene state machine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("Unknown scene variant `{0}`")]
    UnknownVariant(String),
}

// Frame capture and saving
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("No frame available")]
    Unavailable,
    #[error("Failed to read frame {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to decode frame {path}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("Failed to save frame {path}: {source}")]
    Save {
        path: PathBuf,
        source: image::ImageError,
    },
}

impl FrameError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, FrameError::Unavailable)
    }
}
