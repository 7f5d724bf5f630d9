use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use scene_recognizer::catalog::authoring::EncodeRequest;
use scene_recognizer::config::DEFAULT_CONFIG_PATH;

#[derive(Debug, Parser)]
#[command(name = "scene-recognizer", version, about = "Recognizes game scenes from captured frames")]
pub struct Cli {
    /// Settings file. When given explicitly it must exist.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, PartialEq, Subcommand)]
pub enum Command {
    /// Watch the frame source and track the current scene (default)
    Run,
    /// Encode a marker screenshot into the template catalog
    Encode(EncodeArgs),
}

#[derive(Debug, PartialEq, Args)]
pub struct EncodeArgs {
    /// Marker screenshot; its file stem becomes the marker name
    pub image_path: PathBuf,
    /// Anchor x in the 1136x640 reference frame
    pub x: u32,
    /// Anchor y in the 1136x640 reference frame
    pub y: u32,
    /// Search the whole frame instead of the anchored region
    #[arg(long)]
    pub full_scan: bool,
    /// Treat x/y as distances from the right/bottom edge
    #[arg(long)]
    pub inverse: bool,
    #[arg(long = "desc", default_value = "")]
    pub description: String,
}

impl EncodeArgs {
    pub fn into_request(self) -> EncodeRequest {
        EncodeRequest {
            image_path: self.image_path,
            x: self.x,
            y: self.y,
            full_scan: self.full_scan,
            inverse: self.inverse,
            description: self.description,
        }
    }
}

impl Cli {
    pub fn config_path(&self) -> &Path {
        self.config
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH))
    }

    /// A missing file is only an error when `-c` was given.
    pub fn config_required(&self) -> bool {
        self.config.is_some()
    }

    pub fn command(self) -> Command {
        self.command.unwrap_or(Command::Run)
    }
}
