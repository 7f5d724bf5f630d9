pub mod directory;
pub mod source;
pub mod writer;

pub use directory::DirectoryFrameSource;
pub use source::{FrameSource, StaticFrameSource};
pub use writer::save_frame;
