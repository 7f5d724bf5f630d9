pub mod frame;
pub mod geometry;
pub mod log_once;

pub use frame::Frame;
pub use geometry::{Point, Size};
pub use log_once::LogOnce;
