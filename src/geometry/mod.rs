//! Integer geometry shared by the fitting, zoom and layout code

mod orientation;
mod rect;
mod size;

pub use orientation::{Axis, Orientation, ReadingDirection};
pub use rect::{Rect, center_offset_1d};
pub use size::Size;
