// Export modules for use in tests and by the binary
pub mod error;
pub mod fit;
pub mod geometry;
pub mod layout;
pub mod library;
pub mod panic_handler;
pub mod settings;
pub mod sort;
pub mod spread;
pub mod zoom;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use error::{GeometryError, Result};
pub use fit::{FitRequest, FitTarget, Rotation, fit_in_rectangle, fitting_size};
pub use geometry::{Axis, Orientation, Rect, Size};
pub use layout::{Layout, LayoutOptions, PAGE_GUTTER, Scroll, compute_layout};
pub use library::{PageEntry, PageLibrary, ScanOptions};
pub use settings::Settings;
pub use sort::{FileSort, compare_alphanumeric, sort_alphanumeric, sort_paths};
pub use spread::{SpreadOptions, SpreadPlan, SpreadPlanner};
pub use zoom::{ZoomMode, ZoomModel};
