//! Spread planning
//!
//! Decides which pages are on screen for a page index, rotates and zooms
//! them, and lays them out for the current viewport.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, Result};
use crate::fit::Rotation;
use crate::geometry::{Axis, Orientation, Size};
use crate::layout::{Layout, LayoutOptions, PAGE_GUTTER};
use crate::zoom::ZoomModel;

/// When a page that would be half of a spread is shown on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VirtualDoublePage {
    Never,
    /// The first page (the cover) stands alone
    AsOneTitle,
    /// A landscape page is already a spread and stands alone
    AsOneWide,
    #[default]
    Always,
}

impl VirtualDoublePage {
    pub fn title_alone(self) -> bool {
        matches!(self, VirtualDoublePage::AsOneTitle | VirtualDoublePage::Always)
    }

    pub fn wide_alone(self) -> bool {
        matches!(self, VirtualDoublePage::AsOneWide | VirtualDoublePage::Always)
    }
}

/// Rotation chosen from the shape of the whole spread
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AutoRotate {
    #[default]
    Never,
    Width90,
    Width270,
    Height90,
    Height270,
}

impl AutoRotate {
    pub fn rotation_for(self, size: Size) -> Rotation {
        let portrait = size.height > size.width;
        let landscape = size.width > size.height;
        match self {
            AutoRotate::Height90 if portrait => Rotation::Quarter,
            AutoRotate::Height270 if portrait => Rotation::ThreeQuarter,
            AutoRotate::Width90 if landscape => Rotation::Quarter,
            AutoRotate::Width270 if landscape => Rotation::ThreeQuarter,
            _ => Rotation::None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpreadOptions {
    pub orientation: Orientation,
    pub double_page: bool,
    pub virtual_double_page: VirtualDoublePage,
    /// Page turns move by a whole spread in double-page mode
    pub double_step: bool,
    /// Extra pixels between pages on top of the gutter
    pub spacing: i32,
    pub zoom: ZoomModel,
    pub auto_rotate: AutoRotate,
    pub rotation: Rotation,
}

impl Default for SpreadOptions {
    fn default() -> Self {
        Self {
            orientation: Orientation::WESTERN,
            double_page: false,
            virtual_double_page: VirtualDoublePage::default(),
            double_step: true,
            spacing: 0,
            zoom: ZoomModel::default(),
            auto_rotate: AutoRotate::default(),
            rotation: Rotation::None,
        }
    }
}

/// Everything needed to draw one screen of pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpreadPlan {
    /// Page indices in reading order
    pub pages: Vec<usize>,
    /// Rotation applied to every page of the spread
    pub rotation: Rotation,
    /// Size each page is drawn at, after rotation
    pub display_sizes: Vec<Size>,
    pub layout: Layout,
}

impl SpreadPlan {
    pub fn is_double(&self) -> bool {
        self.pages.len() == 2
    }
}

#[derive(Debug, Clone, Default)]
pub struct SpreadPlanner {
    options: SpreadOptions,
}

impl SpreadPlanner {
    pub fn new(options: SpreadOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SpreadOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut SpreadOptions {
        &mut self.options
    }

    /// True when `page` is shown alone although double-page mode is on
    pub fn is_virtual_double(&self, page_sizes: &[Size], page: usize) -> bool {
        let mode = self.options.virtual_double_page;
        if page == 0 && mode.title_alone() {
            return true;
        }
        if !self.options.double_page || !mode.wide_alone() || is_last(page_sizes, page) {
            return false;
        }
        [page, page + 1]
            .iter()
            .filter_map(|&p| page_sizes.get(p))
            .any(|s| s.is_landscape())
    }

    /// Whether two pages are on screen starting at `page`
    pub fn shows_double(&self, page_sizes: &[Size], page: usize) -> bool {
        self.options.double_page && !self.is_virtual_double(page_sizes, page) && !is_last(page_sizes, page)
    }

    pub fn plan(&self, page_sizes: &[Size], page: usize, viewport: Size) -> Result<SpreadPlan> {
        let count = page_sizes.len();
        if page >= count {
            return Err(GeometryError::PageOutOfRange { page, count });
        }

        let pages: Vec<usize> = if self.shows_double(page_sizes, page) {
            vec![page, page + 1]
        } else {
            vec![page]
        };
        let mut sizes: Vec<Size> = pages.iter().map(|&p| page_sizes[p]).collect();

        let mut distribution = Axis::Horizontal;
        let mut alignment = Axis::Vertical;
        let mut orientation = self.options.orientation;

        let mut virtual_size = Size::default();
        for size in &sizes {
            virtual_size.set(distribution, virtual_size.get(distribution).saturating_add(size.get(distribution)));
            virtual_size.set(alignment, virtual_size.get(alignment).max(size.get(alignment)));
        }
        let rotation = self.options.auto_rotate.rotation_for(virtual_size).then(self.options.rotation);

        if rotation.swaps_axes() {
            std::mem::swap(&mut distribution, &mut alignment);
            orientation = orientation.swapped();
            for size in &mut sizes {
                *size = size.transposed();
            }
        } else if rotation == Rotation::Half {
            orientation = orientation.opposite();
        }

        let gaps = PAGE_GUTTER.saturating_add(self.options.spacing).saturating_mul(pages.len() as i32 - 1);
        let available = i64::from(viewport.get(distribution)) - i64::from(gaps);
        let mut zoom_screen = viewport;
        zoom_screen.set(distribution, u32::try_from(available.max(1)).unwrap_or(u32::MAX));

        let dnt = vec![false; sizes.len()];
        let display_sizes = self.options.zoom.zoomed_sizes(&sizes, zoom_screen, distribution, &dnt);

        let options = LayoutOptions::default()
            .with_axes(distribution, alignment)
            .with_spacing(self.options.spacing);
        let layout = Layout::new(&display_sizes, viewport, orientation, options)?;

        debug!(
            "spread at page {page}: {pages:?} rotated {} -> {display_sizes:?}",
            rotation.degrees()
        );

        Ok(SpreadPlan {
            pages,
            rotation,
            display_sizes,
            layout,
        })
    }

    /// Index shown after a forward page turn, clamped to the last page
    pub fn next_index(&self, page_sizes: &[Size], current: usize) -> usize {
        let count = page_sizes.len();
        if count == 0 {
            return 0;
        }
        let mut next = current + 1;
        if self.steps_double() && !self.is_virtual_double(page_sizes, current) {
            next += 1;
        }
        next.min(count - 1)
    }

    /// Index shown after a backward page turn, clamped to the first page
    pub fn previous_index(&self, page_sizes: &[Size], current: usize) -> usize {
        if page_sizes.is_empty() || current == 0 {
            return 0;
        }
        let mut previous = current - 1;
        if self.steps_double() && previous > 0 && !self.is_virtual_double(page_sizes, previous - 1) {
            previous -= 1;
        }
        previous.min(page_sizes.len() - 1)
    }

    fn steps_double(&self) -> bool {
        self.options.double_page && self.options.double_step
    }
}

fn is_last(page_sizes: &[Size], page: usize) -> bool {
    page + 1 >= page_sizes.len()
}
