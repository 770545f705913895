//! Page layout
//!
//! Places one or more pages side by side inside a scrollable viewport.
//! Pages are laid out along the distribution axis (horizontal for a
//! double-page spread) and centered on the alignment axis. When the spread
//! is smaller than the viewport it is centered in it; the resulting content
//! boxes are in viewport coordinates.

use log::debug;
use serde::Serialize;

use crate::error::{GeometryError, Result};
use crate::geometry::{Axis, Orientation, Rect, Size, center_offset_1d};

/// Fixed gap in pixels between two neighbouring pages. The caller's
/// spacing is added on top of it.
pub const PAGE_GUTTER: i32 = 2;

/// Largest content plus viewport extent on any axis. Keeps every
/// intermediate box coordinate well inside `i32`.
pub const MAX_EXTENT: i64 = (i32::MAX / 4) as i64;

/// Scroll destination on one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scroll {
    /// Keep the current position
    #[default]
    Keep,
    /// Towards the smallest coordinates
    Backward,
    /// Towards the largest coordinates
    Forward,
    Center,
    /// Where the content starts in reading direction
    Start,
    /// Where the content ends in reading direction
    End,
}

/// Which box a scroll request refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollTarget {
    Union,
    Page(usize),
    First,
    Last,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutOptions {
    pub distribution_axis: Axis,
    pub alignment_axis: Axis,
    /// Extra pixels between pages, on top of [`PAGE_GUTTER`]
    pub spacing: i32,
    /// Give each page its own viewport-sized wrapper instead of wrapping
    /// the whole spread once
    pub wrap_individually: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            distribution_axis: Axis::Horizontal,
            alignment_axis: Axis::Vertical,
            spacing: 0,
            wrap_individually: false,
        }
    }
}

impl LayoutOptions {
    pub fn with_spacing(mut self, spacing: i32) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn with_axes(mut self, distribution: Axis, alignment: Axis) -> Self {
        self.distribution_axis = distribution;
        self.alignment_axis = alignment;
        self
    }

    pub fn wrap_individually(mut self, wrap: bool) -> Self {
        self.wrap_individually = wrap;
        self
    }

    fn gap(&self) -> i32 {
        PAGE_GUTTER.saturating_add(self.spacing)
    }

    /// Rejects a negative gap and extents the box arithmetic cannot hold
    fn validate(&self, page_sizes: &[Size], viewport: Size) -> Result<()> {
        let gap = self.gap();
        if gap < 0 {
            return Err(GeometryError::NegativeGap(gap));
        }
        let gaps = i64::from(gap) * (page_sizes.len() as i64 - 1).max(0);
        for axis in [Axis::Horizontal, Axis::Vertical] {
            let extents = page_sizes.iter().map(|s| i64::from(s.get(axis)));
            let content = if axis == self.distribution_axis {
                extents.sum::<i64>() + gaps
            } else {
                extents.max().unwrap_or(0) + 1
            };
            let extent = content + i64::from(viewport.get(axis));
            if extent > MAX_EXTENT {
                return Err(GeometryError::ExtentTooLarge {
                    axis: axis.index(),
                    extent,
                    max: MAX_EXTENT,
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layout {
    content_boxes: Vec<Rect>,
    #[serde(skip)]
    wrapper_boxes: Vec<Rect>,
    union_box: Rect,
    viewport_box: Rect,
    orientation: Orientation,
    #[serde(skip)]
    wrap_individually: bool,
}

/// Lays out `page_sizes` for the given viewport.
///
/// `alignment` is the index of the axis pages are centered on; pages are
/// distributed along the horizontal axis.
pub fn compute_layout(
    page_sizes: &[Size],
    viewport: Size,
    orientation: Orientation,
    spacing: i32,
    alignment: usize,
) -> Result<Layout> {
    let options = LayoutOptions::default()
        .with_spacing(spacing)
        .with_axes(Axis::Horizontal, Axis::from_index(alignment)?);
    Layout::new(page_sizes, viewport, orientation, options)
}

impl Layout {
    pub fn new(page_sizes: &[Size], viewport: Size, orientation: Orientation, options: LayoutOptions) -> Result<Self> {
        options.validate(page_sizes, viewport)?;

        let viewport_size = viewport.to_array();
        let signs = orientation.signs();
        let distribution = options.distribution_axis;
        let alignment = options.alignment_axis;
        let reversed = orientation.is_reversed(distribution);

        let mut content: Vec<Rect> = page_sizes.iter().map(|s| Rect::from_size(s.to_array())).collect();
        if reversed {
            content.reverse();
        }

        let content = Rect::align_center(&content, alignment.index(), 0, orientation.get(alignment));
        let mut content = Rect::distribute(&content, distribution.index(), 0, options.gap());

        let (mut wrappers, union_box) = if content.is_empty() {
            (Vec::new(), Rect::default())
        } else if options.wrap_individually {
            let wrappers: Vec<Rect> = content
                .iter()
                .map(|b| b.wrapper_box(viewport_size, signs))
                .collect();
            let union_box = Rect::bounding_box(&wrappers);
            (wrappers, union_box)
        } else {
            let union_box = Rect::bounding_box(&content).wrapper_box(viewport_size, signs);
            (vec![union_box], union_box)
        };

        // move to the global origin
        let origin = union_box.position();
        for b in content.iter_mut().chain(wrappers.iter_mut()) {
            *b = b.translate_opposite(origin);
        }
        let union_box = union_box.translate_opposite(origin);

        if reversed {
            content.reverse();
            wrappers.reverse();
        }

        debug!(
            "layout of {} page(s) in {viewport} ({orientation}): union {union_box}",
            content.len()
        );

        Ok(Self {
            content_boxes: content,
            wrapper_boxes: wrappers,
            union_box,
            viewport_box: Rect::from_size(viewport_size),
            orientation,
            wrap_individually: options.wrap_individually,
        })
    }

    /// Page boxes in the order the pages were given, in viewport coordinates
    pub fn content_boxes(&self) -> &[Rect] {
        &self.content_boxes
    }

    /// One wrapper per page when wrapping individually, else just the union
    pub fn wrapper_boxes(&self) -> &[Rect] {
        &self.wrapper_boxes
    }

    pub fn union_box(&self) -> Rect {
        self.union_box
    }

    pub fn viewport_box(&self) -> Rect {
        self.viewport_box
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    pub fn set_viewport_position(&mut self, position: [i32; 2]) {
        self.viewport_box = self.viewport_box.with_position(position);
    }

    /// Index of the page closest to the center of the viewport
    pub fn current_index(&self) -> Option<usize> {
        self.viewport_box
            .current_box_index(self.orientation.signs(), &self.content_boxes)
    }

    /// Scrolls the viewport over the union box
    pub fn scroll_to(&mut self, destination: [Scroll; 2]) {
        let target = self.union_box;
        self.scroll_within(target, destination);
    }

    /// Scrolls the viewport over a single page's wrapper box. Layouts that
    /// wrap the whole spread once always use the union box.
    pub fn scroll_to_page(&mut self, target: ScrollTarget, destination: [Scroll; 2]) -> Result<()> {
        let count = self.wrapper_boxes.len();
        let index = match target {
            _ if !self.wrap_individually => None,
            ScrollTarget::Union => None,
            ScrollTarget::First => Some(0),
            ScrollTarget::Last => Some(count.saturating_sub(1)),
            ScrollTarget::Page(page) => Some(page),
        };
        let content = match index {
            None => self.union_box,
            Some(page) => *self
                .wrapper_boxes
                .get(page)
                .ok_or(GeometryError::PageOutOfRange { page, count })?,
        };
        self.scroll_within(content, destination);
        Ok(())
    }

    fn scroll_within(&mut self, content: Rect, destination: [Scroll; 2]) {
        let content_position = content.position();
        let content_size = content.size();
        let viewport_size = self.viewport_box.size();
        let mut result = self.viewport_box.position();

        for idx in 0..2 {
            let o = self.orientation.signs()[idx];
            let invisible = content_size[idx] - viewport_size[idx];
            let offset = match resolve_scroll(destination[idx], o) {
                None => continue,
                Some(Scroll::Center) => center_offset_1d(invisible, o),
                Some(Scroll::Forward) => invisible,
                Some(_) => 0,
            };
            result[idx] = content_position[idx] + offset;
        }
        self.set_viewport_position(result);
    }
}

/// Maps reading-relative destinations onto absolute ones
fn resolve_scroll(destination: Scroll, orientation: i32) -> Option<Scroll> {
    let towards = |forward: bool| {
        if forward == (orientation >= 0) {
            Scroll::Forward
        } else {
            Scroll::Backward
        }
    };
    match destination {
        Scroll::Keep => None,
        Scroll::End => Some(towards(true)),
        Scroll::Start => Some(towards(false)),
        other => Some(other),
    }
}
