//! Zoom and fit modes
//!
//! Turns the pixel sizes of the pages on screen into display sizes for a
//! fit mode, the scale-up preference and the user zoom level.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::geometry::{Axis, Size};

/// How pages are fitted into the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ZoomMode {
    /// Fit both width and height
    #[default]
    Best,
    /// Fit the width, scroll vertically
    Width,
    /// Fit the height, scroll horizontally
    Height,
    /// Only the user zoom level applies
    Manual,
    /// Fit one axis to a fixed number of pixels
    Size,
}

impl ZoomMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZoomMode::Best => "best",
            ZoomMode::Width => "width",
            ZoomMode::Height => "height",
            ZoomMode::Manual => "manual",
            ZoomMode::Size => "size",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ZoomModel {
    fit_mode: ZoomMode,
    scale_up: bool,
    fit_to_size_axis: Axis,
    fit_to_size_px: u32,
    user_zoom_log: f64,
}

impl Default for ZoomModel {
    fn default() -> Self {
        Self {
            fit_mode: ZoomMode::Best,
            scale_up: false,
            fit_to_size_axis: Axis::Vertical,
            fit_to_size_px: 1800,
            user_zoom_log: Self::IDENTITY_ZOOM_LOG,
        }
    }
}

/// Per-page bookkeeping while distributing pages along an axis
#[derive(Debug, Clone)]
struct ScalingData {
    local_scale: f64,
    ideal: Option<[f64; 2]>,
    can_be_downscaled: bool,
    forced_scale: f64,
    forced_volume_error: f64,
}

impl ZoomModel {
    pub const IDENTITY_ZOOM: f64 = 1.0;
    pub const IDENTITY_ZOOM_LOG: f64 = 0.0;
    /// Zoom steps per doubling
    pub const USER_ZOOM_LOG_SCALE: f64 = 4.0;
    pub const MIN_USER_ZOOM_LOG: f64 = -20.0;
    pub const MAX_USER_ZOOM_LOG: f64 = 12.0;

    pub fn new(fit_mode: ZoomMode, scale_up: bool) -> Self {
        Self {
            fit_mode,
            scale_up,
            ..Self::default()
        }
    }

    pub fn fit_mode(&self) -> ZoomMode {
        self.fit_mode
    }

    pub fn set_fit_mode(&mut self, fit_mode: ZoomMode) {
        self.fit_mode = fit_mode;
    }

    pub fn set_scale_up(&mut self, scale_up: bool) {
        self.scale_up = scale_up;
    }

    /// Axis and pixel count used by [`ZoomMode::Size`]
    pub fn set_fit_to_size(&mut self, axis: Axis, px: u32) {
        self.fit_to_size_axis = axis;
        self.fit_to_size_px = px;
    }

    pub fn user_zoom_log(&self) -> f64 {
        self.user_zoom_log
    }

    pub fn set_user_zoom_log(&mut self, zoom_log: f64) {
        self.user_zoom_log = zoom_log.clamp(Self::MIN_USER_ZOOM_LOG, Self::MAX_USER_ZOOM_LOG);
    }

    pub fn zoom_in(&mut self) {
        self.set_user_zoom_log(self.user_zoom_log + 1.0);
    }

    pub fn zoom_out(&mut self) {
        self.set_user_zoom_log(self.user_zoom_log - 1.0);
    }

    pub fn reset_user_zoom(&mut self) {
        self.set_user_zoom_log(Self::IDENTITY_ZOOM_LOG);
    }

    pub fn user_scale(&self) -> f64 {
        2f64.powf(self.user_zoom_log / Self::USER_ZOOM_LOG_SCALE)
    }

    /// Display sizes for pages shown together on `screen`.
    ///
    /// Pages flagged in `do_not_transform` keep their size and are ignored
    /// by the user zoom.
    pub fn zoomed_sizes(
        &self,
        image_sizes: &[Size],
        screen: Size,
        distribution_axis: Axis,
        do_not_transform: &[bool],
    ) -> Vec<Size> {
        if image_sizes.is_empty() {
            return Vec::new();
        }
        let dnt = |i: usize| do_not_transform.get(i).copied().unwrap_or(false);
        let dist = distribution_axis.index();
        let screen = [screen.width, screen.height];

        let fitted = fix_page_sizes(image_sizes, distribution_axis, &dnt);
        let union = union_size(&fitted, dist);
        let limits = self.calc_limits(union, screen);

        let preferred_scale = preferred_scale(union, limits, dist);
        let mut scales: Vec<f64> = (0..fitted.len())
            .map(|i| if dnt(i) { Self::IDENTITY_ZOOM } else { preferred_scale })
            .collect();
        let prescaled: Vec<[u32; 2]> = fitted
            .iter()
            .zip(&scales)
            .map(|(&size, &scale)| scale_image_size(size, scale))
            .collect();
        let prescaled_union = union_size(&prescaled, dist);

        let other_preferences = limits
            .iter()
            .enumerate()
            .any(|(idx, limit)| idx != dist && limit.is_some());

        if let Some(limit) = limits[dist] {
            if prescaled_union[dist] > screen[dist] || !other_preferences {
                let distributed = self.scale_distributed(&fitted, dist, limit, &dnt);
                scales = if other_preferences {
                    scales.iter().zip(&distributed).map(|(a, b)| a.min(*b)).collect()
                } else {
                    distributed
                };
            }
        }

        if !self.scale_up {
            for scale in &mut scales {
                *scale = scale.min(Self::IDENTITY_ZOOM);
            }
        }

        let user_scale = self.user_scale();
        let result: Vec<Size> = fitted
            .iter()
            .zip(&scales)
            .enumerate()
            .map(|(i, (&size, &scale))| {
                let scale = scale * if dnt(i) { Self::IDENTITY_ZOOM } else { user_scale };
                let [w, h] = scale_image_size(size, scale);
                Size::new(w, h)
            })
            .collect();
        debug!(
            "zoom {} on {}x{}: {:?} -> {:?}",
            self.fit_mode.as_str(),
            screen[0],
            screen[1],
            image_sizes,
            result
        );
        result
    }

    /// Per-axis size limit imposed by the fit mode, `None` where the mode
    /// has no preference
    fn calc_limits(&self, union: [u32; 2], screen: [u32; 2]) -> [Option<u32>; 2] {
        let smaller_than_screen = union[0] < screen[0] && union[1] < screen[1];
        match self.fit_mode {
            ZoomMode::Best => [Some(screen[0]), Some(screen[1])],
            ZoomMode::Manual if self.scale_up && smaller_than_screen => [Some(screen[0]), Some(screen[1])],
            ZoomMode::Manual => [None, None],
            ZoomMode::Width => [Some(screen[0]), None],
            ZoomMode::Height => [None, Some(screen[1])],
            ZoomMode::Size => {
                let mut limits = [None, None];
                limits[self.fit_to_size_axis.index()] = Some(self.fit_to_size_px);
                limits
            }
        }
    }

    /// Scales for boxes laid end to end along `axis` so that their total
    /// size gets as close as possible to `max_size`. Equal boxes always get
    /// equal scales. With more boxes than pixels every box shrinks to 1.
    fn scale_distributed(&self, sizes: &[[u32; 2]], axis: usize, max_size: u32, dnt: &dyn Fn(usize) -> bool) -> Vec<f64> {
        let n = sizes.len();
        if n == 0 {
            return Vec::new();
        }
        if n as u64 >= u64::from(max_size) {
            return sizes.iter().map(|s| 1.0 / f64::from(s[axis].max(1))).collect();
        }

        let total: u64 = sizes.iter().map(|s| u64::from(s[axis])).sum();
        if total <= u64::from(max_size) && !self.scale_up {
            return vec![Self::IDENTITY_ZOOM; n];
        }

        let scale = f64::from(max_size) / total.max(1) as f64;
        let mut total_axis_size: i64 = 0;
        let mut data: Vec<ScalingData> = Vec::with_capacity(n);

        for (i, &size) in sizes.iter().enumerate() {
            if dnt(i) {
                total_axis_size += i64::from(size[axis]);
                data.push(ScalingData {
                    local_scale: Self::IDENTITY_ZOOM,
                    ideal: None,
                    can_be_downscaled: false,
                    forced_scale: Self::IDENTITY_ZOOM,
                    forced_volume_error: 0.0,
                });
                continue;
            }

            let axis_size = f64::from(size[axis].max(1));
            let ideal = [f64::from(size[0]) * scale, f64::from(size[1]) * scale];
            let ideal_volume = ideal[0] * ideal[1];
            let approx = round_nonempty(ideal[axis]);
            total_axis_size += i64::from(approx);

            let can_be_downscaled = approx > 1;
            let (forced_scale, forced_volume_error) = if can_be_downscaled {
                let forced_scale = f64::from(approx - 1) / axis_size;
                let forced = scale_image_size(size, forced_scale);
                let forced_volume = f64::from(forced[0]) * f64::from(forced[1]);
                (forced_scale, (forced_volume - ideal_volume) / ideal_volume)
            } else {
                (0.0, 0.0)
            };
            data.push(ScalingData {
                local_scale: f64::from(approx) / axis_size,
                ideal: Some(ideal),
                can_be_downscaled,
                forced_scale,
                forced_volume_error,
            });
        }

        // Shrink one pixel at a time, always picking the page whose forced
        // size deviates least from its ideal volume, until the spread fits.
        let mut dirty = true;
        while dirty && total_axis_size > i64::from(max_size) {
            dirty = false;
            let mut current: Option<usize> = None;
            for (i, d) in data.iter().enumerate() {
                if !d.can_be_downscaled {
                    continue;
                }
                let better = current.is_none_or(|c| d.forced_volume_error < data[c].forced_volume_error);
                if better {
                    current = Some(i);
                }
            }
            let Some(current) = current else {
                break;
            };
            let current_ideal = data[current].ideal;
            for d in data.iter_mut().skip(current) {
                if !d.can_be_downscaled || d.ideal != current_ideal {
                    continue;
                }
                d.local_scale = d.forced_scale;
                d.can_be_downscaled = false;
                total_axis_size -= 1;
                dirty = true;
            }
        }

        data.into_iter().map(|d| d.local_scale).collect()
    }
}

/// In double-page mode the smaller page is scaled to match the larger one
/// on the axis the pages are not distributed along.
fn fix_page_sizes(image_sizes: &[Size], distribution_axis: Axis, dnt: &dyn Fn(usize) -> bool) -> Vec<[u32; 2]> {
    let sizes: Vec<[u32; 2]> = image_sizes.iter().map(|s| [s.width, s.height]).collect();
    if sizes.len() < 2 {
        return sizes;
    }
    let axis = distribution_axis.other().index();
    let max_size = sizes.iter().map(|s| s[axis]).max().unwrap_or(1);
    sizes
        .iter()
        .enumerate()
        .map(|(i, s)| {
            if dnt(i) {
                return *s;
            }
            let ratio = f64::from(max_size) / f64::from(s[axis].max(1));
            [
                (f64::from(s[0]) * ratio) as u32,
                (f64::from(s[1]) * ratio) as u32,
            ]
        })
        .collect()
}

/// Largest extent on every axis, except the distribution axis where the
/// pages add up
fn union_size(sizes: &[[u32; 2]], distribution_axis: usize) -> [u32; 2] {
    let mut union = [0u32; 2];
    for s in sizes {
        for idx in 0..2 {
            if idx == distribution_axis {
                union[idx] = union[idx].saturating_add(s[idx]);
            } else {
                union[idx] = union[idx].max(s[idx]);
            }
        }
    }
    union
}

fn preferred_scale(union: [u32; 2], limits: [Option<u32>; 2], distribution_axis: usize) -> f64 {
    limits
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != distribution_axis)
        .filter_map(|(idx, limit)| limit.map(|l| f64::from(l) / f64::from(union[idx].max(1))))
        .reduce(f64::min)
        .unwrap_or(ZoomModel::IDENTITY_ZOOM)
}

fn scale_image_size(size: [u32; 2], scale: f64) -> [u32; 2] {
    [
        round_nonempty(f64::from(size[0]) * scale),
        round_nonempty(f64::from(size[1]) * scale),
    ]
}

/// Rounds half to even, never below 1
fn round_nonempty(v: f64) -> u32 {
    let rounded = v.round_ties_even();
    if rounded >= 1.0 {
        rounded.min(f64::from(u32::MAX)) as u32
    } else {
        1
    }
}
