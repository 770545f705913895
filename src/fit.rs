//! Rectangle fitting
//!
//! Computes the display size of a page inside a target rectangle. All
//! ratio comparisons use 64-bit cross-multiplication so the result is the
//! same on every platform.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, Result};
use crate::geometry::Size;

/// Stand-in for an unbounded target axis
pub const UNBOUNDED: u32 = 100_000;

/// Clockwise rotation applied to a page before it is fitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum Rotation {
    #[default]
    None,
    Quarter,
    Half,
    ThreeQuarter,
}

impl Rotation {
    /// Accepts any multiple of 90, normalised modulo 360
    pub fn from_degrees(degrees: i32) -> Result<Self> {
        match degrees.rem_euclid(360) {
            0 => Ok(Rotation::None),
            90 => Ok(Rotation::Quarter),
            180 => Ok(Rotation::Half),
            270 => Ok(Rotation::ThreeQuarter),
            _ => Err(GeometryError::UnsupportedRotation(degrees)),
        }
    }

    pub const fn degrees(self) -> i32 {
        match self {
            Rotation::None => 0,
            Rotation::Quarter => 90,
            Rotation::Half => 180,
            Rotation::ThreeQuarter => 270,
        }
    }

    /// True for 90 and 270 degrees, which swap width and height
    pub const fn swaps_axes(self) -> bool {
        matches!(self, Rotation::Quarter | Rotation::ThreeQuarter)
    }

    #[must_use]
    pub fn then(self, other: Rotation) -> Rotation {
        match (self.degrees() + other.degrees()).rem_euclid(360) {
            90 => Rotation::Quarter,
            180 => Rotation::Half,
            270 => Rotation::ThreeQuarter,
            _ => Rotation::None,
        }
    }

    pub fn apply(self, size: Size) -> Size {
        if self.swaps_axes() {
            size.transposed()
        } else {
            size
        }
    }
}

impl TryFrom<i32> for Rotation {
    type Error = GeometryError;

    fn try_from(degrees: i32) -> Result<Self> {
        Self::from_degrees(degrees)
    }
}

impl From<Rotation> for i32 {
    fn from(rotation: Rotation) -> i32 {
        rotation.degrees()
    }
}

/// Target rectangle where a negative component means "unbounded"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitTarget {
    pub width: i32,
    pub height: i32,
}

impl FitTarget {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Replaces an unbounded axis with [`UNBOUNDED`] and clamps to 1 px.
    /// Both axes unbounded is a caller error.
    pub fn resolve(self) -> Result<Size> {
        if self.width < 0 && self.height < 0 {
            return Err(GeometryError::UnboundedTarget);
        }
        let axis = |v: i32| -> u32 {
            if v < 0 {
                UNBOUNDED
            } else {
                u32::try_from(v).unwrap_or(0).max(1)
            }
        };
        Ok(Size::new(axis(self.width), axis(self.height)))
    }
}

impl From<Size> for FitTarget {
    fn from(size: Size) -> Self {
        Self {
            width: i32::try_from(size.width).unwrap_or(i32::MAX),
            height: i32::try_from(size.height).unwrap_or(i32::MAX),
        }
    }
}

/// A complete fitting request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FitRequest {
    pub source: Size,
    pub target: FitTarget,
    pub keep_ratio: bool,
    pub scale_up: bool,
    pub rotation: Rotation,
}

impl FitRequest {
    pub fn new(source: Size, target: impl Into<FitTarget>) -> Self {
        Self {
            source,
            target: target.into(),
            keep_ratio: true,
            scale_up: false,
            rotation: Rotation::None,
        }
    }

    #[must_use]
    pub fn keep_ratio(mut self, keep_ratio: bool) -> Self {
        self.keep_ratio = keep_ratio;
        self
    }

    #[must_use]
    pub fn scale_up(mut self, scale_up: bool) -> Self {
        self.scale_up = scale_up;
        self
    }

    #[must_use]
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn fit(&self) -> Result<Size> {
        fit_in_rectangle(self.source, self.target, self.keep_ratio, self.scale_up, self.rotation)
    }
}

/// Largest size that fits `source` into `target`.
///
/// Without `scale_up` a source that already fits is returned unchanged.
/// With `keep_ratio` one axis matches the target exactly and the other is
/// floored, never below 1. Otherwise the target itself is returned. The
/// `scale_up` decision is made once for both axes.
pub fn fitting_size(source: Size, target: Size, keep_ratio: bool, scale_up: bool) -> Size {
    let src_w = u64::from(source.width.max(1));
    let src_h = u64::from(source.height.max(1));
    let t_w = u64::from(target.width.max(1));
    let t_h = u64::from(target.height.max(1));

    if !scale_up && src_w <= t_w && src_h <= t_h {
        return Size::new(src_w as u32, src_h as u32);
    }
    if !keep_ratio {
        return Size::new(t_w as u32, t_h as u32);
    }

    // src_w / t_w > src_h / t_h
    if src_w * t_h > src_h * t_w {
        let height = (src_h * t_w / src_w).max(1);
        Size::new(t_w as u32, clamp_u32(height))
    } else {
        let width = (src_w * t_h / src_h).max(1);
        Size::new(clamp_u32(width), t_h as u32)
    }
}

/// Fits `source`, rotated by `rotation`, into `target` and returns the
/// fitted size after rotation.
pub fn fit_in_rectangle(
    source: Size,
    target: FitTarget,
    keep_ratio: bool,
    scale_up: bool,
    rotation: Rotation,
) -> Result<Size> {
    let target = rotation.apply(target.resolve()?);
    let fitted = fitting_size(source, target, keep_ratio, scale_up);
    let result = rotation.apply(fitted);
    debug!(
        "fit {source} into {target} (keep_ratio={keep_ratio}, scale_up={scale_up}, rotation={}) -> {result}",
        rotation.degrees()
    );
    Ok(result)
}

/// Stretches `source` to exactly `target`, used once the zoom model has
/// decided the final page size.
pub fn fit_to_rectangle(source: Size, target: Size, rotation: Rotation) -> Result<Size> {
    fit_in_rectangle(source, target.into(), false, true, rotation)
}

/// Rotation implied by an EXIF orientation tag
pub fn implied_rotation(exif_orientation: u16) -> Rotation {
    match exif_orientation {
        3 => Rotation::Half,
        6 => Rotation::Quarter,
        8 => Rotation::ThreeQuarter,
        _ => Rotation::None,
    }
}

fn clamp_u32(v: u64) -> u32 {
    u32::try_from(v).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fit(source: (u32, u32), target: (i32, i32), keep_ratio: bool, scale_up: bool) -> Size {
        fit_in_rectangle(
            source.into(),
            FitTarget::new(target.0, target.1),
            keep_ratio,
            scale_up,
            Rotation::None,
        )
        .unwrap()
    }

    #[test]
    fn test_source_that_fits_is_unchanged() {
        assert_eq!(fit((100, 50), (200, 200), true, false), Size::new(100, 50));
        assert_eq!(fit((100, 50), (100, 50), true, false), Size::new(100, 50));
    }

    #[test]
    fn test_keep_ratio_downscale() {
        // width dominates
        assert_eq!(fit((2000, 1000), (500, 500), true, false), Size::new(500, 250));
        // height dominates
        assert_eq!(fit((1000, 2000), (500, 500), true, false), Size::new(250, 500));
        // floors the free axis
        assert_eq!(fit((3, 2), (2, 2), true, false), Size::new(2, 1));
    }

    #[test]
    fn test_keep_ratio_scale_up() {
        assert_eq!(fit((100, 50), (400, 400), true, true), Size::new(400, 200));
        assert_eq!(fit((961, 1363), (2417, 1363), true, true), Size::new(961, 1363));
    }

    #[test]
    fn test_stretch() {
        assert_eq!(fit((100, 50), (400, 300), false, true), Size::new(400, 300));
        // scale_up is one decision for both axes
        assert_eq!(fit((100, 500), (400, 300), false, false), Size::new(400, 300));
        assert_eq!(fit((100, 50), (400, 300), false, false), Size::new(100, 50));
    }

    #[test]
    fn test_minimum_one_pixel() {
        assert_eq!(fit((10_000, 1), (100, 100), true, false), Size::new(100, 1));
        assert_eq!(fit((1, 10_000), (100, 100), true, false), Size::new(1, 100));
        assert_eq!(fit((0, 0), (100, 100), true, false), Size::new(1, 1));
        assert_eq!(fit((50, 50), (0, 0), true, false), Size::new(1, 1));
    }

    #[test]
    fn test_unbounded_axis() {
        assert_eq!(fit((2000, 1000), (-1, 500), true, false), Size::new(1000, 500));
        assert_eq!(fit((2000, 1000), (500, -1), true, false), Size::new(500, 250));
        assert_eq!(
            fit_in_rectangle(
                Size::new(10, 10),
                FitTarget::new(-1, -1),
                true,
                false,
                Rotation::None
            ),
            Err(GeometryError::UnboundedTarget)
        );
    }

    #[test]
    fn test_rotation_swaps_target_and_result() {
        let size = fit_in_rectangle(
            Size::new(2000, 1000),
            FitTarget::new(500, 1000),
            true,
            false,
            Rotation::Quarter,
        )
        .unwrap();
        // fitted as 2000x1000 into 1000x500, then rotated
        assert_eq!(size, Size::new(500, 1000));

        let size = fit_in_rectangle(
            Size::new(2000, 1000),
            FitTarget::new(500, 1000),
            true,
            false,
            Rotation::Half,
        )
        .unwrap();
        assert_eq!(size, Size::new(500, 250));
    }

    #[test]
    fn test_fitting_is_idempotent() {
        let target = FitTarget::new(800, 600);
        for source in [(1920, 1080), (640, 480), (3000, 200), (7, 9000)] {
            let once = fit_in_rectangle(source.into(), target, true, false, Rotation::None).unwrap();
            let twice = fit_in_rectangle(once, target, true, false, Rotation::None).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_rotation_from_degrees() {
        assert_eq!(Rotation::from_degrees(-90), Ok(Rotation::ThreeQuarter));
        assert_eq!(Rotation::from_degrees(450), Ok(Rotation::Quarter));
        assert_eq!(
            Rotation::from_degrees(45),
            Err(GeometryError::UnsupportedRotation(45))
        );
        assert_eq!(Rotation::Quarter.then(Rotation::Half), Rotation::ThreeQuarter);
        assert_eq!(Rotation::ThreeQuarter.then(Rotation::Quarter), Rotation::None);
    }

    #[test]
    fn test_request_builder_and_stretch() {
        let request = FitRequest::new(Size::new(100, 50), Size::new(400, 400)).scale_up(true);
        assert_eq!(request.fit(), Ok(Size::new(400, 200)));
        assert_eq!(
            fit_to_rectangle(Size::new(100, 50), Size::new(30, 40), Rotation::Quarter),
            Ok(Size::new(30, 40))
        );
    }

    #[test]
    fn test_implied_rotation() {
        assert_eq!(implied_rotation(6), Rotation::Quarter);
        assert_eq!(implied_rotation(1), Rotation::None);
    }
}
