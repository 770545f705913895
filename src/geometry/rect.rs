//! Axis-aligned integer boxes
//!
//! A [`Rect`] is an immutable value: every operation that moves or resizes
//! a box returns a new one. The dimension count is a const parameter and
//! defaults to 2, which is all a page spread needs.

use std::cmp::Ordering;
use std::fmt;

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::error::{GeometryError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect<const N: usize = 2> {
    position: [i32; N],
    size: [i32; N],
}

impl<const N: usize> Default for Rect<N> {
    fn default() -> Self {
        Self {
            position: [0; N],
            size: [0; N],
        }
    }
}

impl<const N: usize> Rect<N> {
    #[must_use]
    pub const fn new(position: [i32; N], size: [i32; N]) -> Self {
        Self { position, size }
    }

    /// A box of the given size at the origin
    #[must_use]
    pub const fn from_size(size: [i32; N]) -> Self {
        Self {
            position: [0; N],
            size,
        }
    }

    /// Builds a box from runtime-sized coordinates, checking that both
    /// slices have exactly `N` components.
    pub fn try_from_slices(position: &[i32], size: &[i32]) -> Result<Self> {
        if position.len() != size.len() {
            return Err(GeometryError::DimensionMismatch {
                position: position.len(),
                size: size.len(),
            });
        }
        let mismatch = || GeometryError::DimensionMismatch {
            position: position.len(),
            size: N,
        };
        let position: [i32; N] = position.try_into().map_err(|_| mismatch())?;
        let size: [i32; N] = size.try_into().map_err(|_| mismatch())?;
        Ok(Self { position, size })
    }

    pub const fn dimensions(&self) -> usize {
        N
    }

    pub const fn position(&self) -> [i32; N] {
        self.position
    }

    pub const fn size(&self) -> [i32; N] {
        self.size
    }

    #[must_use]
    pub const fn with_position(&self, position: [i32; N]) -> Self {
        Self {
            position,
            size: self.size,
        }
    }

    #[must_use]
    pub const fn with_size(&self, size: [i32; N]) -> Self {
        Self {
            position: self.position,
            size,
        }
    }

    /// Same size, position moved by `-delta`
    #[must_use]
    pub fn translate_opposite(&self, delta: [i32; N]) -> Self {
        let mut position = self.position;
        for (p, d) in position.iter_mut().zip(delta) {
            *p -= d;
        }
        Self {
            position,
            size: self.size,
        }
    }

    /// Squared Euclidean distance between `point` and the closest cell of
    /// this box, or 0 if the point lies inside. The far edge is exclusive.
    pub fn distance_point_squared(&self, point: [i32; N]) -> i64 {
        let mut result = 0i64;
        for idx in 0..N {
            let p = i64::from(point[idx]);
            let start = i64::from(self.position[idx]);
            let end = start + i64::from(self.size[idx]);
            let r = if p < start {
                start - p
            } else if p >= end {
                p - end + 1
            } else {
                continue;
            };
            result += r * r;
        }
        result
    }

    /// Indices of the boxes closest to `point`.
    ///
    /// Boxes at the same distance are ordered by their distance to the
    /// reading origin implied by `orientation`; only the nearest ones are
    /// kept. Without an orientation every tied box is returned.
    pub fn closest_boxes(point: [i32; N], boxes: &[Rect<N>], orientation: Option<[i32; N]>) -> Vec<usize> {
        let mut result: Vec<usize> = Vec::new();
        let mut min_dist = 0i64;

        for (idx, candidate) in boxes.iter().enumerate() {
            let dist = candidate.distance_point_squared(point);
            if result.is_empty() || dist < min_dist {
                min_dist = dist;
                result = vec![idx];
                continue;
            }
            if dist != min_dist {
                continue;
            }
            let Some(orientation) = orientation else {
                result.push(idx);
                continue;
            };

            let mut replace = false;
            let mut append = false;
            for &kept in &result {
                match Self::compare_distance_to_origin(candidate, &boxes[kept], orientation) {
                    Ordering::Less => {
                        replace = true;
                        break;
                    }
                    Ordering::Equal => append = true,
                    Ordering::Greater => {}
                }
            }
            if replace {
                result = vec![idx];
            } else if append {
                result.push(idx);
            }
        }
        result
    }

    /// Compares how far two boxes are from the reading origin.
    ///
    /// Axes with a zero orientation component are ignored; the first axis
    /// that differs decides.
    pub fn compare_distance_to_origin(a: &Rect<N>, b: &Rect<N>, orientation: [i32; N]) -> Ordering {
        for (idx, &o) in orientation.iter().enumerate() {
            if o == 0 {
                continue;
            }
            let (mut a_edge, mut b_edge) = (a.position[idx], b.position[idx]);
            if o < 0 {
                a_edge = a.size[idx] - a_edge;
                b_edge = b.size[idx] - b_edge;
            }
            match a_edge.cmp(&b_edge) {
                Ordering::Equal => continue,
                other => return other,
            }
        }
        Ordering::Equal
    }

    /// The center cell of this box. When the exact center falls between
    /// two cells, the one nearer the reading origin wins.
    pub fn center(&self, orientation: [i32; N]) -> [i32; N] {
        let mut result = [0; N];
        for idx in 0..N {
            result[idx] = center_offset_1d(self.size[idx] - 1, orientation[idx]) + self.position[idx];
        }
        result
    }

    /// Index of the box in `boxes` closest to this box's center
    pub fn current_box_index(&self, orientation: [i32; N], boxes: &[Rect<N>]) -> Option<usize> {
        Self::closest_boxes(self.center(orientation), boxes, Some(orientation))
            .first()
            .copied()
    }

    /// Moves every box on `axis` so its center lines up with the box at
    /// index `fix`. An odd reference size is rounded up to even first.
    pub fn align_center(boxes: &[Rect<N>], axis: usize, fix: usize, orientation: i32) -> Vec<Rect<N>> {
        let Some(center_box) = boxes.get(fix) else {
            return Vec::new();
        };
        let mut cs = center_box.size[axis];
        if cs % 2 != 0 {
            cs += 1;
        }
        let cp = center_box.position[axis];

        boxes
            .iter()
            .map(|b| {
                let mut position = b.position;
                position[axis] = cp + center_offset_1d(cs - b.size[axis], orientation);
                b.with_position(position)
            })
            .collect()
    }

    /// Lays the boxes end to end along `axis` so they do not overlap,
    /// keeping the box at index `fix` where it is. `spacing` pixels go
    /// between neighbours.
    pub fn distribute(boxes: &[Rect<N>], axis: usize, fix: usize, spacing: i32) -> Vec<Rect<N>> {
        let Some(anchor) = boxes.get(fix) else {
            return Vec::new();
        };
        let mut result = boxes.to_vec();
        let initial = anchor.position[axis];

        let mut partial = initial;
        for b in result.iter_mut().skip(fix) {
            b.position[axis] = partial;
            partial += b.size[axis] + spacing;
        }

        let mut partial = initial;
        for b in result[..fix].iter_mut().rev() {
            partial -= b.size[axis] + spacing;
            b.position[axis] = partial;
        }
        result
    }

    /// The area covered by a scrollable viewport of `viewport_size` that
    /// shows this box. Axes smaller than the viewport are grown to it and
    /// the box ends up centered inside.
    pub fn wrapper_box(&self, viewport_size: [i32; N], orientation: [i32; N]) -> Self {
        let mut size = [0; N];
        let mut position = [0; N];
        for idx in 0..N {
            let c = self.size[idx];
            size[idx] = c.max(viewport_size[idx]);
            position[idx] = center_offset_1d(c - size[idx], orientation[idx]) + self.position[idx];
        }
        Self { position, size }
    }

    /// Smallest box containing all of `boxes`; the zero box for no input
    pub fn bounding_box(boxes: &[Rect<N>]) -> Self {
        if boxes.is_empty() {
            return Self::default();
        }
        let mut mins = [i32::MAX; N];
        let mut maxes = [i32::MIN; N];
        for b in boxes {
            for idx in 0..N {
                mins[idx] = mins[idx].min(b.position[idx]);
                maxes[idx] = maxes[idx].max(b.position[idx] + b.size[idx]);
            }
        }
        let mut size = [0; N];
        for idx in 0..N {
            size[idx] = maxes[idx] - mins[idx];
        }
        Self {
            position: mins,
            size,
        }
    }
}

/// Offset that centers a box inside a larger one, where `delta` is the
/// inner size minus the outer size.
///
/// Odd leftovers are resolved with an arithmetic shift: with orientation
/// `1` the extra pixel goes to the leading edge, with `-1` to the trailing
/// one. Layout results are pixel-exact on this rule.
pub const fn center_offset_1d(delta: i32, orientation: i32) -> i32 {
    let delta = if orientation == -1 { delta + 1 } else { delta };
    delta >> 1
}

impl<const N: usize> fmt::Display for Rect<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{:?}:{:?}}}", self.position, self.size)
    }
}

impl<const N: usize> Serialize for Rect<N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Rect", 2)?;
        state.serialize_field("position", &self.position[..])?;
        state.serialize_field("size", &self.size[..])?;
        state.end()
    }
}
