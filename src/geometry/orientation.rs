use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, Result};

/// One of the two axes of a page spread
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Width, index 0
    #[default]
    Horizontal,
    /// Height, index 1
    Vertical,
}

impl Axis {
    pub const fn index(self) -> usize {
        match self {
            Axis::Horizontal => 0,
            Axis::Vertical => 1,
        }
    }

    pub fn from_index(index: usize) -> Result<Self> {
        match index {
            0 => Ok(Axis::Horizontal),
            1 => Ok(Axis::Vertical),
            other => Err(GeometryError::InvalidAxis(other)),
        }
    }

    pub const fn other(self) -> Self {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }
}

/// Reading direction per axis.
///
/// Each component is `1` when reading moves towards larger coordinates on
/// that axis and `-1` when it moves towards smaller ones. Manga pages are
/// read right to left, so their horizontal component is `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Orientation([i32; 2]);

impl Orientation {
    pub const WESTERN: Orientation = Orientation([1, 1]);
    pub const MANGA: Orientation = Orientation([-1, 1]);

    pub fn new(signs: [i32; 2]) -> Result<Self> {
        for sign in signs {
            if sign != 1 && sign != -1 {
                return Err(GeometryError::InvalidOrientation(sign));
            }
        }
        Ok(Self(signs))
    }

    pub const fn signs(self) -> [i32; 2] {
        self.0
    }

    pub const fn get(self, axis: Axis) -> i32 {
        self.0[axis.index()]
    }

    pub const fn is_reversed(self, axis: Axis) -> bool {
        self.0[axis.index()] == -1
    }

    /// Both axes flipped
    pub const fn opposite(self) -> Self {
        Self([-self.0[0], -self.0[1]])
    }

    /// Components swapped, used when the spread is rotated by a quarter turn
    pub const fn swapped(self) -> Self {
        Self([self.0[1], self.0[0]])
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Self::WESTERN
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.0[0], self.0[1])
    }
}

impl Serialize for Orientation {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

/// Named reading direction as stored in the settings file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReadingDirection {
    /// Left to right
    #[default]
    Western,
    /// Right to left
    Manga,
}

impl ReadingDirection {
    pub fn orientation(self) -> Orientation {
        match self {
            ReadingDirection::Western => Orientation::WESTERN,
            ReadingDirection::Manga => Orientation::MANGA,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingDirection::Western => "western",
            ReadingDirection::Manga => "manga",
        }
    }
}
