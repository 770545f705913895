use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GeometryError;

use super::Axis;

/// Pixel dimensions of a page or a viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const fn get(self, axis: Axis) -> u32 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    pub fn set(&mut self, axis: Axis, value: u32) {
        match axis {
            Axis::Horizontal => self.width = value,
            Axis::Vertical => self.height = value,
        }
    }

    #[must_use]
    pub const fn transposed(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    pub const fn is_landscape(self) -> bool {
        self.width > self.height
    }

    /// Signed components for the box arithmetic, saturating at `i32::MAX`
    pub fn to_array(self) -> [i32; 2] {
        [
            i32::try_from(self.width).unwrap_or(i32::MAX),
            i32::try_from(self.height).unwrap_or(i32::MAX),
        ]
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Size {
    type Err = GeometryError;

    /// Parses `WIDTHxHEIGHT`, e.g. `2417x1363`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| GeometryError::generic(format!("expected WIDTHxHEIGHT, got '{s}'")))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<u32>()
                .map_err(|e| GeometryError::generic(format!("invalid dimension '{v}' in '{s}': {e}")))
        };
        Ok(Self::new(parse(w)?, parse(h)?))
    }
}

impl From<(u32, u32)> for Size {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        assert_eq!("2417x1363".parse::<Size>(), Ok(Size::new(2417, 1363)));
        assert_eq!(" 10X20 ".parse::<Size>(), Ok(Size::new(10, 20)));
        assert!("2417".parse::<Size>().is_err());
        assert!("ax1".parse::<Size>().is_err());
        assert!("-5x1".parse::<Size>().is_err());
    }

    #[test]
    fn test_axis_access() {
        let mut size = Size::new(3, 4);
        assert_eq!(size.get(Axis::Vertical), 4);
        size.set(Axis::Horizontal, 7);
        assert_eq!(size, Size::new(7, 4));
        assert_eq!(size.transposed(), Size::new(4, 7));
        assert_eq!(Size::new(u32::MAX, 1).to_array(), [i32::MAX, 1]);
    }
}
