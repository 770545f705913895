/// Errors raised when a caller breaks a precondition of the geometry core
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    #[error("target rectangle is unbounded on both axes")]
    UnboundedTarget,

    #[error("unsupported rotation: {0} degrees")]
    UnsupportedRotation(i32),

    #[error("invalid axis index {0}, expected 0 or 1")]
    InvalidAxis(usize),

    #[error("invalid orientation component {0}, expected -1 or 1")]
    InvalidOrientation(i32),

    #[error("different dimensions: {position} != {size}")]
    DimensionMismatch { position: usize, size: usize },

    #[error("page {page} out of range ({count} pages)")]
    PageOutOfRange { page: usize, count: usize },

    #[error("layout extent {extent} on axis {axis} exceeds {max} pixels")]
    ExtentTooLarge { axis: usize, extent: i64, max: i64 },

    #[error("page gap {0} is negative, pages would overlap")]
    NegativeGap(i32),

    #[error("{detail}")]
    Generic { detail: String },
}

impl GeometryError {
    pub fn generic(msg: impl Into<String>) -> Self {
        Self::Generic {
            detail: msg.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GeometryError>;
