use serde::Serialize;
use std::fmt;

/// Intrinsic pixel size of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Dimensions {
    /// Width in pixels (always > 0).
    pub width: u32,
    /// Height in pixels (always > 0).
    pub height: u32,
}

impl Dimensions {
    /// Creates dimensions, rejecting a zero-sized axis.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self { width, height })
    }

    /// Renders the pair as attribute text appended to a tag: ` width="W" height="H"`.
    pub fn to_attributes(self) -> String {
        format!(" width=\"{}\" height=\"{}\"", self.width, self.height)
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
