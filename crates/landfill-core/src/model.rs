use serde::{Deserialize, Serialize};
use std::fmt;

/// Item size in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub w: u32,
    pub h: u32,
}

impl Size {
    pub const fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }
    /// Size with width and height swapped.
    pub const fn flipped(self) -> Self {
        Self {
            w: self.h,
            h: self.w,
        }
    }
    pub fn area(&self) -> u64 {
        (self.w as u64) * (self.h as u64)
    }
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }
}

impl From<(u32, u32)> for Size {
    fn from((w, h): (u32, u32)) -> Self {
        Self { w, h }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.w, self.h)
    }
}

/// Offset inside a non-array atlas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Offset2 {
    pub x: u32,
    pub y: u32,
}

impl Offset2 {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Offset inside an array atlas; `z` is the layer (slice) index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Offset3 {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl Offset3 {
    pub const fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }
    pub const fn xy(self) -> Offset2 {
        Offset2 {
            x: self.x,
            y: self.y,
        }
    }
}

/// Half-open 2D range `[min, max)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range2 {
    pub min: Offset2,
    pub max: Offset2,
}

impl Range2 {
    pub const fn new(min: Offset2, max: Offset2) -> Self {
        Self { min, max }
    }
    pub fn size(&self) -> Size {
        Size::new(self.max.x - self.min.x, self.max.y - self.min.y)
    }
}

/// Half-open 3D range `[min, max)`, with `z` spanning layers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range3 {
    pub min: Offset3,
    pub max: Offset3,
}

impl Range3 {
    pub const fn new(min: Offset3, max: Offset3) -> Self {
        Self { min, max }
    }
    /// Range covering a `size` rectangle at `offset`, one layer deep.
    pub fn from_placement(offset: Offset3, size: Size) -> Self {
        Self {
            min: offset,
            max: Offset3::new(offset.x + size.w, offset.y + size.h, offset.z + 1),
        }
    }
    /// True if the range has no volume.
    pub fn is_empty(&self) -> bool {
        self.min.x >= self.max.x || self.min.y >= self.max.y || self.min.z >= self.max.z
    }
    /// Smallest range containing both `self` and `other`.
    pub fn join(&self, other: &Range3) -> Range3 {
        Range3 {
            min: Offset3::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            max: Offset3::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        }
    }
    pub fn xy(&self) -> Range2 {
        Range2::new(self.min.xy(), self.max.xy())
    }
}

/// Atlas bounds. `None` marks an unbounded height or depth.
///
/// Width is always bounded. A depth other than `Some(1)` makes an array atlas,
/// which requires a bounded height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AtlasSize {
    pub width: u32,
    pub height: Option<u32>,
    pub depth: Option<u32>,
}

impl AtlasSize {
    pub const fn new(width: u32, height: Option<u32>, depth: Option<u32>) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }
    /// A non-array atlas (depth 1).
    pub const fn flat(width: u32, height: Option<u32>) -> Self {
        Self::new(width, height, Some(1))
    }
    /// An array atlas with bounded layer size.
    pub const fn array(width: u32, height: u32, depth: Option<u32>) -> Self {
        Self::new(width, Some(height), depth)
    }
    pub fn is_array(&self) -> bool {
        self.depth != Some(1)
    }

    /// Checks the constructor preconditions.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::LandfillError;

        if self.width == 0 {
            return Err(LandfillError::ZeroWidth);
        }
        match self.height {
            Some(0) => return Err(LandfillError::ZeroHeight),
            Some(h) if h > u16::MAX as u32 => return Err(LandfillError::HeightTooLarge(h)),
            _ => {}
        }
        if self.depth == Some(0) {
            return Err(LandfillError::ZeroDepth);
        }
        if self.height.is_none() && self.is_array() {
            return Err(LandfillError::UnboundedArrayHeight(*self));
        }
        Ok(())
    }
}

impl fmt::Display for AtlasSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn dim(f: &mut fmt::Formatter<'_>, v: Option<u32>) -> fmt::Result {
            match v {
                Some(v) => write!(f, "{v}"),
                None => f.write_str("unbounded"),
            }
        }
        write!(f, "{}x", self.width)?;
        dim(f, self.height)?;
        f.write_str("x")?;
        dim(f, self.depth)
    }
}

/// Concrete filled extent of an atlas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Extent {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
}

impl Extent {
    pub const fn new(width: u32, height: u32, depth: u32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }
    pub fn volume(&self) -> u64 {
        (self.width as u64) * (self.height as u64) * (self.depth as u64)
    }
}

/// Where a single item ended up.
///
/// `offset` points to the item without padding. If `rotated` is set, the item
/// occupies its size with width and height swapped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub offset: Offset3,
    pub rotated: bool,
}

/// Owned result of a successful batch, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackedBatch {
    pub placements: Vec<Placement>,
    /// Range spanning all added items including padding.
    pub bounds: Range3,
}

/// Packing efficiency of an atlas.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FillStats {
    /// Number of items accounted for.
    pub num_items: usize,
    /// Number of items placed rotated.
    pub num_rotated: usize,
    /// Sum of item areas, without padding.
    pub used_area: u64,
    /// Volume of `filled_size()`.
    pub filled_area: u64,
    /// used_area / filled_area (0.0 to 1.0). Higher is better.
    pub efficiency: f64,
    pub filled: Extent,
}

impl FillStats {
    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Items: {}, Filled: {}x{}x{}, Efficiency: {:.2}%, Used Area: {} px², Filled Area: {} px², Rotated: {}",
            self.num_items,
            self.filled.width,
            self.filled.height,
            self.filled.depth,
            self.efficiency * 100.0,
            self.used_area,
            self.filled_area,
            self.num_rotated,
        )
    }

    /// Returns wasted space in pixels.
    pub fn wasted_area(&self) -> u64 {
        self.filled_area.saturating_sub(self.used_area)
    }
}
