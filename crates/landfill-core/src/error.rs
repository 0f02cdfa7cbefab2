use crate::model::{AtlasSize, Size};
use thiserror::Error;

/// Contract violations of the packer API.
///
/// Running out of atlas space is not an error; `add()` reports it as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LandfillError {
    #[error("Atlas width must be non-zero")]
    ZeroWidth,
    #[error("Atlas height must be non-zero, use an unbounded height instead")]
    ZeroHeight,
    #[error("Atlas depth must be non-zero, use an unbounded depth instead")]
    ZeroDepth,
    #[error("Atlas height {0} doesn't fit into the 16-bit skyline (max {max})", max = u16::MAX)]
    HeightTooLarge(u32),
    #[error("Atlas {0} has more than one layer and needs a bounded height")]
    UnboundedArrayHeight(AtlasSize),
    #[error("Only one of ROTATE_PORTRAIT and ROTATE_LANDSCAPE can be set")]
    ConflictingOrientation,
    #[error("Only one of WIDEST_FIRST and NARROWEST_FIRST can be set")]
    ConflictingTieBreak,
    #[error("Expected {sizes} offsets, got {offsets}")]
    OffsetCountMismatch { sizes: usize, offsets: usize },
    #[error("Expected {sizes} rotations, got {rotations}")]
    RotationCountMismatch { sizes: usize, rotations: usize },
    #[error("A rotations output is required when ROTATE_PORTRAIT or ROTATE_LANDSCAPE is set")]
    MissingRotations,
    #[error("A 2D add is only valid for an atlas of depth 1, got {0}")]
    NotFlat(AtlasSize),
    #[error("Item {index} of size {size} is {padded} with padding, expected it to fit into {atlas}")]
    ItemTooLarge {
        index: usize,
        size: Size,
        padded: Size,
        atlas: AtlasSize,
    },
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, LandfillError>;
