//! Incremental landfill texture atlas packer.
//!
//! - Packs rectangles into a fixed-width atlas with an optionally unbounded
//!   height, or into a 2D array atlas with an optionally unbounded depth
//! - Optionally rotates items to a common orientation and pads them
//! - Returns offsets, rotations and the range touched by each batch; never
//!   touches pixel data
//!
//! Quick example:
//! ```
//! use landfill_core::prelude::*;
//!
//! let mut atlas = AtlasLandfill::new(AtlasSize::flat(1024, None));
//! let sizes = [Size::new(64, 32), Size::new(16, 100), Size::new(30, 30)];
//! let mut offsets = [Offset3::default(); 3];
//! let mut rotations = [false; 3];
//! let bounds = atlas.add(&sizes, &mut offsets, &mut rotations).unwrap();
//! assert_eq!(bounds.min, Offset3::new(0, 0, 0));
//! assert!(rotations[0]);
//! ```

pub mod atlas;
pub mod config;
pub mod error;
pub mod export;
pub mod model;
mod packer;
mod pipeline;

pub use atlas::*;
pub use config::*;
pub use error::*;
pub use export::*;
pub use model::*;

/// Convenience prelude for common types and functions.
/// Importing `landfill_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::atlas::AtlasLandfill;
    pub use crate::config::{
        LandfillConfig, LandfillConfigBuilder, LandfillFlags, Orientation, TieBreak,
    };
    pub use crate::error::{LandfillError, Result};
    pub use crate::model::{
        AtlasSize, Extent, FillStats, Offset2, Offset3, PackedBatch, Placement, Range2, Range3,
        Size,
    };
}
