use crate::config::{LandfillConfig, LandfillFlags};
use crate::error::{LandfillError, Result};
use crate::model::{
    AtlasSize, Extent, FillStats, Offset2, Offset3, PackedBatch, Placement, Range2, Range3, Size,
};
use crate::packer::{PackerState, place_sorted};
use crate::pipeline::{prepare_items, sort_items};
use tracing::instrument;

/// Landfill texture atlas packer.
///
/// Keeps track of the filled height at every column with the aim to fill the
/// available space bottom-up as evenly as possible. Packs into a 2D or a 2D
/// array atlas with either the height or the depth optionally unbounded, and
/// can be filled incrementally by calling [`add()`](Self::add) repeatedly.
///
/// On every `add()` the sizes are padded, optionally rotated to a common
/// orientation and stably sorted highest first, with same-height items ordered
/// by width according to the flags. Sorting is O(n log n), the placement
/// itself a single O(n) pass over the sorted items. Memory is O(n) for the
/// sorted copy plus one 16-bit height for every column of every created layer.
///
/// In an array atlas each `add()` starts at the first layer, fills it as far
/// as possible and continues in the next one on overflow, adding layers for as
/// long as the depth allows.
///
/// All state is owned and mutated through `&mut self`, so concurrent use of
/// one packer has to be serialized by the caller.
#[derive(Debug)]
pub struct AtlasLandfill {
    state: PackerState,
    flags: LandfillFlags,
    padding: Size,
}

impl AtlasLandfill {
    /// Creates a packer with default flags and no padding.
    ///
    /// # Panics
    /// If `size` is invalid, see [`AtlasSize::validate()`].
    pub fn new(size: AtlasSize) -> Self {
        Self::try_new(size).unwrap_or_else(|e| panic!("AtlasLandfill::new(): {e}"))
    }

    pub fn try_new(size: AtlasSize) -> Result<Self> {
        size.validate()?;
        Ok(Self {
            state: PackerState::new(size),
            flags: LandfillFlags::default(),
            padding: Size::default(),
        })
    }

    /// Creates a packer with size, flags and padding taken from `cfg`.
    pub fn from_config(cfg: &LandfillConfig) -> Result<Self> {
        cfg.validate()?;
        let mut atlas = Self::try_new(cfg.size())?;
        atlas.try_set_flags(cfg.flags())?;
        atlas.padding = cfg.padding();
        Ok(atlas)
    }

    /// Atlas size specified at construction.
    pub fn size(&self) -> AtlasSize {
        self.state.size()
    }

    /// Currently filled size.
    ///
    /// Width is always the atlas width. For a non-array atlas the depth is 1
    /// and the height grows from 0 with every `add()`. For an array atlas the
    /// height is the layer height and the depth grows from 0.
    pub fn filled_size(&self) -> Extent {
        self.state.filled_size()
    }

    /// Filled height of every column of a layer, if it has been created yet.
    pub fn skyline(&self, layer: u32) -> Option<&[u16]> {
        (layer < self.state.slice_count()).then(|| self.state.skyline(layer))
    }

    pub fn flags(&self) -> LandfillFlags {
        self.flags
    }

    /// # Panics
    /// If mutually exclusive flags are set together.
    pub fn set_flags(&mut self, flags: LandfillFlags) -> &mut Self {
        if let Err(e) = flags.validate() {
            panic!("AtlasLandfill::set_flags(): {e}");
        }
        self.flags = flags;
        self
    }

    pub fn try_set_flags(&mut self, flags: LandfillFlags) -> Result<&mut Self> {
        flags.validate()?;
        self.flags = flags;
        Ok(self)
    }

    /// Sets the existing flags ORed with `flags`.
    pub fn add_flags(&mut self, flags: LandfillFlags) -> &mut Self {
        self.set_flags(self.flags | flags)
    }

    /// Sets the existing flags without `flags`.
    pub fn clear_flags(&mut self, flags: LandfillFlags) -> &mut Self {
        self.set_flags(self.flags - flags)
    }

    pub fn padding(&self) -> Size {
        self.padding
    }

    /// Padding around each item.
    ///
    /// Sizes are extended by twice the padding before placement, the returned
    /// offsets are without it. Padding is applied before a potential rotation,
    /// so the horizontal value always pads the input width.
    pub fn set_padding(&mut self, padding: Size) -> &mut Self {
        self.padding = padding;
        self
    }

    /// Adds items to the atlas.
    ///
    /// `offsets` receives the offset of every item without padding, in input
    /// order, and `rotations` whether the item got rotated. `rotations` may be
    /// empty if neither rotation flag is set.
    ///
    /// Returns the range spanning all added items including padding, or
    /// `None` if a bounded atlas ran out of space. In that case the items
    /// placed before the overflow stay in the atlas and the outputs are left
    /// in an unspecified state. An atlas with unbounded depth, or with an
    /// unbounded height, doesn't run out of space until the 16-bit skyline
    /// capacity is reached.
    ///
    /// # Panics
    /// If the output lengths don't match, if `rotations` is empty while a
    /// rotation flag is set, or if a padded and oriented size doesn't fit
    /// into the atlas bounds.
    pub fn add(
        &mut self,
        sizes: &[Size],
        offsets: &mut [Offset3],
        rotations: &mut [bool],
    ) -> Option<Range3> {
        self.try_add(sizes, offsets, rotations)
            .unwrap_or_else(|e| panic!("AtlasLandfill::add(): {e}"))
    }

    /// Like [`add()`](Self::add) without a rotations output. Only valid if
    /// neither rotation flag is set.
    pub fn add_unrotated(&mut self, sizes: &[Size], offsets: &mut [Offset3]) -> Option<Range3> {
        self.add(sizes, offsets, &mut [])
    }

    /// Like [`add()`](Self::add) for a non-array atlas, omitting the layer.
    ///
    /// # Panics
    /// Additionally if the atlas depth isn't 1.
    pub fn add_2d(
        &mut self,
        sizes: &[Size],
        offsets: &mut [Offset2],
        rotations: &mut [bool],
    ) -> Option<Range2> {
        self.try_add_2d(sizes, offsets, rotations)
            .unwrap_or_else(|e| panic!("AtlasLandfill::add_2d(): {e}"))
    }

    pub fn add_2d_unrotated(&mut self, sizes: &[Size], offsets: &mut [Offset2]) -> Option<Range2> {
        self.add_2d(sizes, offsets, &mut [])
    }

    /// Fallible form of [`add()`](Self::add): contract violations are
    /// returned as errors, running out of space is still `Ok(None)`.
    #[instrument(skip_all, fields(count = sizes.len()))]
    pub fn try_add(
        &mut self,
        sizes: &[Size],
        offsets: &mut [Offset3],
        rotations: &mut [bool],
    ) -> Result<Option<Range3>> {
        if offsets.len() != sizes.len() {
            return Err(LandfillError::OffsetCountMismatch {
                sizes: sizes.len(),
                offsets: offsets.len(),
            });
        }
        if rotations.len() != sizes.len() {
            if !rotations.is_empty() {
                return Err(LandfillError::RotationCountMismatch {
                    sizes: sizes.len(),
                    rotations: rotations.len(),
                });
            }
            if self.flags.rotates() {
                return Err(LandfillError::MissingRotations);
            }
        }

        let mut items = prepare_items(
            sizes,
            self.padding,
            self.flags,
            self.state.size(),
            self.state.height_limit(),
        )?;
        sort_items(&mut items, self.flags.tie_break());

        let reverse_always = self
            .flags
            .contains(LandfillFlags::REVERSE_DIRECTION_ALWAYS);
        let Some(bounds) = place_sorted(&mut self.state, &items, reverse_always, offsets) else {
            return Ok(None);
        };

        for item in &items {
            let pad = if item.rotated {
                self.padding.flipped()
            } else {
                self.padding
            };
            let offset = &mut offsets[item.index];
            offset.x += pad.w;
            offset.y += pad.h;
            if !rotations.is_empty() {
                rotations[item.index] = item.rotated;
            }
        }
        Ok(Some(bounds))
    }

    /// Fallible form of [`add_2d()`](Self::add_2d).
    pub fn try_add_2d(
        &mut self,
        sizes: &[Size],
        offsets: &mut [Offset2],
        rotations: &mut [bool],
    ) -> Result<Option<Range2>> {
        if self.state.size().is_array() {
            return Err(LandfillError::NotFlat(self.state.size()));
        }
        if offsets.len() != sizes.len() {
            return Err(LandfillError::OffsetCountMismatch {
                sizes: sizes.len(),
                offsets: offsets.len(),
            });
        }
        let mut offsets3 = vec![Offset3::default(); sizes.len()];
        let bounds = self.try_add(sizes, &mut offsets3, rotations)?;
        for (out, offset) in offsets.iter_mut().zip(&offsets3) {
            *out = offset.xy();
        }
        Ok(bounds.map(|b| b.xy()))
    }

    /// Adds items and returns the placements as an owned batch.
    ///
    /// Works with any flags; `rotated` is always false if no rotation flag is
    /// set. Panics under the same conditions as [`add()`](Self::add).
    pub fn pack(&mut self, sizes: &[Size]) -> Option<PackedBatch> {
        self.try_pack(sizes)
            .unwrap_or_else(|e| panic!("AtlasLandfill::pack(): {e}"))
    }

    pub fn try_pack(&mut self, sizes: &[Size]) -> Result<Option<PackedBatch>> {
        let mut offsets = vec![Offset3::default(); sizes.len()];
        let mut rotations = vec![false; sizes.len()];
        let Some(bounds) = self.try_add(sizes, &mut offsets, &mut rotations)? else {
            return Ok(None);
        };
        let placements = offsets
            .into_iter()
            .zip(rotations)
            .map(|(offset, rotated)| Placement { offset, rotated })
            .collect();
        Ok(Some(PackedBatch { placements, bounds }))
    }

    /// Packing efficiency of everything added so far.
    ///
    /// `sizes` are the input sizes of all added items and `rotations` the
    /// matching outputs (may be empty).
    pub fn stats(&self, sizes: &[Size], rotations: &[bool]) -> FillStats {
        let filled = self.filled_size();
        let used_area: u64 = sizes.iter().map(Size::area).sum();
        let filled_area = filled.volume();
        let efficiency = if filled_area > 0 {
            used_area as f64 / filled_area as f64
        } else {
            0.0
        };
        FillStats {
            num_items: sizes.len(),
            num_rotated: rotations.iter().filter(|&&r| r).count(),
            used_area,
            filled_area,
            efficiency,
            filled,
        }
    }
}
