use crate::model::{AtlasSize, Extent};
use tracing::debug;

/// Stand-in height for an unbounded atlas, the largest value the skyline holds.
pub(crate) const UNBOUNDED_HEIGHT: u32 = u16::MAX as u32;

/// Fill direction and insertion cursor of one layer.
///
/// `cursor` is measured from the edge the current direction starts at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Slice {
    pub(crate) forward: bool,
    pub(crate) cursor: u32,
}

impl Default for Slice {
    fn default() -> Self {
        Self {
            forward: true,
            cursor: 0,
        }
    }
}

impl Slice {
    /// Physical column of logical column `x` in a row of `width` columns.
    #[inline]
    pub(crate) fn column(&self, x: u32, width: u32) -> usize {
        if self.forward {
            x as usize
        } else {
            (width - 1 - x) as usize
        }
    }

    /// Physical start of the `w` columns following the cursor.
    #[inline]
    pub(crate) fn window_start(&self, w: u32, width: u32) -> usize {
        if self.forward {
            self.cursor as usize
        } else {
            (width - self.cursor - w) as usize
        }
    }
}

/// Persistent packer state: bounds, per-layer cursors and the skyline.
///
/// The skyline stores the filled height of every column of every created
/// layer, flattened as `layer * width + x`. Layers are appended lazily and
/// never removed.
#[derive(Clone, Debug)]
pub(crate) struct PackerState {
    size: AtlasSize,
    slices: Vec<Slice>,
    skyline: Vec<u16>,
}

impl PackerState {
    /// Expects `size` to be already validated.
    pub(crate) fn new(size: AtlasSize) -> Self {
        debug_assert!(size.validate().is_ok());
        Self {
            size,
            slices: Vec::new(),
            skyline: Vec::new(),
        }
    }

    pub(crate) fn size(&self) -> AtlasSize {
        self.size
    }

    pub(crate) fn width(&self) -> u32 {
        self.size.width
    }

    /// Layer height, with the sentinel standing in for an unbounded one.
    pub(crate) fn height_limit(&self) -> u32 {
        self.size.height.unwrap_or(UNBOUNDED_HEIGHT)
    }

    pub(crate) fn depth_limit(&self) -> u32 {
        self.size.depth.unwrap_or(u32::MAX)
    }

    pub(crate) fn slice_count(&self) -> u32 {
        self.slices.len() as u32
    }

    /// Makes sure layer `index` exists, creating it if it's the next one in
    /// order and the depth allows. Returns false when the depth is exhausted.
    pub(crate) fn ensure_slice(&mut self, index: u32) -> bool {
        debug_assert!(index <= self.slice_count());
        if index < self.slice_count() {
            return true;
        }
        if index >= self.depth_limit() {
            return false;
        }
        debug!(layer = index, "creating atlas layer");
        self.slices.push(Slice::default());
        self.skyline
            .resize(self.skyline.len() + self.size.width as usize, 0);
        true
    }

    /// Cursor state and skyline columns of an existing layer.
    pub(crate) fn slice_mut(&mut self, index: u32) -> (&mut Slice, &mut [u16]) {
        let width = self.size.width as usize;
        let start = index as usize * width;
        (
            &mut self.slices[index as usize],
            &mut self.skyline[start..start + width],
        )
    }

    /// Skyline columns of an existing layer.
    pub(crate) fn skyline(&self, index: u32) -> &[u16] {
        let width = self.size.width as usize;
        let start = index as usize * width;
        &self.skyline[start..start + width]
    }

    /// Currently used extent.
    ///
    /// For a non-array atlas that's the highest skyline column, computed in
    /// O(width). For an array atlas the layer size is taken from the bounds
    /// and the depth is the number of layers created so far.
    pub(crate) fn filled_size(&self) -> Extent {
        if self.size.is_array() {
            return Extent::new(self.size.width, self.height_limit(), self.slice_count());
        }
        let height = self.skyline.iter().copied().max().unwrap_or(0);
        Extent::new(self.size.width, height as u32, 1)
    }
}
