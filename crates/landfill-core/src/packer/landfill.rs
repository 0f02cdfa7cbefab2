use super::state::{PackerState, Slice};
use crate::model::{Offset3, Range3, Size};
use tracing::{debug, trace};

/// An item ready for placement: padded and oriented size plus input index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct SortedItem {
    pub(crate) size: Size,
    pub(crate) index: usize,
    pub(crate) rotated: bool,
}

/// Places `items`, sorted highest first, into the atlas.
///
/// Every call starts at layer 0 and fills each layer until the next item no
/// longer fits in height, then carries the rest over to the following layer,
/// creating layers as the depth allows. The offset of each item, still
/// including padding, is written to `offsets[item.index]`.
///
/// Returns the range spanning all non-empty items, or `None` if the atlas ran
/// out of layers. Items placed before that stay committed in `state`.
pub(crate) fn place_sorted(
    state: &mut PackerState,
    items: &[SortedItem],
    reverse_always: bool,
    offsets: &mut [Offset3],
) -> Option<Range3> {
    let mut bounds: Option<Range3> = None;
    let mut remaining = items;
    let mut layer = 0;
    while !remaining.is_empty() {
        if !state.ensure_slice(layer) {
            debug!(layer, left = remaining.len(), "atlas is full");
            return None;
        }
        let placed = fill_slice(state, layer, remaining, reverse_always, offsets, &mut bounds);
        remaining = &remaining[placed..];
        layer += 1;
    }
    Some(bounds.unwrap_or_default())
}

/// Fills a single layer, returning how many leading items of `items` got placed.
fn fill_slice(
    state: &mut PackerState,
    layer: u32,
    items: &[SortedItem],
    reverse_always: bool,
    offsets: &mut [Offset3],
    bounds: &mut Option<Range3>,
) -> usize {
    let width = state.width();
    let height = state.height_limit();
    let (slice, skyline) = state.slice_mut(layer);

    for (i, item) in items.iter().enumerate() {
        let Size { w, h } = item.size;

        // Empty items take no space and leave the layer untouched
        if item.size.is_empty() {
            let probe = Slice {
                forward: slice.forward,
                cursor: if slice.cursor + w > width { 0 } else { slice.cursor },
            };
            let start = probe.window_start(w, width);
            let y = column_max(&skyline[start..start + w as usize]);
            offsets[item.index] = Offset3::new(start as u32, y, layer);
            continue;
        }

        // Row is full, wrap. Reverse if the row ended lower than it started.
        if slice.cursor + w > width {
            debug_assert!(slice.cursor > 0);
            let first = skyline[slice.column(0, width)];
            let last = skyline[slice.column(slice.cursor - 1, width)];
            if reverse_always || last < first {
                slice.forward = !slice.forward;
                trace!(layer, forward = slice.forward, "reversing fill direction");
            }
            slice.cursor = 0;
        }

        let start = slice.window_start(w, width);
        let window = &mut skyline[start..start + w as usize];
        let y = column_max(window);
        if y + h > height {
            debug!(layer, placed = i, left = items.len() - i, "layer is full");
            return i;
        }
        window.fill((y + h) as u16);

        let offset = Offset3::new(start as u32, y, layer);
        offsets[item.index] = offset;
        let range = Range3::from_placement(offset, item.size);
        *bounds = Some(match *bounds {
            Some(b) => b.join(&range),
            None => range,
        });
        slice.cursor += w;
    }
    items.len()
}

#[inline]
fn column_max(columns: &[u16]) -> u32 {
    columns.iter().copied().max().unwrap_or(0) as u32
}
