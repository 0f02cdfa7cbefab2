use crate::config::{LandfillFlags, Orientation, TieBreak};
use crate::error::{LandfillError, Result};
use crate::model::{AtlasSize, Size};
use crate::packer::SortedItem;
use std::cmp::Ordering;

/// Pads and orients every input size and checks it fits into the atlas.
///
/// Padding is applied before rotation, so the horizontal padding always
/// belongs to the input width. `height_limit` is the layer height, or the
/// skyline capacity for an unbounded atlas.
pub(crate) fn prepare_items(
    sizes: &[Size],
    padding: Size,
    flags: LandfillFlags,
    atlas: AtlasSize,
    height_limit: u32,
) -> Result<Vec<SortedItem>> {
    let orientation = flags.orientation();
    sizes
        .iter()
        .enumerate()
        .map(|(index, &size)| {
            let padded = Size::new(
                size.w.saturating_add(padding.w.saturating_mul(2)),
                size.h.saturating_add(padding.h.saturating_mul(2)),
            );
            let rotated = match orientation {
                Orientation::Keep => false,
                Orientation::Portrait => padded.w > padded.h,
                Orientation::Landscape => padded.w < padded.h,
            };
            let placed = if rotated { padded.flipped() } else { padded };
            if placed.w > atlas.width || placed.h > height_limit {
                return Err(LandfillError::ItemTooLarge {
                    index,
                    size,
                    padded: placed,
                    atlas,
                });
            }
            Ok(SortedItem {
                size: placed,
                index,
                rotated,
            })
        })
        .collect()
}

/// Sorts highest first, then by width according to `tie_break`.
///
/// The sort is stable, so equal items keep their input order and the result is
/// deterministic.
pub(crate) fn sort_items(items: &mut [SortedItem], tie_break: TieBreak) {
    items.sort_by(|a, b| {
        b.size.h.cmp(&a.size.h).then_with(|| match tie_break {
            TieBreak::WidestFirst => b.size.w.cmp(&a.size.w),
            TieBreak::NarrowestFirst => a.size.w.cmp(&b.size.w),
            TieBreak::Original => Ordering::Equal,
        })
    });
}
