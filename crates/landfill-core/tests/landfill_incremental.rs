use landfill_core::prelude::*;

fn add_one(atlas: &mut AtlasLandfill, w: u32, h: u32) -> Option<Offset3> {
    let mut offsets = [Offset3::default(); 1];
    atlas
        .add_unrotated(&[Size::new(w, h)], &mut offsets)
        .map(|_| offsets[0])
}

#[test]
fn later_calls_backfill_earlier_layers() {
    let mut atlas = AtlasLandfill::new(AtlasSize::array(4, 4, None));
    atlas.set_flags(LandfillFlags::empty());

    assert_eq!(add_one(&mut atlas, 4, 2), Some(Offset3::new(0, 0, 0)));
    // Doesn't fit on top of the first row, goes to a new layer
    assert_eq!(add_one(&mut atlas, 4, 4), Some(Offset3::new(0, 0, 1)));
    // Every call starts at the first layer again
    assert_eq!(add_one(&mut atlas, 2, 2), Some(Offset3::new(0, 2, 0)));
    assert_eq!(add_one(&mut atlas, 2, 2), Some(Offset3::new(2, 2, 0)));
    assert_eq!(atlas.filled_size(), Extent::new(4, 4, 2));

    assert_eq!(add_one(&mut atlas, 1, 1), Some(Offset3::new(0, 0, 2)));
    assert_eq!(atlas.filled_size(), Extent::new(4, 4, 3));
}

#[test]
fn cursor_and_direction_persist_across_calls() {
    let mut atlas = AtlasLandfill::new(AtlasSize::flat(10, None));
    atlas.set_flags(LandfillFlags::empty());

    assert_eq!(add_one(&mut atlas, 6, 4), Some(Offset3::new(0, 0, 0)));
    assert_eq!(add_one(&mut atlas, 4, 3), Some(Offset3::new(6, 0, 0)));
    // Row ended lower, continues right to left
    assert_eq!(add_one(&mut atlas, 5, 2), Some(Offset3::new(5, 4, 0)));
    assert_eq!(add_one(&mut atlas, 5, 1), Some(Offset3::new(0, 4, 0)));
    // Ended lower again, back to left to right
    assert_eq!(add_one(&mut atlas, 3, 1), Some(Offset3::new(0, 5, 0)));
    assert_eq!(atlas.filled_size(), Extent::new(10, 6, 1));
}

#[test]
fn failed_call_keeps_placed_items() {
    let mut atlas = AtlasLandfill::new(AtlasSize::flat(8, Some(8)));
    atlas.set_flags(LandfillFlags::empty());

    let sizes = [Size::new(8, 5), Size::new(8, 5)];
    let mut offsets = [Offset3::default(); 2];
    assert_eq!(atlas.add_unrotated(&sizes, &mut offsets), None);
    assert_eq!(offsets[0], Offset3::new(0, 0, 0));
    assert_eq!(atlas.filled_size().height, 5);

    // The remaining space is still usable
    assert_eq!(add_one(&mut atlas, 8, 3), Some(Offset3::new(0, 5, 0)));
    assert_eq!(atlas.filled_size().height, 8);
}

#[test]
fn flags_and_padding_can_change_between_calls() {
    let mut atlas = AtlasLandfill::new(AtlasSize::flat(20, None));

    let first = atlas.pack(&[Size::new(6, 2)]).unwrap();
    assert!(first.placements[0].rotated);
    assert_eq!(first.bounds.max, Offset3::new(2, 6, 1));

    atlas
        .set_flags(LandfillFlags::ROTATE_LANDSCAPE)
        .set_padding(Size::new(1, 1));
    let second = atlas.pack(&[Size::new(2, 6)]).unwrap();
    assert!(second.placements[0].rotated);
    // Padded 4x8, rotated to 8x4 and placed next to the first item
    assert_eq!(second.placements[0].offset, Offset3::new(3, 1, 0));
    assert_eq!(
        second.bounds,
        Range3::new(Offset3::new(2, 0, 0), Offset3::new(10, 4, 1))
    );
}

#[test]
fn empty_batches_change_nothing() {
    let mut atlas = AtlasLandfill::new(AtlasSize::array(8, 8, Some(2)));
    assert_eq!(atlas.pack(&[]), Some(PackedBatch::default()));
    assert_eq!(atlas.filled_size(), Extent::new(8, 8, 0));
    assert!(atlas.skyline(0).is_none());

    add_one_rotating(&mut atlas);
    assert_eq!(atlas.pack(&[]), Some(PackedBatch::default()));
    assert_eq!(atlas.filled_size(), Extent::new(8, 8, 1));
}

fn add_one_rotating(atlas: &mut AtlasLandfill) {
    let mut offsets = [Offset3::default(); 1];
    let mut rotations = [false; 1];
    atlas
        .add(&[Size::new(3, 3)], &mut offsets, &mut rotations)
        .unwrap();
}
