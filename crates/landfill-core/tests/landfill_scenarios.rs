use landfill_core::prelude::*;

fn sizes(list: &[(u32, u32)]) -> Vec<Size> {
    list.iter().map(|&s| Size::from(s)).collect()
}

#[test]
fn tallest_first_with_default_flags() {
    let mut atlas = AtlasLandfill::new(AtlasSize::flat(10, None));
    assert_eq!(
        atlas.flags(),
        LandfillFlags::ROTATE_PORTRAIT | LandfillFlags::WIDEST_FIRST
    );

    let input = sizes(&[(4, 3), (4, 2), (2, 5)]);
    let mut offsets = [Offset2::default(); 3];
    let mut rotations = [false; 3];
    let bounds = atlas
        .add_2d(&input, &mut offsets, &mut rotations)
        .expect("unbounded atlas never fails");

    // Landscape items become 3x4 and 2x4, placed after the 2x5 one
    assert_eq!(offsets, [Offset2::new(2, 0), Offset2::new(5, 0), Offset2::new(0, 0)]);
    assert_eq!(rotations, [true, true, false]);
    assert_eq!(bounds, Range2::new(Offset2::new(0, 0), Offset2::new(7, 5)));
    assert_eq!(atlas.filled_size(), Extent::new(10, 5, 1));
    assert_eq!(atlas.skyline(0).unwrap(), &[5u16, 5, 4, 4, 4, 4, 4, 0, 0, 0]);
}

#[test]
fn tallest_first_without_rotation() {
    let mut atlas = AtlasLandfill::new(AtlasSize::flat(10, None));
    atlas.clear_flags(LandfillFlags::ROTATE_PORTRAIT);

    let input = sizes(&[(4, 3), (4, 2), (2, 5)]);
    let mut offsets = [Offset2::default(); 3];
    let bounds = atlas.add_2d_unrotated(&input, &mut offsets).unwrap();

    assert_eq!(offsets, [Offset2::new(2, 0), Offset2::new(6, 0), Offset2::new(0, 0)]);
    assert_eq!(bounds.size(), Size::new(10, 5));
    assert_eq!(atlas.skyline(0).unwrap(), &[5u16, 5, 3, 3, 3, 3, 2, 2, 2, 2]);
}

#[test]
fn row_ending_lower_reverses_direction() {
    let mut atlas = AtlasLandfill::new(AtlasSize::flat(10, None));
    atlas.set_flags(LandfillFlags::WIDEST_FIRST);

    let input = sizes(&[(6, 4), (4, 3), (5, 2), (5, 1)]);
    let mut offsets = [Offset2::default(); 4];
    atlas.add_2d_unrotated(&input, &mut offsets).unwrap();

    // Second row runs right to left, resting on the 4 px high column 5
    assert_eq!(
        offsets,
        [
            Offset2::new(0, 0),
            Offset2::new(6, 0),
            Offset2::new(5, 4),
            Offset2::new(0, 4),
        ]
    );
    assert_eq!(atlas.skyline(0).unwrap(), &[5u16, 5, 5, 5, 5, 6, 6, 6, 6, 6]);
    assert_eq!(atlas.filled_size().height, 6);
}

#[test]
fn level_row_keeps_direction() {
    let mut atlas = AtlasLandfill::new(AtlasSize::flat(10, None));
    atlas.set_flags(LandfillFlags::empty());

    let input = sizes(&[(5, 2), (5, 2), (5, 2)]);
    let mut offsets = [Offset2::default(); 3];
    atlas.add_2d_unrotated(&input, &mut offsets).unwrap();
    assert_eq!(
        offsets,
        [Offset2::new(0, 0), Offset2::new(5, 0), Offset2::new(0, 2)]
    );
}

#[test]
fn reverse_direction_always() {
    let mut atlas = AtlasLandfill::new(AtlasSize::flat(10, None));
    atlas.set_flags(LandfillFlags::REVERSE_DIRECTION_ALWAYS);

    let input = sizes(&[(5, 2), (5, 2), (5, 2), (5, 2), (5, 2)]);
    let mut offsets = [Offset2::default(); 5];
    atlas.add_2d_unrotated(&input, &mut offsets).unwrap();
    assert_eq!(
        offsets,
        [
            Offset2::new(0, 0),
            Offset2::new(5, 0),
            Offset2::new(5, 2),
            Offset2::new(0, 2),
            Offset2::new(0, 4),
        ]
    );
}

#[test]
fn second_item_overflows_bounded_height() {
    let mut atlas = AtlasLandfill::new(AtlasSize::flat(10, Some(10)));

    let mut offsets = [Offset2::default(); 1];
    let mut rotations = [false; 1];
    let first = atlas.add_2d(&[Size::new(8, 8)], &mut offsets, &mut rotations);
    assert_eq!(
        first,
        Some(Range2::new(Offset2::new(0, 0), Offset2::new(8, 8)))
    );
    assert_eq!(offsets[0], Offset2::new(0, 0));

    let second = atlas.add_2d(&[Size::new(8, 8)], &mut offsets, &mut rotations);
    assert_eq!(second, None);
    assert_eq!(atlas.filled_size(), Extent::new(10, 8, 1));
}

#[test]
fn array_overflows_into_next_layer_then_fails() {
    let mut atlas = AtlasLandfill::new(AtlasSize::array(4, 4, Some(2)));
    assert_eq!(atlas.filled_size(), Extent::new(4, 4, 0));

    let mut offsets = [Offset3::default(); 1];
    let mut rotations = [false; 1];
    let item = [Size::new(4, 4)];

    assert!(atlas.add(&item, &mut offsets, &mut rotations).is_some());
    assert_eq!(offsets[0], Offset3::new(0, 0, 0));
    assert_eq!(atlas.filled_size(), Extent::new(4, 4, 1));

    let second = atlas.add(&item, &mut offsets, &mut rotations);
    assert_eq!(
        second,
        Some(Range3::new(Offset3::new(0, 0, 1), Offset3::new(4, 4, 2)))
    );
    assert_eq!(offsets[0], Offset3::new(0, 0, 1));
    assert_eq!(atlas.filled_size(), Extent::new(4, 4, 2));

    assert_eq!(atlas.add(&item, &mut offsets, &mut rotations), None);
    assert_eq!(atlas.filled_size(), Extent::new(4, 4, 2));
}

#[test]
fn array_overflow_in_a_single_batch() {
    let mut atlas = AtlasLandfill::new(AtlasSize::array(4, 4, Some(2)));
    let input = sizes(&[(4, 4), (4, 4), (4, 4)]);
    let mut offsets = [Offset3::default(); 3];
    let mut rotations = [false; 3];
    assert_eq!(atlas.add(&input, &mut offsets, &mut rotations), None);
    // The two items that fit stay committed
    assert_eq!(atlas.filled_size(), Extent::new(4, 4, 2));
}

#[test]
fn unbounded_depth_adds_layers_as_needed() {
    let mut atlas = AtlasLandfill::new(AtlasSize::array(4, 4, None));
    let input = sizes(&[(4, 4); 5]);
    let batch = atlas.pack(&input).unwrap();
    for (i, p) in batch.placements.iter().enumerate() {
        assert_eq!(p.offset, Offset3::new(0, 0, i as u32));
    }
    assert_eq!(
        batch.bounds,
        Range3::new(Offset3::new(0, 0, 0), Offset3::new(4, 4, 5))
    );
    assert_eq!(atlas.filled_size(), Extent::new(4, 4, 5));
    assert_eq!(atlas.size().depth, None);
}

#[test]
fn padding_is_added_back_to_offsets() {
    let mut atlas = AtlasLandfill::new(AtlasSize::flat(10, None));
    atlas.set_padding(Size::new(1, 1));

    let mut offsets = [Offset2::default(); 1];
    let mut rotations = [false; 1];
    let bounds = atlas
        .add_2d(&[Size::new(2, 2)], &mut offsets, &mut rotations)
        .unwrap();
    assert_eq!(offsets[0], Offset2::new(1, 1));
    assert!(!rotations[0]);
    assert_eq!(bounds, Range2::new(Offset2::new(0, 0), Offset2::new(4, 4)));
    assert_eq!(atlas.skyline(0).unwrap()[..5], [4u16, 4, 4, 4, 0]);
}

#[test]
fn rotate_portrait() {
    let mut atlas = AtlasLandfill::new(AtlasSize::flat(10, None));
    atlas.set_flags(LandfillFlags::ROTATE_PORTRAIT);

    let mut offsets = [Offset2::default(); 1];
    let mut rotations = [false; 1];
    atlas
        .add_2d(&[Size::new(6, 2)], &mut offsets, &mut rotations)
        .unwrap();
    assert_eq!(offsets[0], Offset2::new(0, 0));
    assert!(rotations[0]);
    assert_eq!(atlas.filled_size().height, 6);
}

#[test]
fn rotate_landscape() {
    let mut atlas = AtlasLandfill::new(AtlasSize::flat(10, None));
    atlas.set_flags(LandfillFlags::ROTATE_LANDSCAPE);

    let batch = atlas.pack(&sizes(&[(2, 6), (3, 3)])).unwrap();
    assert!(batch.placements[0].rotated);
    assert!(!batch.placements[1].rotated);
    // 3x3 is the tallest after rotation
    assert_eq!(batch.placements[1].offset, Offset3::new(0, 0, 0));
    assert_eq!(batch.placements[0].offset, Offset3::new(3, 0, 0));
    assert_eq!(atlas.filled_size().height, 3);
}

#[test]
fn padding_is_applied_before_rotation() {
    let mut atlas = AtlasLandfill::new(AtlasSize::flat(10, None));
    atlas.set_padding(Size::new(2, 1));

    // 6x2 padded to 10x4, rotated to 4x10; the padding swaps along with it
    let batch = atlas.pack(&[Size::new(6, 2)]).unwrap();
    assert!(batch.placements[0].rotated);
    assert_eq!(batch.placements[0].offset, Offset3::new(1, 2, 0));
    assert_eq!(
        batch.bounds,
        Range3::new(Offset3::new(0, 0, 0), Offset3::new(4, 10, 1))
    );
}

#[test]
fn same_height_tie_break() {
    let input = sizes(&[(3, 2), (5, 2), (1, 2)]);

    let mut original = AtlasLandfill::new(AtlasSize::flat(10, None));
    original.set_flags(LandfillFlags::empty());
    let mut offsets = [Offset2::default(); 3];
    original.add_2d_unrotated(&input, &mut offsets).unwrap();
    assert_eq!(offsets.map(|o| o.x), [0, 3, 8]);

    let mut widest = AtlasLandfill::new(AtlasSize::flat(10, None));
    widest.set_flags(LandfillFlags::WIDEST_FIRST);
    widest.add_2d_unrotated(&input, &mut offsets).unwrap();
    assert_eq!(offsets.map(|o| o.x), [5, 0, 8]);

    let mut narrowest = AtlasLandfill::new(AtlasSize::flat(10, None));
    narrowest.set_flags(LandfillFlags::NARROWEST_FIRST);
    narrowest.add_2d_unrotated(&input, &mut offsets).unwrap();
    assert_eq!(offsets.map(|o| o.x), [1, 4, 0]);
}

#[test]
fn empty_items_leave_no_trace() {
    let mut atlas = AtlasLandfill::new(AtlasSize::flat(10, None));
    atlas.set_flags(LandfillFlags::empty());

    let input = sizes(&[(0, 5), (3, 0), (2, 2)]);
    let mut offsets = [Offset2::default(); 3];
    let bounds = atlas.add_2d_unrotated(&input, &mut offsets).unwrap();
    assert_eq!(
        offsets,
        [Offset2::new(0, 0), Offset2::new(2, 0), Offset2::new(0, 0)]
    );
    assert_eq!(bounds, Range2::new(Offset2::new(0, 0), Offset2::new(2, 2)));
    assert_eq!(atlas.skyline(0).unwrap(), &[2u16, 2, 0, 0, 0, 0, 0, 0, 0, 0]);
}

#[test]
fn empty_items_with_padding_take_space() {
    let mut atlas = AtlasLandfill::new(AtlasSize::flat(10, None));
    atlas.set_flags(LandfillFlags::empty());
    atlas.set_padding(Size::new(1, 1));

    let mut offsets = [Offset2::default(); 2];
    atlas
        .add_2d_unrotated(&sizes(&[(0, 0), (2, 2)]), &mut offsets)
        .unwrap();
    assert_eq!(offsets, [Offset2::new(5, 1), Offset2::new(1, 1)]);
    assert_eq!(atlas.filled_size().height, 4);
}

#[test]
fn empty_batch() {
    let mut atlas = AtlasLandfill::new(AtlasSize::flat(16, Some(16)));
    let bounds = atlas.add_2d(&[], &mut [], &mut []);
    assert_eq!(bounds, Some(Range2::default()));
    assert_eq!(atlas.filled_size(), Extent::new(16, 0, 1));
    assert!(atlas.skyline(0).is_none());
}

#[test]
fn size_reports_bounds_as_given() {
    let atlas = AtlasLandfill::new(AtlasSize::flat(256, None));
    assert_eq!(atlas.size(), AtlasSize::new(256, None, Some(1)));
    assert_eq!(atlas.filled_size(), Extent::new(256, 0, 1));
    assert_eq!(atlas.padding(), Size::new(0, 0));

    let array = AtlasLandfill::new(AtlasSize::array(64, 32, None));
    assert_eq!(array.size(), AtlasSize::new(64, Some(32), None));
    assert_eq!(array.filled_size(), Extent::new(64, 32, 0));
}
