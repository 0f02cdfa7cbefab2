use crate::model::{AtlasSize, Extent, PackedBatch, Size};
use serde_json::{Value, json};

/// Serialize a packed batch as a JSON object `{ atlas, filled, bounds, items }`.
///
/// `items` are in input order; `w`/`h` are the input sizes, i.e. before any
/// rotation, and `x`/`y`/`layer` point to the item without padding.
pub fn to_json(atlas: AtlasSize, filled: Extent, sizes: &[Size], batch: &PackedBatch) -> Value {
    let items = sizes
        .iter()
        .zip(&batch.placements)
        .enumerate()
        .map(|(index, (size, p))| {
            json!({
                "index": index,
                "w": size.w,
                "h": size.h,
                "x": p.offset.x,
                "y": p.offset.y,
                "layer": p.offset.z,
                "rotated": p.rotated,
            })
        })
        .collect::<Vec<_>>();
    let b = &batch.bounds;
    json!({
        "atlas": {"width": atlas.width, "height": atlas.height, "depth": atlas.depth},
        "filled": {"width": filled.width, "height": filled.height, "depth": filled.depth},
        "bounds": {
            "x": b.min.x, "y": b.min.y, "layer": b.min.z,
            "w": b.max.x - b.min.x, "h": b.max.y - b.min.y, "layers": b.max.z - b.min.z,
        },
        "items": items,
    })
}

/// Flatten placements keyed by name.
/// Shape: `{ frames: { name: { frame: {x,y,w,h}, layer, rotated } }, meta }`, where
/// `frame` uses the placed (post-rotation) size.
pub fn to_json_hash<K: ToString>(
    atlas: AtlasSize,
    keys: &[K],
    sizes: &[Size],
    batch: &PackedBatch,
) -> Value {
    let mut frames = serde_json::Map::new();
    for ((key, size), p) in keys.iter().zip(sizes).zip(&batch.placements) {
        let placed = if p.rotated { size.flipped() } else { *size };
        frames.insert(
            key.to_string(),
            json!({
                "frame": {"x": p.offset.x, "y": p.offset.y, "w": placed.w, "h": placed.h},
                "layer": p.offset.z,
                "rotated": p.rotated,
                "sourceSize": {"w": size.w, "h": size.h},
            }),
        );
    }
    json!({
        "frames": frames,
        "meta": {"width": atlas.width, "height": atlas.height, "depth": atlas.depth},
    })
}
