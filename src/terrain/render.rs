//! Side-view rendering of compiled placements (inverse of grid mode)

use std::collections::HashMap;

use crate::blocks::{BlockDescriptor, Placement};

use super::grid::GridAnchor;

/// Render one lateral row of placements in obstacle-map notation.
///
/// Rows run from the highest placement down to `anchor.floor_y`, columns from
/// `anchor.spawn_x` towards lower X. Placements are applied in order, so
/// overlapping cells show the last one. Returns no rows when nothing sits on
/// row `z` at or above the floor.
pub fn render_side_view(placements: &[Placement], z: i32, anchor: GridAnchor) -> Vec<String> {
    let mut cells: HashMap<(i32, i32), BlockDescriptor> = HashMap::new();
    for p in placements {
        if p.pos.z == z && p.pos.y >= anchor.floor_y && p.pos.x <= anchor.spawn_x {
            cells.insert((p.pos.x, p.pos.y), p.block);
        }
    }

    let Some(top) = cells.keys().map(|&(_, y)| y).max() else {
        return Vec::new();
    };
    let min_x = cells.keys().map(|&(x, _)| x).min().unwrap_or(anchor.spawn_x);

    (anchor.floor_y..=top)
        .rev()
        .map(|y| {
            (min_x..=anchor.spawn_x)
                .rev()
                .map(|x| {
                    let glyph = cells.get(&(x, y)).map_or(' ', |b| b.glyph());
                    format!("{glyph}{glyph}")
                })
                .collect()
        })
        .collect()
}
