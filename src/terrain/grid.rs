//! Grid mode: obstacle courses drawn as a side view
//!
//! ```text
//! "######",
//! "      ",
//! "  __^^",
//! "######"
//! ```
//!
//! The last row is the floor. Each character pair is one block column; the
//! leftmost pair sits over the villager spawn and the course runs towards
//! lower X. Only the first character of a pair is read.

use crate::blocks::{BlockDescriptor, BlockPos, Placement};
use crate::constants::{GRID_FLOOR_Y, GRID_SPAWN_X, GRID_SPAWN_Z};
use crate::error::ConfigError;

/// Where a grid map is anchored in the template frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridAnchor {
    /// X of the first (leftmost) column
    pub spawn_x: i32,
    /// Front lateral row; the second row is `spawn_z - 1`
    pub spawn_z: i32,
    /// Y of the last map row
    pub floor_y: i32,
}

impl Default for GridAnchor {
    fn default() -> Self {
        Self {
            spawn_x: GRID_SPAWN_X,
            spawn_z: GRID_SPAWN_Z,
            floor_y: GRID_FLOOR_Y,
        }
    }
}

/// Validated side-view obstacle map, top row first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObstacleRowMap {
    rows: Vec<String>,
}

impl ObstacleRowMap {
    /// Build a map, rejecting unknown glyphs.
    ///
    /// Rows of different length are accepted; a short row simply places
    /// fewer columns. A map without rows places nothing.
    pub fn new<I, S>(rows: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rows: Vec<String> = rows.into_iter().map(Into::into).collect();

        for (row_idx, row) in rows.iter().enumerate() {
            for (column, ch) in row.chars().enumerate() {
                if ch != ' ' && descriptor_for(ch).is_none() {
                    return Err(ConfigError::UnknownMapChar {
                        row: row_idx,
                        column,
                        ch,
                    });
                }
            }
        }

        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }
}

/// Map glyph to block, `None` for space and unknown glyphs
pub fn descriptor_for(ch: char) -> Option<BlockDescriptor> {
    match ch {
        '#' => Some(BlockDescriptor::SOLID),
        '_' => Some(BlockDescriptor::BOTTOM_SLAB),
        '^' => Some(BlockDescriptor::TOP_SLAB),
        _ => None,
    }
}

/// Compile a map at the suite's fixed anchor
pub fn compile_grid(map: &ObstacleRowMap) -> Vec<Placement> {
    compile_grid_at(map, GridAnchor::default())
}

/// Compile a map into placements, floor row first.
///
/// Every solid cell is emitted twice, at `spawn_z` then `spawn_z - 1`, so the
/// villager has a two-wide corridor to walk.
pub fn compile_grid_at(map: &ObstacleRowMap, anchor: GridAnchor) -> Vec<Placement> {
    let mut placements = Vec::new();

    for (level, row) in map.rows.iter().rev().enumerate() {
        let y = anchor.floor_y + level as i32;

        for (column, ch) in row.chars().step_by(2).enumerate() {
            let Some(block) = descriptor_for(ch) else {
                continue;
            };
            let x = anchor.spawn_x - column as i32;
            for z in [anchor.spawn_z, anchor.spawn_z - 1] {
                placements.push(Placement::new(BlockPos::new(x, y, z), block));
            }
        }
    }

    placements
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(rows: &[&str]) -> ObstacleRowMap {
        ObstacleRowMap::new(rows.iter().copied()).unwrap()
    }

    #[test]
    fn test_first_suite_map_coordinates() {
        let placements = compile_grid(&map(&["^^##  ", "  ^^  ", "    ^^", "######"]));

        let solid = BlockDescriptor::SOLID;
        let top = BlockDescriptor::TOP_SLAB;
        let expected_cells = [
            // floor
            (5, 1, solid),
            (4, 1, solid),
            (3, 1, solid),
            // "    ^^"
            (3, 2, top),
            // "  ^^  "
            (4, 3, top),
            // "^^##  "
            (5, 4, top),
            (4, 4, solid),
        ];

        let expected: Vec<Placement> = expected_cells
            .iter()
            .flat_map(|&(x, y, block)| {
                [
                    Placement::new(BlockPos::new(x, y, 4), block),
                    Placement::new(BlockPos::new(x, y, 3), block),
                ]
            })
            .collect();

        assert_eq!(placements, expected);
    }

    #[test]
    fn test_each_glyph_places_two_cells() {
        let rows = ["  ####", "      ", "      ", "____##", "######"];
        let placements = compile_grid(&map(&rows));

        let glyphs = rows
            .iter()
            .flat_map(|r| r.chars().step_by(2))
            .filter(|c| *c != ' ')
            .count();
        assert_eq!(placements.len(), glyphs * 2);

        for pair in placements.chunks(2) {
            assert_eq!(pair[0].block, pair[1].block);
            assert_eq!(pair[0].pos.offset(0, 0, -1), pair[1].pos);
        }
    }

    #[test]
    fn test_slab_row_levels() {
        let placements = compile_grid(&map(&["  ####", "      ", "      ", "____##", "######"]));

        let at = |x, y| {
            placements
                .iter()
                .find(|p| p.pos == BlockPos::new(x, y, 4))
                .map(|p| p.block)
        };
        assert_eq!(at(5, 2), Some(BlockDescriptor::BOTTOM_SLAB));
        assert_eq!(at(3, 2), Some(BlockDescriptor::SOLID));
        assert_eq!(at(5, 5), None);
        assert_eq!(at(4, 5), Some(BlockDescriptor::SOLID));
        assert_eq!(at(4, 3), None);
    }

    #[test]
    fn test_short_rows_skip_missing_cells() {
        let placements = compile_grid(&map(&["##", "######"]));
        let top: Vec<_> = placements.iter().filter(|p| p.pos.y == 2).collect();
        assert_eq!(top.len(), 2);
        assert!(top.iter().all(|p| p.pos.x == 5));

        // odd trailing glyph still starts a pair
        let odd = compile_grid(&map(&["###"]));
        assert_eq!(odd.len(), 4);
        assert_eq!(odd[2].pos.x, 4);
    }

    #[test]
    fn test_second_glyph_of_pair_is_ignored() {
        let a = compile_grid(&map(&["#_"]));
        let b = compile_grid(&map(&["##"]));
        assert_eq!(a, b);
    }

    #[test]
    fn test_custom_anchor() {
        let anchor = GridAnchor {
            spawn_x: 0,
            spawn_z: 0,
            floor_y: 10,
        };
        let placements = compile_grid_at(&map(&["  ^^"]), anchor);
        assert_eq!(
            placements,
            vec![
                Placement::new(BlockPos::new(-1, 10, 0), BlockDescriptor::TOP_SLAB),
                Placement::new(BlockPos::new(-1, 10, -1), BlockDescriptor::TOP_SLAB),
            ]
        );
    }

    #[test]
    fn test_compile_is_deterministic() {
        let m = map(&["  ^^^^", "      ", "  ^^  ", "######"]);
        assert_eq!(compile_grid(&m), compile_grid(&m));
    }

    #[test]
    fn test_rejects_unknown_glyphs() {
        match ObstacleRowMap::new(["##", "#x"]) {
            Err(ConfigError::UnknownMapChar { row, column, ch }) => {
                assert_eq!((row, column, ch), (1, 1, 'x'));
            }
            other => panic!("expected UnknownMapChar, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_map_places_nothing() {
        let empty = ObstacleRowMap::new(Vec::<String>::new()).unwrap();
        assert!(compile_grid(&empty).is_empty());
        assert!(compile_grid(&map(&["", "      "])).is_empty());
    }
}
