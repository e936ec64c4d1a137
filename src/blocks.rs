//! Block coordinates and descriptors shared by the compiler and the harness

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer block coordinate.
///
/// Used both as a plain value (compiler output, template offsets) and as the
/// position component of spawned actors.
#[derive(
    Component, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(from = "[i32; 3]", into = "[i32; 3]")]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    pub const fn above(self) -> Self {
        self.offset(0, 1, 0)
    }
}

impl From<[i32; 3]> for BlockPos {
    fn from([x, y, z]: [i32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<BlockPos> for [i32; 3] {
    fn from(pos: BlockPos) -> Self {
        [pos.x, pos.y, pos.z]
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Block material identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Material {
    /// Obstacle material: full blocks and slabs
    StoneBrick,
    /// Template floor
    Stone,
    /// Bed
    RedWool,
}

impl Material {
    pub fn id(self) -> &'static str {
        match self {
            Material::StoneBrick => "minecraft:stonebrick",
            Material::Stone => "minecraft:stone",
            Material::RedWool => "minecraft:red_wool",
        }
    }
}

/// Immutable block value placed into the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "material", rename_all = "snake_case")]
pub enum BlockDescriptor {
    Air,
    Solid(Material),
    /// Slab occupying the lower half of the cell
    BottomSlab(Material),
    /// Slab occupying the upper half of the cell
    TopSlab(Material),
    /// Destination block; only placed by scenario setup, never compiled
    Bed(Material),
}

impl BlockDescriptor {
    /// Obstacle blocks emitted by the terrain compiler
    pub const SOLID: Self = Self::Solid(Material::StoneBrick);
    pub const BOTTOM_SLAB: Self = Self::BottomSlab(Material::StoneBrick);
    pub const TOP_SLAB: Self = Self::TopSlab(Material::StoneBrick);
    pub const BED: Self = Self::Bed(Material::RedWool);

    pub fn is_air(self) -> bool {
        matches!(self, BlockDescriptor::Air)
    }

    pub fn material(self) -> Option<Material> {
        match self {
            BlockDescriptor::Air => None,
            BlockDescriptor::Solid(m)
            | BlockDescriptor::BottomSlab(m)
            | BlockDescriptor::TopSlab(m)
            | BlockDescriptor::Bed(m) => Some(m),
        }
    }

    /// Map glyph used by obstacle maps and side-view renders
    pub fn glyph(self) -> char {
        match self {
            BlockDescriptor::Air => ' ',
            BlockDescriptor::Solid(_) => '#',
            BlockDescriptor::BottomSlab(_) => '_',
            BlockDescriptor::TopSlab(_) => '^',
            BlockDescriptor::Bed(_) => 'B',
        }
    }
}

impl fmt::Display for BlockDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shape = match self {
            BlockDescriptor::Air => "air",
            BlockDescriptor::Solid(_) => "block",
            BlockDescriptor::BottomSlab(_) => "bottom slab",
            BlockDescriptor::TopSlab(_) => "top slab",
            BlockDescriptor::Bed(_) => "bed",
        };
        match self.material() {
            Some(material) => write!(f, "{} {}", material.id(), shape),
            None => f.write_str(shape),
        }
    }
}

/// One compiled block placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    pub pos: BlockPos,
    pub block: BlockDescriptor,
}

impl Placement {
    pub const fn new(pos: BlockPos, block: BlockDescriptor) -> Self {
        Self { pos, block }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets() {
        let bed = BlockPos::new(1, 2, 4);
        assert_eq!(bed.above().above(), BlockPos::new(1, 4, 4));
        assert_eq!(bed.offset(-1, 0, -1), BlockPos::new(0, 2, 3));
        assert_eq!(bed.to_string(), "(1, 2, 4)");
    }

    #[test]
    fn test_descriptor_glyphs() {
        assert_eq!(BlockDescriptor::Air.glyph(), ' ');
        assert_eq!(BlockDescriptor::TOP_SLAB.glyph(), '^');
        assert_eq!(BlockDescriptor::BED.glyph(), 'B');
        assert_eq!(BlockDescriptor::TOP_SLAB.to_string(), "minecraft:stonebrick top slab");
        assert_eq!(BlockDescriptor::BED.to_string(), "minecraft:red_wool bed");
        assert_eq!(BlockDescriptor::Air.to_string(), "air");
    }

    #[test]
    fn test_pos_serde_as_array() {
        let pos: BlockPos = serde_json::from_str("[1, 2, 3]").unwrap();
        assert_eq!(pos, BlockPos::new(1, 2, 3));
        assert_eq!(serde_json::to_string(&pos).unwrap(), "[1,2,3]");
    }
}
