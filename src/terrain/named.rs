//! Named mode: one obstacle step described by four parameters
//!
//! The obstacle covers the spawn column and the column after it (one lower
//! in X). Side views, `##` full block, `__` bottom slab, `^^` top slab:
//!
//! ```text
//!             |         |__       |##
//!             |####     |####     |####
//! floor before: none      0.5       1
//!
//!             |         |  __     |  ##
//!             |####     |####     |####
//! floor after:  none      0.5       1
//!
//!             |         |         |  __     |  ^^     |  ##
//!             |         |  ^^     |         |         |
//!             |####     |####     |####     |####     |####
//! mid:          none      0.5 slab  1 slab    1.5 slab  1 full
//!
//!             |         |  ##     |  ##     |  ##     |  ##     |  ^^
//!             |         |  ##     |  ##     |  ^^     |         |
//!             |         |  ^^     |         |         |         |
//!             |####     |####     |####     |####     |####     |####
//! ceiling:      none      0.5       1         1.5       2         2.5
//! ```

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::blocks::{BlockDescriptor, BlockPos, Placement};
use crate::constants::NAMED_ANCHOR;
use crate::error::ConfigError;

/// Placement offset relative to the anchor: (dx, dy, block)
type Cell = (i32, i32, BlockDescriptor);

const SOLID: BlockDescriptor = BlockDescriptor::SOLID;
const BOTTOM: BlockDescriptor = BlockDescriptor::BOTTOM_SLAB;
const TOP: BlockDescriptor = BlockDescriptor::TOP_SLAB;

/// Column after the spawn column
const NEXT: i32 = -1;

/// Floor height of a column, on top of the template floor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum FloorHeight {
    None,
    Half,
    Full,
}

impl FloorHeight {
    fn cells(self, dx: i32) -> Vec<Cell> {
        match self {
            FloorHeight::None => vec![],
            FloorHeight::Half => vec![(dx, 0, BOTTOM)],
            FloorHeight::Full => vec![(dx, 0, SOLID)],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FloorHeight::None => "0",
            FloorHeight::Half => "0.5",
            FloorHeight::Full => "1",
        }
    }
}

impl FromStr for FloorHeight {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "none" | "0" => Ok(FloorHeight::None),
            "0.5" => Ok(FloorHeight::Half),
            "1" => Ok(FloorHeight::Full),
            other => Err(ConfigError::UnknownFloorHeight(other.to_string())),
        }
    }
}

/// Obstruction hanging in the next column at walking height
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum MidObstruction {
    None,
    /// Top slab in the floor cell
    HalfSlab,
    /// Bottom slab one above the floor cell
    OneSlab,
    /// Top slab one above the floor cell
    OneAndHalfSlab,
    /// Full block one above the floor cell
    FullBlock,
}

impl MidObstruction {
    fn cells(self) -> &'static [Cell] {
        match self {
            MidObstruction::None => &[],
            MidObstruction::HalfSlab => &[(NEXT, 0, TOP)],
            MidObstruction::OneSlab => &[(NEXT, 1, BOTTOM)],
            MidObstruction::OneAndHalfSlab => &[(NEXT, 1, TOP)],
            MidObstruction::FullBlock => &[(NEXT, 1, SOLID)],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MidObstruction::None => "none",
            MidObstruction::HalfSlab => "0.5 slab",
            MidObstruction::OneSlab => "1 slab",
            MidObstruction::OneAndHalfSlab => "1.5 slab",
            MidObstruction::FullBlock => "1 full",
        }
    }
}

impl FromStr for MidObstruction {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "none" | "0" => Ok(MidObstruction::None),
            "0.5 slab" => Ok(MidObstruction::HalfSlab),
            "1 slab" => Ok(MidObstruction::OneSlab),
            "1.5 slab" => Ok(MidObstruction::OneAndHalfSlab),
            "1 full" => Ok(MidObstruction::FullBlock),
            other => Err(ConfigError::UnknownMidObstruction(other.to_string())),
        }
    }
}

/// Ceiling over the next column, as the height of the gap above the
/// template floor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum CeilingHeight {
    None,
    Half,
    One,
    OneAndHalf,
    Two,
    TwoAndHalf,
}

impl CeilingHeight {
    fn cells(self) -> &'static [Cell] {
        match self {
            CeilingHeight::None => &[],
            CeilingHeight::Half => &[(NEXT, 2, SOLID), (NEXT, 1, SOLID), (NEXT, 0, TOP)],
            CeilingHeight::One => &[(NEXT, 2, SOLID), (NEXT, 1, SOLID)],
            CeilingHeight::OneAndHalf => &[(NEXT, 2, SOLID), (NEXT, 1, TOP)],
            CeilingHeight::Two => &[(NEXT, 2, SOLID)],
            CeilingHeight::TwoAndHalf => &[(NEXT, 2, TOP)],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CeilingHeight::None => "none",
            CeilingHeight::Half => "0.5",
            CeilingHeight::One => "1",
            CeilingHeight::OneAndHalf => "1.5",
            CeilingHeight::Two => "2",
            CeilingHeight::TwoAndHalf => "2.5",
        }
    }
}

impl FromStr for CeilingHeight {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "none" | "0" => Ok(CeilingHeight::None),
            "0.5" => Ok(CeilingHeight::Half),
            "1" => Ok(CeilingHeight::One),
            "1.5" => Ok(CeilingHeight::OneAndHalf),
            "2" => Ok(CeilingHeight::Two),
            "2.5" => Ok(CeilingHeight::TwoAndHalf),
            other => Err(ConfigError::UnknownCeilingHeight(other.to_string())),
        }
    }
}

macro_rules! string_conversions {
    ($($ty:ty),*) => {$(
        impl TryFrom<String> for $ty {
            type Error = ConfigError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    )*};
}

string_conversions!(FloorHeight, MidObstruction, CeilingHeight);

/// One obstacle step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub struct NamedObstacleSpec {
    /// Floor height where the villager spawns
    pub floor_before: FloorHeight,
    /// Floor height of the next column
    pub floor_after: FloorHeight,
    /// Mid-level block in the next column
    pub mid: MidObstruction,
    /// Ceiling height in the next column
    pub ceiling: CeilingHeight,
}

impl NamedObstacleSpec {
    pub const fn new(
        floor_before: FloorHeight,
        floor_after: FloorHeight,
        mid: MidObstruction,
        ceiling: CeilingHeight,
    ) -> Self {
        Self {
            floor_before,
            floor_after,
            mid,
            ceiling,
        }
    }

    /// Parse the four legacy parameter strings
    pub fn parse(
        floor_before: &str,
        floor_after: &str,
        mid: &str,
        ceiling: &str,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(
            floor_before.parse()?,
            floor_after.parse()?,
            mid.parse()?,
            ceiling.parse()?,
        ))
    }

    /// Offsets in emission order for one lateral row
    fn cells(&self) -> Vec<Cell> {
        let mut cells = self.floor_before.cells(0);
        cells.extend(self.floor_after.cells(NEXT));
        cells.extend_from_slice(self.mid.cells());
        cells.extend_from_slice(self.ceiling.cells());
        cells
    }
}

impl fmt::Display for NamedObstacleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "floor {} -> {}, mid {}, ceiling {}",
            self.floor_before, self.floor_after, self.mid, self.ceiling
        )
    }
}

/// Compile at the suite's fixed anchor
pub fn compile_named(spec: &NamedObstacleSpec) -> Vec<Placement> {
    compile_named_at(spec, NAMED_ANCHOR)
}

/// Compile into placements, front lateral row first.
///
/// Overlapping cells (e.g. a `0.5 slab` mid with a raised next floor) are all
/// emitted; the later placement wins once applied.
pub fn compile_named_at(spec: &NamedObstacleSpec, anchor: BlockPos) -> Vec<Placement> {
    let cells = spec.cells();
    let mut placements = Vec::with_capacity(cells.len() * 2);

    for dz in [0, -1] {
        for &(dx, dy, block) in &cells {
            placements.push(Placement::new(anchor.offset(dx, dy, dz), block));
        }
    }

    placements
}
