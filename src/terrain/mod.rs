//! Terrain compiler: symbolic obstacle descriptions to block placements
//!
//! Both modes are pure. The output is an ordered placement list in the
//! template frame; applying it in order gives the intended obstacle.

pub mod grid;
pub mod named;
pub mod render;

pub use grid::{GridAnchor, ObstacleRowMap, compile_grid, compile_grid_at};
pub use named::{
    CeilingHeight, FloorHeight, MidObstruction, NamedObstacleSpec, compile_named,
    compile_named_at,
};
pub use render::render_side_view;

use std::fmt;

use crate::blocks::Placement;

/// Compiler input of a scenario
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObstacleSpec {
    Grid(ObstacleRowMap),
    Named(NamedObstacleSpec),
}

impl ObstacleSpec {
    pub fn compile(&self) -> Vec<Placement> {
        match self {
            ObstacleSpec::Grid(map) => compile_grid(map),
            ObstacleSpec::Named(spec) => compile_named(spec),
        }
    }
}

impl fmt::Display for ObstacleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObstacleSpec::Grid(map) => write!(f, "map {:?}", map.rows()),
            ObstacleSpec::Named(spec) => write!(f, "{}", spec),
        }
    }
}

impl From<ObstacleRowMap> for ObstacleSpec {
    fn from(map: ObstacleRowMap) -> Self {
        ObstacleSpec::Grid(map)
    }
}

impl From<NamedObstacleSpec> for ObstacleSpec {
    fn from(spec: NamedObstacleSpec) -> Self {
        ObstacleSpec::Named(spec)
    }
}
