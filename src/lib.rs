//! Villager pathfinding scenarios built on a headless Bevy world
//!
//! Compiles small symbolic obstacle courses into block placements and runs
//! them as tick-driven scenarios: a villager has to get from its spawn into a
//! bed on the other side of the obstacle.

pub mod blocks;
pub mod constants;
pub mod error;
pub mod harness;
pub mod settings;
pub mod suite;
pub mod terrain;

// Re-export commonly used types for convenience
pub use blocks::{BlockDescriptor, BlockPos, Material, Placement};
pub use constants::*;
pub use error::ConfigError;
pub use harness::{
    AssertionError, HeadlessWorld, HeadlessWorldBuilder, RunResult, ScenarioDefinition,
    ScenarioFilter, ScenarioRegistry, ScenarioReport, ScriptedMoves, StructureLibrary, Tag,
};
pub use settings::{Command, HarnessSettings};
pub use suite::{register_vertical_suite, vertical_scenarios};
pub use terrain::{
    CeilingHeight, FloorHeight, GridAnchor, MidObstruction, NamedObstacleSpec, ObstacleRowMap,
    ObstacleSpec, compile_grid, compile_named, render_side_view,
};
