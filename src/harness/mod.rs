//! Test lifecycle harness
//!
//! Registers scenarios, places them into a headless world and polls their
//! success predicates tick by tick.

pub mod assertions;
pub mod moves;
pub mod parser;
pub mod registry;
pub mod runner;
pub mod scenario;
pub mod structure;
pub mod world;

pub use assertions::{AssertionError, assert_entity_not_present, assert_entity_present};
pub use moves::{MoveDef, ScriptedMoves};
pub use parser::{
    ScenarioFile, ScenarioFileEntry, load_scenario_dir, parse_scenario_file, parse_scenarios,
};
pub use registry::{RegistrationHandle, ScenarioFilter, ScenarioRegistry};
pub use runner::{ScenarioReport, run_batch, run_scenario, run_selected};
pub use scenario::{RunResult, ScenarioConfig, ScenarioDefinition, SetupFn, SuccessPredicate, Tag};
pub use structure::{RegionAllocator, StructureLibrary, StructureRegion, StructureTemplate};
pub use world::{
    Actor, ActiveRegion, ActiveRegions, BlockStore, HeadlessWorld, HeadlessWorldBuilder,
    RegionHandle, RegionView, WorldClock, WorldQuery,
};
