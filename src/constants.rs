//! Fixed layout and registration constants for the vertical obstacle suite.
//!
//! All positions are in the local frame of the vertical template. The actor
//! walks from the spawn column (high X) towards the bed (low X).

use crate::blocks::BlockPos;

// =============================================================================
// REGISTRATION
// =============================================================================

/// Suite name every vertical scenario is registered under
pub const SUITE_NAME: &str = "PathFindingTests";

/// Structure template the vertical scenarios are built on (on-disk name)
pub const VERTICAL_TEMPLATE_NAME: &str = "PathFindingTests:veritcal_template";

/// May need raising as more villager scenarios are added: village POI search
/// is time sliced across every villager in the world.
pub const VERTICAL_MAX_TICKS: u64 = 900;

pub const VERTICAL_SETUP_TICKS: u64 = 0;

/// Keeps villagers from claiming beds in neighbouring scenarios.
pub const VERTICAL_PADDING: i32 = 50;

/// Batch label (time-of-day context: villagers head to bed at night)
pub const VERTICAL_BATCH: &str = "night";

// =============================================================================
// ACTOR
// =============================================================================

pub const VILLAGER_TYPE: &str = "minecraft:villager_v2";

/// Spawn event requested for the villager (spawn as a farmer)
pub const VILLAGER_SPAWN_EVENT: &str = "minecraft:become_farmer";

// =============================================================================
// LAYOUT
// =============================================================================

/// Floor level of the grid compiler (last map row)
pub const GRID_FLOOR_Y: i32 = 1;

/// Column the villager spawns over (left edge of a grid map)
pub const GRID_SPAWN_X: i32 = 5;

/// Front lateral row of the two-wide corridor
pub const GRID_SPAWN_Z: i32 = 4;

/// Anchor of the named obstacle compiler: the spawn column, one above the floor
pub const NAMED_ANCHOR: BlockPos = BlockPos::new(5, 2, 4);

pub const BED_POS: BlockPos = BlockPos::new(1, 2, 4);

pub const ACTOR_SPAWN_POS: BlockPos = BlockPos::new(5, 3, 4);

/// Height above the bed that must stay clear of the villager. A lying
/// villager's hitbox can poke out of the bed block.
pub const ABOVE_BED_CHECK: i32 = 2;

// =============================================================================
// TEMPLATE FOOTPRINT
// =============================================================================

/// Size of the vertical template (x, y, z)
pub const VERTICAL_TEMPLATE_SIZE: BlockPos = BlockPos::new(7, 7, 6);

/// Level of the template's own floor
pub const TEMPLATE_FLOOR_Y: i32 = 1;

// =============================================================================
// FILES
// =============================================================================

/// Local harness settings (gitignored, user's custom settings)
pub const HARNESS_SETTINGS_FILE: &str = "config/harness_settings.json";

/// Template harness settings (checked into git)
pub const HARNESS_SETTINGS_TEMPLATE: &str = "config/harness_settings.template.json";

/// Default directory for extra scenario files
pub const SCENARIOS_DIR: &str = "scenarios";
