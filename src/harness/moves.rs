//! Scripted actor moves
//!
//! Stand-in for the engine's navigation: teleports a scenario's actors to a
//! local position at a given running tick. Scripts are TOML:
//!
//! ```toml
//! [[moves]]
//! scenario = "Vertical0"
//! tick = 40
//! to = [1, 2, 4]
//! ```

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use crate::blocks::BlockPos;
use crate::error::ConfigError;

use super::world::{ActiveRegions, Actor, WorldClock};

/// One scripted teleport
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MoveDef {
    /// `Suite:Name`, or a bare name matching every suite
    pub scenario: String,
    /// Running tick of the scenario (first running tick is 1)
    pub tick: u64,
    /// Target, in the scenario's local frame
    pub to: BlockPos,
}

#[derive(Debug, Deserialize)]
struct MovesFile {
    #[serde(default)]
    moves: Vec<MoveDef>,
}

/// Resource holding scripted moves
#[derive(Resource, Debug, Clone, Default)]
pub struct ScriptedMoves {
    /// scenario -> running tick -> target
    moves: HashMap<String, BTreeMap<u64, BlockPos>>,
}

impl ScriptedMoves {
    pub fn from_moves(moves: &[MoveDef]) -> Self {
        let mut scripted = Self::default();
        for m in moves {
            scripted.insert(&m.scenario, m.tick, m.to);
        }
        scripted
    }

    /// Parse a TOML moves script
    pub fn parse(content: &str, origin: &str) -> Result<Self, ConfigError> {
        let file: MovesFile = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: origin.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self::from_moves(&file.moves))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let moves = Self::parse(&content, &path.display().to_string())?;
        info!("Loaded scripted moves for {} scenarios from {}", moves.len(), path.display());
        Ok(moves)
    }

    /// Later inserts for the same scenario and tick replace earlier ones
    pub fn insert(&mut self, scenario: &str, tick: u64, to: BlockPos) {
        self.moves
            .entry(scenario.to_string())
            .or_default()
            .insert(tick, to);
    }

    /// Send every named scenario's actors to `to` at `tick`
    pub fn everyone_to<'a>(
        scenarios: impl IntoIterator<Item = &'a str>,
        tick: u64,
        to: BlockPos,
    ) -> Self {
        let mut scripted = Self::default();
        for scenario in scenarios {
            scripted.insert(scenario, tick, to);
        }
        scripted
    }

    /// Move due for `scenario` (qualified `Suite:Name`) at `tick`. A script
    /// keyed by the bare name applies to that name in every suite.
    pub fn target(&self, scenario: &str, tick: u64) -> Option<BlockPos> {
        self.lookup(scenario, tick).or_else(|| {
            let (_, bare) = scenario.split_once(':')?;
            self.lookup(bare, tick)
        })
    }

    fn lookup(&self, key: &str, tick: u64) -> Option<BlockPos> {
        self.moves.get(key)?.get(&tick).copied()
    }

    /// Number of scenarios with at least one move
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

/// System applying the moves due this tick
pub fn apply_scripted_moves(
    clock: Res<WorldClock>,
    regions: Res<ActiveRegions>,
    moves: Res<ScriptedMoves>,
    mut actors: Query<(&Actor, &mut BlockPos)>,
) {
    for (actor, mut pos) in &mut actors {
        let Some(active) = regions.0.get(&actor.scenario) else {
            continue;
        };
        let Some(since) = active.running_since else {
            continue;
        };
        let tick = clock.0.saturating_sub(since);
        if let Some(target) = moves.target(&actor.scenario, tick) {
            *pos = active.region.to_world(target);
        }
    }
}
