//! Headless world the scenarios run in
//!
//! A Bevy app with no rendering: blocks live in the [`BlockStore`] resource,
//! actors are entities carrying [`Actor`] and a [`BlockPos`]. Whatever moves
//! actors (the real engine, or [`ScriptedMoves`] in tests) runs as a system in
//! `Update`; the harness advances the world one tick per `app.update()`.

use bevy::log::LogPlugin;
use bevy::prelude::*;
use std::collections::HashMap;

use crate::blocks::{BlockDescriptor, BlockPos, Placement};

use super::moves::{ScriptedMoves, apply_scripted_moves};
use super::structure::{StructureRegion, StructureTemplate};

/// Every non-air block in the world
#[derive(Resource, Debug, Default)]
pub struct BlockStore {
    blocks: HashMap<BlockPos, BlockDescriptor>,
}

impl BlockStore {
    /// Last write wins; writing air clears the cell
    pub fn set(&mut self, pos: BlockPos, block: BlockDescriptor) {
        if block.is_air() {
            self.blocks.remove(&pos);
        } else {
            self.blocks.insert(pos, block);
        }
    }

    pub fn get(&self, pos: BlockPos) -> BlockDescriptor {
        self.blocks.get(&pos).copied().unwrap_or(BlockDescriptor::Air)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Spawned actor
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// Entity type, e.g. `minecraft:villager_v2`
    pub kind: String,
    /// Spawn event requested with `type<event>`
    pub spawn_event: Option<String>,
    /// Qualified name of the scenario that spawned the actor
    pub scenario: String,
}

impl Actor {
    /// Split `kind<event>` spawn notation
    pub fn parse_spawn_type(spawn_type: &str) -> (String, Option<String>) {
        match spawn_type.split_once('<') {
            Some((kind, rest)) => {
                let event = rest.strip_suffix('>').unwrap_or(rest);
                (kind.to_string(), Some(event.to_string()))
            }
            None => (spawn_type.to_string(), None),
        }
    }
}

/// World tick counter, advanced once per [`HeadlessWorld::tick`]
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WorldClock(pub u64);

/// Placed scenario region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveRegion {
    pub region: StructureRegion,
    /// World tick at which the scenario entered its running phase
    pub running_since: Option<u64>,
}

/// Regions of scenarios that have not finished yet, by qualified name
#[derive(Resource, Debug, Default)]
pub struct ActiveRegions(pub HashMap<String, ActiveRegion>);

/// Read-only world access handed to predicates
pub trait WorldQuery {
    /// Block at `pos`, air when nothing was placed
    fn block_at(&self, pos: BlockPos) -> BlockDescriptor;

    /// Whether an actor of `kind` occupies `pos`
    fn entity_present(&self, kind: &str, pos: BlockPos) -> bool;
}

fn block_in(world: &World, pos: BlockPos) -> BlockDescriptor {
    world
        .get_resource::<BlockStore>()
        .map(|store| store.get(pos))
        .unwrap_or(BlockDescriptor::Air)
}

fn actor_in(world: &World, kind: &str, pos: BlockPos) -> bool {
    // components are unregistered until the first spawn
    let Some(mut query) = world.try_query::<(&Actor, &BlockPos)>() else {
        return false;
    };
    query
        .iter(world)
        .any(|(actor, at)| actor.kind == kind && *at == pos)
}

/// Builder for the headless world
pub struct HeadlessWorldBuilder {
    log_filter: Option<String>,
    moves: Option<ScriptedMoves>,
}

impl HeadlessWorldBuilder {
    pub fn new() -> Self {
        Self {
            log_filter: None,
            moves: None,
        }
    }

    /// Install Bevy's `LogPlugin` with the given filter.
    ///
    /// Sets the global tracing subscriber, so only one world per process
    /// should enable it.
    pub fn with_logging(mut self, filter: &str) -> Self {
        self.log_filter = Some(filter.to_string());
        self
    }

    /// Drive actors with scripted teleports
    pub fn with_scripted_moves(mut self, moves: ScriptedMoves) -> Self {
        self.moves = Some(moves);
        self
    }

    pub fn build(self) -> HeadlessWorld {
        let mut app = App::new();

        if let Some(filter) = self.log_filter {
            app.add_plugins(LogPlugin {
                filter,
                ..default()
            });
        }

        app.init_resource::<BlockStore>();
        app.init_resource::<WorldClock>();
        app.init_resource::<ActiveRegions>();

        if let Some(moves) = self.moves {
            app.insert_resource(moves);
            app.add_systems(Update, apply_scripted_moves);
        }

        app.finish();
        app.cleanup();

        HeadlessWorld { app }
    }
}

impl Default for HeadlessWorldBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Single-threaded, tick-driven world
pub struct HeadlessWorld {
    app: App,
}

impl HeadlessWorld {
    /// Plain world: no logging, nothing moves actors
    pub fn new() -> Self {
        HeadlessWorldBuilder::new().build()
    }

    /// Advance one tick and return the new clock value
    pub fn tick(&mut self) -> u64 {
        let clock = {
            let mut clock = self.app.world_mut().resource_mut::<WorldClock>();
            clock.0 += 1;
            clock.0
        };
        self.app.update();
        clock
    }

    pub fn clock(&self) -> u64 {
        self.app.world().resource::<WorldClock>().0
    }

    pub fn world(&self) -> &World {
        self.app.world()
    }

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }

    /// Place a template's blocks into `region`
    pub fn load_structure(&mut self, template: &StructureTemplate, region: StructureRegion) {
        let mut store = self.app.world_mut().resource_mut::<BlockStore>();
        for placement in &template.blocks {
            store.set(region.to_world(placement.pos), placement.block);
        }
    }

    /// Mark a scenario's region active (or update its running tick)
    pub fn activate_region(&mut self, scenario: &str, active: ActiveRegion) {
        self.app
            .world_mut()
            .resource_mut::<ActiveRegions>()
            .0
            .insert(scenario.to_string(), active);
    }

    pub fn deactivate_region(&mut self, scenario: &str) {
        self.app
            .world_mut()
            .resource_mut::<ActiveRegions>()
            .0
            .remove(scenario);
    }

    /// Mutable access to one scenario's region, in its local frame
    pub fn region<'w>(&'w mut self, scenario: &'w str, region: StructureRegion) -> RegionHandle<'w> {
        RegionHandle {
            world: self.app.world_mut(),
            region,
            scenario,
        }
    }

    /// Read-only access to a region, in its local frame
    pub fn view(&self, region: StructureRegion) -> RegionView<'_> {
        RegionView {
            world: self.app.world(),
            region,
        }
    }

    /// Number of live actors, anywhere
    pub fn actor_count(&mut self) -> usize {
        let world = self.app.world_mut();
        let mut query = world.query::<&Actor>();
        query.iter(world).count()
    }
}

impl Default for HeadlessWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl WorldQuery for HeadlessWorld {
    fn block_at(&self, pos: BlockPos) -> BlockDescriptor {
        block_in(self.app.world(), pos)
    }

    fn entity_present(&self, kind: &str, pos: BlockPos) -> bool {
        actor_in(self.app.world(), kind, pos)
    }
}

/// Read-only region access
pub struct RegionView<'w> {
    world: &'w World,
    region: StructureRegion,
}

impl RegionView<'_> {
    pub fn region(&self) -> StructureRegion {
        self.region
    }
}

impl WorldQuery for RegionView<'_> {
    fn block_at(&self, pos: BlockPos) -> BlockDescriptor {
        block_in(self.world, self.region.to_world(pos))
    }

    fn entity_present(&self, kind: &str, pos: BlockPos) -> bool {
        actor_in(self.world, kind, self.region.to_world(pos))
    }
}

/// Mutable region access used by scenario setup and cleanup
pub struct RegionHandle<'w> {
    world: &'w mut World,
    region: StructureRegion,
    scenario: &'w str,
}

impl RegionHandle<'_> {
    pub fn region(&self) -> StructureRegion {
        self.region
    }

    pub fn set_block(&mut self, pos: BlockPos, block: BlockDescriptor) {
        let world_pos = self.region.to_world(pos);
        self.world.resource_mut::<BlockStore>().set(world_pos, block);
    }

    /// Apply placements in order
    pub fn place(&mut self, placements: &[Placement]) {
        for placement in placements {
            self.set_block(placement.pos, placement.block);
        }
    }

    /// Spawn an actor from `type` or `type<spawn_event>` notation
    pub fn spawn(&mut self, spawn_type: &str, pos: BlockPos) -> Entity {
        let (kind, spawn_event) = Actor::parse_spawn_type(spawn_type);
        let world_pos = self.region.to_world(pos);
        self.world
            .spawn((
                Actor {
                    kind,
                    spawn_event,
                    scenario: self.scenario.to_string(),
                },
                world_pos,
            ))
            .id()
    }

    /// Despawn every actor standing inside the region; returns how many
    pub fn despawn_all(&mut self) -> usize {
        let region = self.region;
        let mut query = self.world.query_filtered::<(Entity, &BlockPos), With<Actor>>();
        let doomed: Vec<Entity> = query
            .iter(&*self.world)
            .filter(|(_, pos)| region.contains(**pos))
            .map(|(entity, _)| entity)
            .collect();

        for entity in &doomed {
            self.world.despawn(*entity);
        }
        doomed.len()
    }

    pub fn view(&self) -> RegionView<'_> {
        RegionView {
            world: &*self.world,
            region: self.region,
        }
    }
}

impl WorldQuery for RegionHandle<'_> {
    fn block_at(&self, pos: BlockPos) -> BlockDescriptor {
        block_in(&*self.world, self.region.to_world(pos))
    }

    fn entity_present(&self, kind: &str, pos: BlockPos) -> bool {
        actor_in(&*self.world, kind, self.region.to_world(pos))
    }
}
