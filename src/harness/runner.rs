//! Scenario execution
//!
//! A batch shares one world. Every scenario gets its own padded region and
//! moves through Init (template placed), Setup (after `setup_ticks`) and
//! Running, where its predicate is evaluated once per tick until it holds or
//! `max_ticks` running ticks have passed.

use bevy::prelude::*;

use crate::error::ConfigError;

use super::assertions::AssertionError;
use super::registry::{ScenarioFilter, ScenarioRegistry};
use super::scenario::{RunResult, ScenarioDefinition};
use super::structure::{RegionAllocator, StructureLibrary, StructureRegion};
use super::world::{ActiveRegion, HeadlessWorld};

/// Result of one scenario, with the metadata reports need
#[derive(Debug, Clone)]
pub struct ScenarioReport {
    pub name: String,
    pub batch: String,
    pub broken: bool,
    pub notes: Option<String>,
    pub result: RunResult,
}

impl ScenarioReport {
    fn new(scenario: &ScenarioDefinition, result: RunResult) -> Self {
        Self {
            name: scenario.qualified_name(),
            batch: scenario.config.batch.clone(),
            broken: scenario.is_broken(),
            notes: scenario.notes.clone(),
            result,
        }
    }
}

enum Phase {
    Waiting,
    Running {
        since: u64,
        last_error: Option<AssertionError>,
    },
    Done(RunResult),
}

struct Instance<'a> {
    scenario: &'a ScenarioDefinition,
    /// Qualified name; keys the region, actors and scripted moves
    key: String,
    region: StructureRegion,
    phase: Phase,
}

impl Instance<'_> {
    fn is_done(&self) -> bool {
        matches!(self.phase, Phase::Done(_))
    }

    fn setup(&mut self, world: &mut HeadlessWorld) {
        let scenario = self.scenario;
        let now = world.clock();
        let outcome = {
            let mut handle = world.region(&self.key, self.region);
            (scenario.setup)(&mut handle, &scenario.obstacle)
        };

        match outcome {
            Err(error) => {
                warn!("{} failed setup: {}", scenario.qualified_name(), error.message);
                world.deactivate_region(&self.key);
                self.phase = Phase::Done(RunResult::Failed { error });
            }
            Ok(()) if scenario.config.max_ticks == 0 => {
                world.deactivate_region(&self.key);
                self.phase = Phase::Done(RunResult::TimedOut {
                    ticks: 0,
                    last_error: None,
                });
            }
            Ok(()) => {
                world.activate_region(
                    &self.key,
                    ActiveRegion {
                        region: self.region,
                        running_since: Some(now),
                    },
                );
                self.phase = Phase::Running {
                    since: now,
                    last_error: None,
                };
            }
        }
    }

    /// Evaluate the predicate for the current tick
    fn poll(&mut self, world: &mut HeadlessWorld) {
        let Phase::Running { since, last_error } = &mut self.phase else {
            return;
        };
        let scenario = self.scenario;
        let tick = world.clock() - *since;
        let outcome = (scenario.predicate)(&world.view(self.region));

        match outcome {
            Ok(()) => {
                if scenario.cleanup_on_success {
                    let removed = world.region(&self.key, self.region).despawn_all();
                    debug!("{}: cleaned up {} actors", scenario.qualified_name(), removed);
                }
                world.deactivate_region(&self.key);
                self.phase = Phase::Done(RunResult::Passed { tick });
            }
            Err(error) if tick >= scenario.config.max_ticks => {
                world.deactivate_region(&self.key);
                self.phase = Phase::Done(RunResult::TimedOut {
                    ticks: tick,
                    last_error: Some(error),
                });
            }
            Err(error) => {
                *last_error = Some(error);
            }
        }
    }
}

/// Run scenarios side by side in one world.
///
/// Regions are taken from `allocator`, so consecutive batches in the same
/// world never overlap. Fails before touching the world when a template is
/// unknown.
pub fn run_batch(
    world: &mut HeadlessWorld,
    library: &StructureLibrary,
    allocator: &mut RegionAllocator,
    scenarios: &[&ScenarioDefinition],
) -> Result<Vec<ScenarioReport>, ConfigError> {
    let templates = scenarios
        .iter()
        .map(|s| library.get(&s.config.template))
        .collect::<Result<Vec<_>, _>>()?;

    // Init
    let mut instances: Vec<Instance> = scenarios
        .iter()
        .zip(templates)
        .map(|(&scenario, template)| {
            let region = allocator.allocate(template.size, scenario.config.padding);
            let key = scenario.qualified_name();
            world.load_structure(template, region);
            world.activate_region(
                &key,
                ActiveRegion {
                    region,
                    running_since: None,
                },
            );
            Instance {
                scenario,
                key,
                region,
                phase: Phase::Waiting,
            }
        })
        .collect();

    let start = world.clock();
    for instance in instances.iter_mut() {
        if instance.scenario.config.setup_ticks == 0 {
            instance.setup(world);
        }
    }

    while !instances.iter().all(Instance::is_done) {
        let now = world.tick();
        for instance in instances.iter_mut() {
            match instance.phase {
                Phase::Waiting if now - start >= instance.scenario.config.setup_ticks => {
                    instance.setup(world);
                }
                Phase::Running { .. } => instance.poll(world),
                _ => {}
            }
        }
    }

    let reports: Vec<ScenarioReport> = instances
        .into_iter()
        .map(|instance| {
            let Phase::Done(result) = instance.phase else {
                unreachable!("loop exits only when every instance is done");
            };
            debug!("{}: {:?}", instance.scenario.qualified_name(), result);
            ScenarioReport::new(instance.scenario, result)
        })
        .collect();

    Ok(reports)
}

/// Run every selected scenario, one batch at a time, in the same world
pub fn run_selected(
    world: &mut HeadlessWorld,
    library: &StructureLibrary,
    registry: &ScenarioRegistry,
    filter: &ScenarioFilter,
) -> Result<Vec<ScenarioReport>, ConfigError> {
    let mut allocator = RegionAllocator::new();
    let mut reports = Vec::new();

    for (batch, scenarios) in registry.batches(filter) {
        info!("Running batch '{}' ({} scenarios)", batch, scenarios.len());
        let batch_reports = run_batch(world, library, &mut allocator, &scenarios)?;
        let passed = batch_reports.iter().filter(|r| r.result.passed()).count();
        info!(
            "Batch '{}' finished at tick {}: {}/{} passed",
            batch,
            world.clock(),
            passed,
            batch_reports.len()
        );
        reports.extend(batch_reports);
    }

    Ok(reports)
}

/// Run a single scenario in a fresh world with the default templates
pub fn run_scenario(scenario: &ScenarioDefinition) -> Result<ScenarioReport, ConfigError> {
    let mut world = HeadlessWorld::new();
    let mut reports = run_batch(
        &mut world,
        &StructureLibrary::default(),
        &mut RegionAllocator::new(),
        &[scenario],
    )?;
    Ok(reports.remove(0))
}
