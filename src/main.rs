//! Villager pathfinding scenario CLI
//!
//! Usage:
//!   cargo run                                   # Run the default suite
//!   cargo run -- list --include-broken          # List every scenario
//!   cargo run -- show Vertical2                 # Draw one obstacle
//!   cargo run -- run --filter Vertical5 -v      # Run a subset, debug logs

use bevy::prelude::*;
use std::path::Path;

use villager_paths::constants::{BED_POS, GRID_SPAWN_Z};
use villager_paths::harness::{
    RunResult, ScenarioFilter, ScenarioRegistry, ScenarioReport, ScriptedMoves, StructureLibrary,
    load_scenario_dir, run_selected,
};
use villager_paths::settings::{Command, HarnessSettings, print_help};
use villager_paths::terrain::{GridAnchor, render_side_view};
use villager_paths::{
    BlockDescriptor, ConfigError, HeadlessWorldBuilder, Placement, register_vertical_suite,
};

fn main() {
    let settings = HarnessSettings::from_args();

    let registry = match build_registry(&settings) {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };
    let filter = settings.to_filter();

    match &settings.command {
        Command::Help => print_help(),
        Command::List => list(&registry, &filter),
        Command::Show { name } => {
            if !show(&registry, name) {
                eprintln!("No scenario named '{}'", name);
                std::process::exit(1);
            }
        }
        Command::Run => match run(&settings, &registry, &filter) {
            Ok(true) => {}
            Ok(false) => std::process::exit(1),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(2);
            }
        },
    }
}

/// Built-in suite, then any scenario files
fn build_registry(settings: &HarnessSettings) -> Result<ScenarioRegistry, ConfigError> {
    let mut registry = ScenarioRegistry::new();
    register_vertical_suite(&mut registry)?;
    for scenario in load_scenario_dir(Path::new(&settings.scenarios_dir))? {
        registry.register(scenario)?;
    }
    Ok(registry)
}

fn list(registry: &ScenarioRegistry, filter: &ScenarioFilter) {
    for (batch, scenarios) in registry.batches(filter) {
        println!("{}/", batch);
        for scenario in scenarios {
            let tag = if scenario.is_broken() { " [broken]" } else { "" };
            println!("  {}{}", scenario.qualified_name(), tag);
            println!("    {}", scenario.obstacle);
            if let Some(notes) = &scenario.notes {
                println!("    note: {}", notes);
            }
        }
        println!();
    }
}

/// Returns false when the scenario doesn't exist
fn show(registry: &ScenarioRegistry, name: &str) -> bool {
    let Some(scenario) = registry.find(name) else {
        return false;
    };
    let library = StructureLibrary::default();

    println!("{}", scenario.qualified_name());
    println!("  obstacle:  {}", scenario.obstacle);
    println!(
        "  template:  {}  batch: {}  max ticks: {}  setup ticks: {}  padding: {}",
        scenario.config.template,
        scenario.config.batch,
        scenario.config.max_ticks,
        scenario.config.setup_ticks,
        scenario.config.padding
    );
    let tags: Vec<String> = scenario.config.tags.iter().map(|t| t.to_string()).collect();
    println!("  tags:      {}", tags.join(", "));
    if let Some(notes) = &scenario.notes {
        println!("  notes:     {}", notes);
    }

    // Template floor, then the obstacle, then the bed
    let mut placements = match library.get(&scenario.config.template) {
        Ok(template) => template.blocks.clone(),
        Err(_) => Vec::new(),
    };
    placements.extend(scenario.obstacle.compile());
    placements.push(Placement::new(BED_POS, BlockDescriptor::BED));

    println!();
    println!("  spawn -> bed");
    for row in render_side_view(&placements, GRID_SPAWN_Z, GridAnchor::default()) {
        println!("  |{}|", row);
    }

    let mut legend: Vec<BlockDescriptor> = Vec::new();
    for placement in &placements {
        if !legend.contains(&placement.block) {
            legend.push(placement.block);
        }
    }
    println!();
    for block in legend {
        let glyph = block.glyph();
        println!("  {}{}  {}", glyph, glyph, block);
    }
    true
}

/// Returns false when a default-suite scenario didn't pass
fn run(
    settings: &HarnessSettings,
    registry: &ScenarioRegistry,
    filter: &ScenarioFilter,
) -> Result<bool, ConfigError> {
    let mut moves = match &settings.moves {
        Some(path) => ScriptedMoves::load(Path::new(path))?,
        None => ScriptedMoves::default(),
    };
    if let Some(tick) = settings.arrive_at {
        for scenario in registry.select(filter) {
            moves.insert(&scenario.qualified_name(), tick, BED_POS);
        }
    }

    let mut builder = HeadlessWorldBuilder::new().with_logging(&settings.log_filter());
    if !moves.is_empty() {
        builder = builder.with_scripted_moves(moves);
    }
    let mut world = builder.build();

    let selected = registry.select(filter).count();
    info!("Registered {} scenarios, {} selected", registry.len(), selected);

    println!("Villager Pathfinding Scenarios");
    println!("==============================\n");

    if selected == 0 {
        println!("No scenarios selected.");
        return Ok(true);
    }

    let reports = run_selected(&mut world, &StructureLibrary::default(), registry, filter)?;

    let mut current_batch = String::new();
    for report in &reports {
        if report.batch != current_batch {
            if !current_batch.is_empty() {
                println!();
            }
            println!("{}/", report.batch);
            current_batch = report.batch.clone();
        }
        print_result(report, settings.verbose);
    }

    let passed = reports.iter().filter(|r| r.result.passed()).count();
    let failed = reports
        .iter()
        .filter(|r| matches!(r.result, RunResult::Failed { .. }))
        .count();
    let timed_out = reports.len() - passed - failed;
    let regressions = reports
        .iter()
        .filter(|r| !r.broken && !r.result.passed())
        .count();

    println!("\n==============================");
    println!(
        "Results: {} passed, {} failed, {} timed out ({} not known broken)",
        passed, failed, timed_out, regressions
    );

    Ok(regressions == 0)
}

fn print_result(report: &ScenarioReport, verbose: bool) {
    let name = if report.broken {
        format!("{} [broken]", report.name)
    } else {
        report.name.clone()
    };
    let dots = ".".repeat(48 - name.len().min(47));

    match &report.result {
        RunResult::Passed { tick } => {
            println!("  {} {} PASS ({} ticks)", name, dots, tick);
        }
        RunResult::Failed { error } => {
            println!("  {} {} FAIL", name, dots);
            if verbose {
                println!("    {}", error);
            } else {
                println!("    {}", error.message);
            }
        }
        RunResult::TimedOut { ticks, last_error } => {
            println!("  {} {} TIMEOUT ({} ticks)", name, dots, ticks);
            if let Some(error) = last_error {
                if verbose {
                    println!("    {}", error);
                } else {
                    println!("    {}", error.message);
                }
            }
        }
    }

    if verbose {
        if let Some(notes) = &report.notes {
            println!("    note: {}", notes);
        }
    }
}
