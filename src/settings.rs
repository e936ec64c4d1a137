//! Harness settings
//!
//! Loaded from `config/harness_settings.json` when present, else the checked-in
//! template, else defaults. Command line flags override the file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::constants::{HARNESS_SETTINGS_FILE, HARNESS_SETTINGS_TEMPLATE, SCENARIOS_DIR};
use crate::error::ConfigError;
use crate::harness::ScenarioFilter;

/// What the CLI should do
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Command {
    /// Run the selected scenarios
    #[default]
    Run,
    /// Print the selected scenarios
    List,
    /// Print one scenario and its compiled obstacle
    Show { name: String },
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessSettings {
    /// Also run `suite:broken` scenarios
    pub include_broken: bool,
    /// Substring of the qualified scenario name
    pub filter: Option<String>,
    /// Only this batch
    pub batch: Option<String>,
    /// Scripted moves file (TOML)
    pub moves: Option<String>,
    /// Directory of extra scenario files, registered after the built-in suite
    pub scenarios_dir: String,
    /// Teleport every villager into its bed at this running tick
    pub arrive_at: Option<u64>,
    /// Debug-level logging
    pub verbose: bool,
    /// Log filter passed to the log plugin; overrides `verbose`
    pub log_filter: Option<String>,
    #[serde(skip)]
    pub command: Command,
}

impl Default for HarnessSettings {
    fn default() -> Self {
        Self {
            include_broken: false,
            filter: None,
            batch: None,
            moves: None,
            scenarios_dir: SCENARIOS_DIR.to_string(),
            arrive_at: None,
            verbose: false,
            log_filter: None,
            command: Command::Run,
        }
    }
}

impl HarnessSettings {
    /// Load settings from a JSON file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    /// Local settings, then template settings, then built-in defaults
    pub fn from_config_files() -> Self {
        for path in [HARNESS_SETTINGS_FILE, HARNESS_SETTINGS_TEMPLATE] {
            if Path::new(path).exists() {
                match Self::from_file(path) {
                    Ok(settings) => return settings,
                    Err(e) => eprintln!("Warning: {}", e),
                }
            }
        }
        Self::default()
    }

    /// Parse settings from the process arguments
    pub fn from_args() -> Self {
        let args: Vec<String> = std::env::args().skip(1).collect();
        Self::from_arg_list(Self::from_config_files(), &args)
    }

    /// Apply `args` (without the program name) on top of `base`.
    /// `--settings` replaces the base before the other flags apply.
    pub fn from_arg_list(base: Self, args: &[String]) -> Self {
        let mut settings = base;

        if let Some(i) = args.iter().position(|a| a == "--settings") {
            if let Some(path) = args.get(i + 1) {
                match Self::from_file(path) {
                    Ok(loaded) => settings = loaded,
                    Err(e) => eprintln!("Warning: {}", e),
                }
            }
        }

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--settings" => {
                    // Already handled above
                    i += 1;
                }
                "--include-broken" => {
                    settings.include_broken = true;
                }
                "--filter" => {
                    if let Some(value) = args.get(i + 1) {
                        settings.filter = Some(value.clone());
                        i += 1;
                    }
                }
                "--batch" => {
                    if let Some(value) = args.get(i + 1) {
                        settings.batch = Some(value.clone());
                        i += 1;
                    }
                }
                "--moves" => {
                    if let Some(value) = args.get(i + 1) {
                        settings.moves = Some(value.clone());
                        i += 1;
                    }
                }
                "--scenarios" => {
                    if let Some(value) = args.get(i + 1) {
                        settings.scenarios_dir = value.clone();
                        i += 1;
                    }
                }
                "--arrive-at" => {
                    if let Some(value) = args.get(i + 1) {
                        match value.parse() {
                            Ok(tick) => settings.arrive_at = Some(tick),
                            Err(_) => {
                                eprintln!("Warning: invalid --arrive-at value '{}'", value)
                            }
                        }
                        i += 1;
                    }
                }
                "--verbose" | "-v" => {
                    settings.verbose = true;
                }
                "--help" | "-h" | "help" => {
                    settings.command = Command::Help;
                }
                "list" => {
                    settings.command = Command::List;
                }
                "run" => {
                    settings.command = Command::Run;
                }
                "show" => {
                    if let Some(name) = args.get(i + 1) {
                        settings.command = Command::Show { name: name.clone() };
                        i += 1;
                    } else {
                        settings.command = Command::Help;
                    }
                }
                other => {
                    eprintln!("Warning: ignoring unknown argument '{}'", other);
                }
            }
            i += 1;
        }

        settings
    }

    pub fn to_filter(&self) -> ScenarioFilter {
        ScenarioFilter {
            include_broken: self.include_broken,
            name: self.filter.clone(),
            batch: self.batch.clone(),
        }
    }

    /// Filter for the log plugin
    pub fn log_filter(&self) -> String {
        match (&self.log_filter, self.verbose) {
            (Some(filter), _) => filter.clone(),
            (None, true) => "warn,villager_paths=debug".to_string(),
            (None, false) => "warn,villager_paths=info".to_string(),
        }
    }
}

pub fn print_help() {
    println!(
        r#"Villager pathfinding scenarios - headless test harness

USAGE:
    cargo run -- [COMMAND] [OPTIONS]

COMMANDS:
    run                 Run the selected scenarios (default)
    list                List the selected scenarios
    show <NAME>         Print a scenario and a side view of its obstacle

OPTIONS:
    --settings <FILE>   Load settings from JSON file (flags override file settings)
    --include-broken    Also select scenarios tagged suite:broken
    --filter <TEXT>     Only scenarios whose name contains TEXT
    --batch <NAME>      Only scenarios in batch NAME
    --moves <FILE>      Scripted villager moves (TOML)
    --scenarios <DIR>   Extra scenario files (default: scenarios)
    --arrive-at <TICK>  Move every villager into its bed at running tick TICK
    --verbose, -v       Debug logging
    --help, -h          Show this help

EXAMPLES:
    # List everything, known-broken scenarios included
    cargo run -- list --include-broken

    # Draw one obstacle
    cargo run -- show Vertical29

    # Run the stair scenarios with a moves script
    cargo run -- run --filter Vertical1 --moves config/moves.example.toml
"#
    );
}
