//! TOML scenario file parsing
//!
//! Extra obstacle scenarios can be written as files instead of code. Each
//! `[[scenario]]` uses either a `map` or the named obstacle fields:
//!
//! ```toml
//! [[scenario]]
//! name = "Stairs0"
//! map = ["    ##", "  ####", "######"]
//!
//! [[scenario]]
//! name = "SlabGap0"
//! floor_before = "0.5"
//! ceiling = "2"
//! tag = "suite:broken"
//! notes = "Villager attempts to walk through 1 block gap while standing on slab"
//! ```

use bevy::prelude::*;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::SUITE_NAME;
use crate::error::ConfigError;
use crate::terrain::{
    CeilingHeight, FloorHeight, MidObstruction, NamedObstacleSpec, ObstacleRowMap, ObstacleSpec,
};

use super::scenario::{ScenarioDefinition, Tag};

/// Complete scenario file
#[derive(Debug, Deserialize)]
pub struct ScenarioFile {
    #[serde(default)]
    pub scenario: Vec<ScenarioFileEntry>,
}

/// One scenario as written in a file
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioFileEntry {
    pub name: String,
    pub suite: Option<String>,
    pub map: Option<Vec<String>>,
    pub floor_before: Option<FloorHeight>,
    pub floor_after: Option<FloorHeight>,
    pub mid: Option<MidObstruction>,
    pub ceiling: Option<CeilingHeight>,
    pub tag: Option<Tag>,
    pub notes: Option<String>,
    pub max_ticks: Option<u64>,
    pub batch: Option<String>,
}

impl ScenarioFileEntry {
    fn has_named_fields(&self) -> bool {
        self.floor_before.is_some()
            || self.floor_after.is_some()
            || self.mid.is_some()
            || self.ceiling.is_some()
    }

    /// Build a vertical scenario; omitted named fields mean none
    pub fn into_definition(self) -> Result<ScenarioDefinition, ConfigError> {
        let obstacle = match &self.map {
            Some(_) if self.has_named_fields() => {
                return Err(ConfigError::AmbiguousObstacle(self.name));
            }
            Some(rows) => ObstacleSpec::Grid(ObstacleRowMap::new(rows.iter().cloned())?),
            None => ObstacleSpec::Named(NamedObstacleSpec::new(
                self.floor_before.unwrap_or(FloorHeight::None),
                self.floor_after.unwrap_or(FloorHeight::None),
                self.mid.unwrap_or(MidObstruction::None),
                self.ceiling.unwrap_or(CeilingHeight::None),
            )),
        };

        let mut scenario = ScenarioDefinition::vertical(
            self.name,
            obstacle,
            self.tag.unwrap_or(Tag::SuiteDefault),
        );
        scenario.suite = self.suite.unwrap_or_else(|| SUITE_NAME.to_string());
        scenario.notes = self.notes;
        if let Some(max_ticks) = self.max_ticks {
            scenario.config.max_ticks = max_ticks;
        }
        if let Some(batch) = self.batch {
            scenario.config.batch = batch;
        }
        Ok(scenario)
    }
}

/// Parse scenario definitions from TOML text; `origin` names the source in errors
pub fn parse_scenarios(content: &str, origin: &str) -> Result<Vec<ScenarioDefinition>, ConfigError> {
    let file: ScenarioFile = toml::from_str(content).map_err(|e| ConfigError::Parse {
        path: origin.to_string(),
        message: e.to_string(),
    })?;

    file.scenario
        .into_iter()
        .map(ScenarioFileEntry::into_definition)
        .collect()
}

/// Parse a scenario file from path
pub fn parse_scenario_file(path: &Path) -> Result<Vec<ScenarioDefinition>, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_scenarios(&content, &path.display().to_string())
}

/// Load every `.toml` file below `dir`, in path order. A missing directory
/// yields no scenarios.
pub fn load_scenario_dir(dir: &Path) -> Result<Vec<ScenarioDefinition>, ConfigError> {
    if !dir.exists() {
        info!("No scenario directory at {}", dir.display());
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    discover_files(dir, &mut files)?;
    files.sort();

    let mut scenarios = Vec::new();
    for file in &files {
        let parsed = parse_scenario_file(file)?;
        info!("Loaded {} scenarios from {}", parsed.len(), file.display());
        scenarios.extend(parsed);
    }
    Ok(scenarios)
}

fn discover_files(current: &Path, files: &mut Vec<PathBuf>) -> Result<(), ConfigError> {
    let entries = fs::read_dir(current).map_err(|source| ConfigError::Read {
        path: current.display().to_string(),
        source,
    })?;

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            discover_files(&path, files)?;
        } else if path.extension().map(|e| e == "toml").unwrap_or(false) {
            files.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::ScenarioRegistry;
    use crate::suite::register_vertical_suite;

    #[test]
    fn test_parse_grid_and_named() {
        let toml = r#"
[[scenario]]
name = "Stairs0"
map = ['    ##', '  ####', '######']
max_ticks = 600

[[scenario]]
name = "SlabGap0"
floor_before = "0.5"
floor_after = "0.5"
ceiling = "2"
tag = "suite:broken"
notes = "walks through 1 block gap while standing on slab"
"#;
        let scenarios = parse_scenarios(toml, "inline").unwrap();
        assert_eq!(scenarios.len(), 2);

        let stairs = &scenarios[0];
        assert_eq!(stairs.qualified_name(), "PathFindingTests:Stairs0");
        assert_eq!(stairs.config.max_ticks, 600);
        assert!(matches!(stairs.obstacle, ObstacleSpec::Grid(_)));

        let gap = &scenarios[1];
        assert!(gap.is_broken());
        assert_eq!(
            gap.obstacle,
            ObstacleSpec::Named(NamedObstacleSpec::parse("0.5", "0.5", "none", "2").unwrap())
        );
        assert_eq!(gap.config.max_ticks, 900);
        assert!(gap.notes.as_deref().unwrap().contains("1 block gap"));
    }

    #[test]
    fn test_unknown_parameter_is_an_error() {
        let toml = r#"
[[scenario]]
name = "Bad"
ceiling = "3"
"#;
        let err = parse_scenarios(toml, "bad.toml").unwrap_err();
        match err {
            ConfigError::Parse { path, message } => {
                assert_eq!(path, "bad.toml");
                assert!(message.contains("unknown ceiling height"));
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_map_and_named_fields_conflict() {
        let toml = r#"
[[scenario]]
name = "Both"
map = ['######']
mid = "1 full"
"#;
        assert!(matches!(
            parse_scenarios(toml, "inline"),
            Err(ConfigError::AmbiguousObstacle(name)) if name == "Both"
        ));
    }

    #[test]
    fn test_bad_map_glyph_is_an_error() {
        let toml = r#"
[[scenario]]
name = "Glyph"
map = ['##x']
"#;
        assert!(matches!(
            parse_scenarios(toml, "inline"),
            Err(ConfigError::UnknownMapChar { ch: 'x', .. })
        ));
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let scenarios = load_scenario_dir(Path::new("does/not/exist")).unwrap();
        assert!(scenarios.is_empty());
    }

    #[test]
    fn test_load_checked_in_scenarios() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("scenarios");
        let scenarios = load_scenario_dir(&dir).unwrap();
        let names: Vec<_> = scenarios.iter().map(|s| s.qualified_name()).collect();
        assert_eq!(
            names,
            vec![
                "PathFindingTests:Stairs0",
                "PathFindingTests:SlabStairs0",
                "PathFindingTests:RaisedSlabUnderFullCeiling",
            ]
        );

        let mut registry = ScenarioRegistry::new();
        register_vertical_suite(&mut registry).unwrap();
        for scenario in scenarios {
            registry.register(scenario).unwrap();
        }
        assert_eq!(registry.len(), 64);
    }

    #[test]
    fn test_file_scenario_clashing_with_suite_is_rejected() {
        let dir = std::env::temp_dir().join(format!("villager_paths_dup_{}", std::process::id()));
        let nested = dir.join("nested");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("ignored.txt"), "not a scenario").unwrap();
        fs::write(
            nested.join("clash.toml"),
            "[[scenario]]\nname = \"Vertical4\"\nceiling = \"2\"\n",
        )
        .unwrap();

        let loaded = load_scenario_dir(&dir);
        fs::remove_dir_all(&dir).unwrap();
        let scenarios = loaded.unwrap();
        assert_eq!(scenarios.len(), 1);

        let mut registry = ScenarioRegistry::new();
        register_vertical_suite(&mut registry).unwrap();
        let clash = scenarios.into_iter().next().unwrap();
        match registry.register(clash) {
            Err(ConfigError::DuplicateScenario(name)) => {
                assert_eq!(name, "PathFindingTests:Vertical4")
            }
            other => panic!("expected duplicate error, got {:?}", other),
        }
        assert_eq!(registry.len(), 61);
    }
}
