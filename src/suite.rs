//! Built-in vertical navigation suite
//!
//! A farmer villager spawns on the right and has to reach a bed on the left,
//! crossing one small vertical obstacle on the way.

use crate::error::ConfigError;
use crate::harness::{ScenarioDefinition, ScenarioRegistry, Tag};
use crate::terrain::{NamedObstacleSpec, ObstacleRowMap};

/// Obstacle courses drawn as side views. Villager moves from left to right
/// in the drawing.
pub const VERTICAL_COURSES: [&[&str]; 3] = [
    &["^^##  ", "  ^^  ", "    ^^", "######"],
    &["  ^^^^", "      ", "  ^^  ", "######"],
    &["  ####", "      ", "      ", "____##", "######"],
];

enum Known {
    Broken(&'static str),
    Flaky,
}

/// (number, floor before, floor after, mid, ceiling, known issue)
type Step = (
    u32,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    Option<Known>,
);

const VERTICAL_STEPS: [Step; 58] = [
    (3, "0", "0", "0.5 slab", "1.5", None),
    (4, "0", "0", "0.5 slab", "2", None),
    (5, "0", "0", "1 slab", "2", None),
    (6, "0", "0", "1 slab", "2.5", None),
    (7, "0", "0", "1.5 slab", "2.5", None),
    (8, "0", "0", "1 full", "2.5", None),
    (9, "0", "0", "none", "0.5", None),
    (10, "0", "0", "none", "1", None),
    (11, "0", "0", "none", "1.5", None),
    (12, "0", "0.5", "1 slab", "2", None),
    (13, "0", "0.5", "1 slab", "2.5", None),
    (14, "0", "0.5", "1.5 slab", "2.5", None),
    (15, "0", "0.5", "1 full", "2.5", None),
    (16, "0", "0.5", "none", "1", None),
    (17, "0", "0.5", "none", "1.5", None),
    (
        18,
        "0",
        "0.5",
        "none",
        "2",
        Some(Known::Broken(
            "Villager attempts to jump over slab with single block gap above it",
        )),
    ),
    (19, "0", "0.5", "none", "2.5", None),
    (20, "0", "1", "1.5 slab", "2.5", None),
    (21, "0", "1", "none", "1.5", None),
    (22, "0", "1", "none", "2", None),
    (23, "0", "1", "none", "2.5", None),
    (24, "0.5", "0", "0.5 slab", "1.5", None),
    (25, "0.5", "0", "0.5 slab", "2", None),
    (26, "0.5", "0", "0.5 slab", "2.5", None),
    (27, "0.5", "0", "1 slab", "2", None),
    (28, "0.5", "0", "1 slab", "2.5", None),
    (
        29,
        "0.5",
        "0",
        "1 slab",
        "none",
        Some(Known::Broken(
            "Villager attempts to walk through floating slab while standing on slab",
        )),
    ),
    (30, "0.5", "0", "1.5 slab", "2.5", None),
    (31, "0.5", "0", "1.5 slab", "none", None),
    (32, "0.5", "0", "1 full", "2.5", None),
    (33, "0.5", "0", "1 full", "none", None),
    (34, "0.5", "0", "none", "1.5", None),
    (
        35,
        "0.5",
        "0",
        "none",
        "2",
        Some(Known::Broken(
            "Villager attempts to jump down from a slab to a 1.5 block gap but hits head on block",
        )),
    ),
    (36, "0.5", "0", "none", "2.5", None),
    (37, "0.5", "0.5", "1 slab", "2", None),
    (38, "0.5", "0.5", "1 slab", "2.5", None),
    (39, "0.5", "0.5", "1 slab", "none", None),
    (40, "0.5", "0.5", "1.5 slab", "2.5", None),
    (41, "0.5", "0.5", "1.5 slab", "none", None),
    (42, "0.5", "0.5", "1 full", "2.5", None),
    (43, "0.5", "0.5", "1 full", "none", None),
    (44, "0.5", "0.5", "none", "1.5", None),
    (
        45,
        "0.5",
        "0.5",
        "none",
        "2",
        Some(Known::Broken(
            "Villager attempts to walk through 1 block gap while standing on slab",
        )),
    ),
    (46, "0.5", "0.5", "none", "2.5", None),
    (47, "0.5", "1", "1.5 slab", "2.5", None),
    (48, "0.5", "1", "1.5 slab", "none", None),
    (49, "0.5", "1", "none", "1.5", None),
    (50, "0.5", "1", "none", "2", None),
    (51, "0.5", "1", "none", "2.5", None),
    (52, "0.5", "1", "none", "none", None),
    (53, "1", "0", "none", "1.5", None),
    (54, "1", "0", "none", "2", Some(Known::Flaky)),
    (55, "1", "0", "none", "2.5", Some(Known::Flaky)),
    (56, "1", "0", "none", "none", None),
    (57, "1", "0.5", "none", "1.5", None),
    (
        58,
        "1",
        "0.5",
        "none",
        "2",
        Some(Known::Broken("Villager constantly attempts to jump into 1 block gap")),
    ),
    (59, "1", "0.5", "none", "2.5", None),
    (60, "1", "0.5", "none", "none", None),
];

/// Every built-in scenario, `Vertical0` through `Vertical60`
pub fn vertical_scenarios() -> Result<Vec<ScenarioDefinition>, ConfigError> {
    let mut scenarios = Vec::with_capacity(VERTICAL_COURSES.len() + VERTICAL_STEPS.len());

    for (counter, rows) in VERTICAL_COURSES.iter().enumerate() {
        let map = ObstacleRowMap::new(rows.iter().copied())?;
        scenarios.push(ScenarioDefinition::vertical(
            format!("Vertical{}", counter),
            map,
            Tag::SuiteDefault,
        ));
    }

    for (counter, floor_before, floor_after, mid, ceiling, known) in &VERTICAL_STEPS {
        let spec = NamedObstacleSpec::parse(floor_before, floor_after, mid, ceiling)?;
        let name = format!("Vertical{}", counter);
        let scenario = match known {
            None => ScenarioDefinition::vertical(name, spec, Tag::SuiteDefault),
            Some(Known::Flaky) => {
                ScenarioDefinition::vertical(name, spec, Tag::SuiteDefault).with_notes("flaky")
            }
            Some(Known::Broken(notes)) => {
                ScenarioDefinition::vertical(name, spec, Tag::SuiteBroken).with_notes(*notes)
            }
        };
        scenarios.push(scenario);
    }

    Ok(scenarios)
}

/// Register the built-in suite. Fails on a second call into the same registry.
pub fn register_vertical_suite(registry: &mut ScenarioRegistry) -> Result<(), ConfigError> {
    for scenario in vertical_scenarios()? {
        registry.register(scenario)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::ScenarioFilter;
    use crate::terrain::{CeilingHeight, FloorHeight, MidObstruction, ObstacleSpec};

    fn suite() -> ScenarioRegistry {
        let mut registry = ScenarioRegistry::new();
        register_vertical_suite(&mut registry).unwrap();
        registry
    }

    #[test]
    fn test_registers_sixty_one_scenarios() {
        let registry = suite();
        assert_eq!(registry.len(), 61);
        assert!(registry.find("PathFindingTests:Vertical0").is_some());
        assert!(registry.find("PathFindingTests:Vertical60").is_some());
        assert!(registry.find("Vertical61").is_none());
    }

    #[test]
    fn test_broken_scenarios() {
        let registry = suite();
        let broken: Vec<_> = registry
            .iter()
            .filter(|s| s.is_broken())
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(
            broken,
            vec!["Vertical18", "Vertical29", "Vertical35", "Vertical45", "Vertical58"]
        );
        assert!(registry.iter().filter(|s| s.is_broken()).all(|s| s.notes.is_some()));
        assert_eq!(registry.select(&ScenarioFilter::default()).count(), 56);
    }

    #[test]
    fn test_flaky_notes() {
        let registry = suite();
        let v54 = registry.find("Vertical54").unwrap();
        assert!(!v54.is_broken());
        assert_eq!(v54.notes.as_deref(), Some("flaky"));
        assert_eq!(registry.find("Vertical55").unwrap().notes.as_deref(), Some("flaky"));
    }

    #[test]
    fn test_parameters_carried_through() {
        let registry = suite();
        assert_eq!(
            registry.find("Vertical29").unwrap().obstacle,
            ObstacleSpec::Named(NamedObstacleSpec::new(
                FloorHeight::Half,
                FloorHeight::None,
                MidObstruction::OneSlab,
                CeilingHeight::None,
            ))
        );
        match &registry.find("Vertical2").unwrap().obstacle {
            ObstacleSpec::Grid(map) => assert_eq!(map.rows().len(), 5),
            other => panic!("expected grid obstacle, got {:?}", other),
        }
    }

    #[test]
    fn test_registering_twice_fails() {
        let mut registry = suite();
        match register_vertical_suite(&mut registry) {
            Err(ConfigError::DuplicateScenario(name)) => {
                assert_eq!(name, "PathFindingTests:Vertical0")
            }
            other => panic!("expected duplicate error, got {:?}", other),
        }
    }
}
