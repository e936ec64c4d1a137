//! Scenario registry

use bevy::prelude::*;
use std::collections::HashMap;

use crate::error::ConfigError;

use super::scenario::{ScenarioDefinition, Tag};

/// Index of a registered scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegistrationHandle(usize);

/// Which registered scenarios to run or list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScenarioFilter {
    /// Also select `suite:broken` scenarios
    pub include_broken: bool,
    /// Substring of the qualified name
    pub name: Option<String>,
    /// Exact batch label
    pub batch: Option<String>,
}

impl ScenarioFilter {
    pub fn matches(&self, scenario: &ScenarioDefinition) -> bool {
        if scenario.has_tag(Tag::SuiteBroken) && !self.include_broken {
            return false;
        }
        if let Some(name) = &self.name {
            if !scenario.qualified_name().contains(name.as_str()) {
                return false;
            }
        }
        if let Some(batch) = &self.batch {
            if scenario.config.batch != *batch {
                return false;
            }
        }
        true
    }
}

/// Owns every registered scenario, in registration order
#[derive(Debug, Default)]
pub struct ScenarioRegistry {
    scenarios: Vec<ScenarioDefinition>,
    by_name: HashMap<String, usize>,
}

impl ScenarioRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a scenario; names are unique per suite
    pub fn register(
        &mut self,
        scenario: ScenarioDefinition,
    ) -> Result<RegistrationHandle, ConfigError> {
        let key = scenario.qualified_name();
        if self.by_name.contains_key(&key) {
            return Err(ConfigError::DuplicateScenario(key));
        }

        let idx = self.scenarios.len();
        debug!("Registered {}", key);
        self.by_name.insert(key, idx);
        self.scenarios.push(scenario);
        Ok(RegistrationHandle(idx))
    }

    pub fn get(&self, handle: RegistrationHandle) -> Option<&ScenarioDefinition> {
        self.scenarios.get(handle.0)
    }

    /// Look up by qualified (`Suite:Name`) or bare name
    pub fn find(&self, name: &str) -> Option<&ScenarioDefinition> {
        if let Some(&idx) = self.by_name.get(name) {
            return self.scenarios.get(idx);
        }
        self.scenarios.iter().find(|s| s.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScenarioDefinition> {
        self.scenarios.iter()
    }

    pub fn select<'a>(
        &'a self,
        filter: &'a ScenarioFilter,
    ) -> impl Iterator<Item = &'a ScenarioDefinition> + 'a {
        self.scenarios.iter().filter(move |s| filter.matches(s))
    }

    /// Selected scenarios grouped by batch, in order of first appearance
    pub fn batches<'a>(
        &'a self,
        filter: &ScenarioFilter,
    ) -> Vec<(String, Vec<&'a ScenarioDefinition>)> {
        let mut batches: Vec<(String, Vec<&'a ScenarioDefinition>)> = Vec::new();
        for scenario in self.scenarios.iter().filter(|s| filter.matches(s)) {
            match batches.iter_mut().find(|(b, _)| *b == scenario.config.batch) {
                Some((_, members)) => members.push(scenario),
                None => batches.push((scenario.config.batch.clone(), vec![scenario])),
            }
        }
        batches
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::NamedObstacleSpec;

    fn scenario(name: &str, tag: Tag) -> ScenarioDefinition {
        let spec = NamedObstacleSpec::parse("0", "0", "none", "2").unwrap();
        ScenarioDefinition::vertical(name, spec, tag)
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let mut registry = ScenarioRegistry::new();
        let handle = registry.register(scenario("Vertical4", Tag::SuiteDefault)).unwrap();
        assert_eq!(registry.get(handle).unwrap().name, "Vertical4");

        match registry.register(scenario("Vertical4", Tag::SuiteBroken)) {
            Err(ConfigError::DuplicateScenario(name)) => {
                assert_eq!(name, "PathFindingTests:Vertical4")
            }
            other => panic!("expected duplicate error, got {:?}", other),
        }
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_same_name_in_other_suite_is_allowed() {
        let mut registry = ScenarioRegistry::new();
        registry.register(scenario("Vertical4", Tag::SuiteDefault)).unwrap();
        let mut other = scenario("Vertical4", Tag::SuiteDefault);
        other.suite = "OtherTests".to_string();
        assert!(registry.register(other).is_ok());
    }

    #[test]
    fn test_find_by_bare_or_qualified_name() {
        let mut registry = ScenarioRegistry::new();
        registry.register(scenario("Vertical9", Tag::SuiteDefault)).unwrap();
        assert!(registry.find("Vertical9").is_some());
        assert!(registry.find("PathFindingTests:Vertical9").is_some());
        assert!(registry.find("Vertical10").is_none());
    }

    #[test]
    fn test_filter_excludes_broken_by_default() {
        let mut registry = ScenarioRegistry::new();
        registry.register(scenario("Vertical17", Tag::SuiteDefault)).unwrap();
        registry.register(scenario("Vertical18", Tag::SuiteBroken)).unwrap();

        let default = ScenarioFilter::default();
        assert_eq!(registry.select(&default).count(), 1);

        let all = ScenarioFilter {
            include_broken: true,
            ..Default::default()
        };
        assert_eq!(registry.select(&all).count(), 2);

        let named = ScenarioFilter {
            include_broken: true,
            name: Some("Vertical18".to_string()),
            ..Default::default()
        };
        let picked: Vec<_> = registry.select(&named).map(|s| s.name.as_str()).collect();
        assert_eq!(picked, vec!["Vertical18"]);
    }

    #[test]
    fn test_batches_group_in_order() {
        let mut registry = ScenarioRegistry::new();
        registry.register(scenario("A", Tag::SuiteDefault)).unwrap();
        let mut day = scenario("B", Tag::SuiteDefault);
        day.config.batch = "day".to_string();
        registry.register(day).unwrap();
        registry.register(scenario("C", Tag::SuiteDefault)).unwrap();

        let batches = registry.batches(&ScenarioFilter::default());
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].0, "night");
        assert_eq!(batches[0].1.len(), 2);
        assert_eq!(batches[1].0, "day");

        let only_day = ScenarioFilter {
            batch: Some("day".to_string()),
            ..Default::default()
        };
        assert_eq!(registry.batches(&only_day).len(), 1);
    }
}
