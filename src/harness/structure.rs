//! Structure templates and padded region allocation

use std::collections::HashMap;

use crate::blocks::{BlockDescriptor, BlockPos, Material, Placement};
use crate::constants::{TEMPLATE_FLOOR_Y, VERTICAL_TEMPLATE_NAME, VERTICAL_TEMPLATE_SIZE};
use crate::error::ConfigError;

/// Named block layout a scenario is built on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureTemplate {
    pub name: String,
    /// Footprint (x, y, z), starting at the local origin
    pub size: BlockPos,
    /// Blocks placed when the template is loaded, in the template frame
    pub blocks: Vec<Placement>,
}

impl StructureTemplate {
    /// Empty box with a stone floor across the whole footprint
    pub fn vertical() -> Self {
        let size = VERTICAL_TEMPLATE_SIZE;
        let blocks = (0..size.x)
            .flat_map(|x| {
                (0..size.z).map(move |z| {
                    Placement::new(
                        BlockPos::new(x, TEMPLATE_FLOOR_Y, z),
                        BlockDescriptor::Solid(Material::Stone),
                    )
                })
            })
            .collect();

        Self {
            name: VERTICAL_TEMPLATE_NAME.to_string(),
            size,
            blocks,
        }
    }
}

/// Templates addressable by name
#[derive(Debug, Clone)]
pub struct StructureLibrary {
    templates: HashMap<String, StructureTemplate>,
}

impl Default for StructureLibrary {
    fn default() -> Self {
        let mut library = Self {
            templates: HashMap::new(),
        };
        library.insert(StructureTemplate::vertical());
        library
    }
}

impl StructureLibrary {
    /// Add or replace a template
    pub fn insert(&mut self, template: StructureTemplate) {
        self.templates.insert(template.name.clone(), template);
    }

    pub fn get(&self, name: &str) -> Result<&StructureTemplate, ConfigError> {
        self.templates
            .get(name)
            .ok_or_else(|| ConfigError::UnknownTemplate(name.to_string()))
    }
}

/// Placed template: local frame origin plus footprint, in world coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructureRegion {
    pub origin: BlockPos,
    pub size: BlockPos,
}

impl StructureRegion {
    pub fn to_world(&self, local: BlockPos) -> BlockPos {
        local.offset(self.origin.x, self.origin.y, self.origin.z)
    }

    pub fn to_local(&self, world: BlockPos) -> BlockPos {
        world.offset(-self.origin.x, -self.origin.y, -self.origin.z)
    }

    /// Whether a world position lies inside the footprint
    pub fn contains(&self, world: BlockPos) -> bool {
        let local = self.to_local(world);
        (0..self.size.x).contains(&local.x)
            && (0..self.size.y).contains(&local.y)
            && (0..self.size.z).contains(&local.z)
    }
}

/// Lays regions out along +X, keeping `padding` clear on both sides of each
#[derive(Debug, Default)]
pub struct RegionAllocator {
    cursor_x: i32,
}

impl RegionAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self, size: BlockPos, padding: i32) -> StructureRegion {
        let padding = padding.max(0);
        let origin = BlockPos::new(self.cursor_x + padding, 0, 0);
        self.cursor_x = origin.x + size.x + padding;
        StructureRegion { origin, size }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertical_template_floor() {
        let template = StructureTemplate::vertical();
        assert_eq!(template.name, "PathFindingTests:veritcal_template");
        assert_eq!(
            template.blocks.len(),
            (template.size.x * template.size.z) as usize
        );
        assert!(template.blocks.iter().all(|p| p.pos.y == TEMPLATE_FLOOR_Y));
    }

    #[test]
    fn test_library_lookup() {
        let library = StructureLibrary::default();
        assert!(library.get(VERTICAL_TEMPLATE_NAME).is_ok());
        assert!(matches!(
            library.get("PathFindingTests:missing"),
            Err(ConfigError::UnknownTemplate(_))
        ));
    }

    #[test]
    fn test_regions_keep_padding_apart() {
        let size = BlockPos::new(7, 7, 6);
        let mut allocator = RegionAllocator::new();
        let a = allocator.allocate(size, 50);
        let b = allocator.allocate(size, 50);

        assert_eq!(a.origin, BlockPos::new(50, 0, 0));
        let gap = b.origin.x - (a.origin.x + size.x);
        assert_eq!(gap, 100);
        assert!(!a.contains(b.origin));
        // the next region keeps both paddings too
        let c = allocator.allocate(size, 50);
        assert_eq!(c.origin.x, b.origin.x + size.x + 100);
    }

    #[test]
    fn test_region_frames() {
        let region = StructureRegion {
            origin: BlockPos::new(50, 0, 0),
            size: BlockPos::new(7, 7, 6),
        };
        let bed = BlockPos::new(1, 2, 4);
        assert_eq!(region.to_world(bed), BlockPos::new(51, 2, 4));
        assert_eq!(region.to_local(region.to_world(bed)), bed);
        assert!(region.contains(region.to_world(bed)));
        assert!(!region.contains(BlockPos::new(57, 2, 4)));
    }
}
