//! Assertion failures and the checks scenarios are built from

use crate::blocks::BlockPos;

use super::world::WorldQuery;

/// Error when an assertion fails
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionError {
    pub message: String,
    pub expected: String,
    pub actual: String,
}

impl AssertionError {
    pub fn new(
        message: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

impl std::fmt::Display for AssertionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\n    Expected: {}\n    Actual: {}",
            self.message, self.expected, self.actual
        )
    }
}

impl std::error::Error for AssertionError {}

/// Fails unless an entity of `kind` occupies `pos`
pub fn assert_entity_present(
    world: &dyn WorldQuery,
    kind: &str,
    pos: BlockPos,
) -> Result<(), AssertionError> {
    if world.entity_present(kind, pos) {
        Ok(())
    } else {
        Err(AssertionError::new(
            format!("Entity {} not found at {}", kind, pos),
            format!("{} at {}", kind, pos),
            "no such entity",
        ))
    }
}

/// Fails if an entity of `kind` occupies `pos`
pub fn assert_entity_not_present(
    world: &dyn WorldQuery,
    kind: &str,
    pos: BlockPos,
) -> Result<(), AssertionError> {
    if world.entity_present(kind, pos) {
        Err(AssertionError::new(
            format!("Unexpected entity {} at {}", kind, pos),
            format!("no {} at {}", kind, pos),
            format!("{} present", kind),
        ))
    } else {
        Ok(())
    }
}
