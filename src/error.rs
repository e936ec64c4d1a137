//! Configuration errors raised while building or loading scenarios

use thiserror::Error;

/// Error raised at registration or load time. Never raised while a scenario
/// is running; run failures are reported as [`crate::harness::AssertionError`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("scenario '{0}' is already registered")]
    DuplicateScenario(String),

    #[error("unknown obstacle map character {ch:?} in row {row}, column {column}")]
    UnknownMapChar { row: usize, column: usize, ch: char },

    #[error("unknown floor height '{0}' (expected none, 0, 0.5 or 1)")]
    UnknownFloorHeight(String),

    #[error("unknown mid obstruction '{0}' (expected none, 0.5 slab, 1 slab, 1.5 slab or 1 full)")]
    UnknownMidObstruction(String),

    #[error("unknown ceiling height '{0}' (expected none, 0.5, 1, 1.5, 2 or 2.5)")]
    UnknownCeilingHeight(String),

    #[error("unknown tag '{0}'")]
    UnknownTag(String),

    #[error("unknown structure template '{0}'")]
    UnknownTemplate(String),

    #[error("scenario '{0}' needs either a map or the named obstacle fields, not both")]
    AmbiguousObstacle(String),

    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },
}
