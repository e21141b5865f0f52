
use thiserror::Error;

use crate::construct::AttributeName;

/// Failures surfaced while building a [`crate::engine::MatchEngine`].
///
/// All of these abort construction. Running out of candidate combinations
/// during a pass is not an error; the pass iterator simply ends.
#[derive(Error, Debug)]
pub enum MatchError {
    #[error("Constraint '{0}' has no allowed values")]
    EmptyConstraint(AttributeName),
    #[error("Output constraint '{0}' has no values and no input constraint with the same key to inherit them from")]
    UnresolvedOutputConstraint(AttributeName),
    #[error("Input-only constraint '{key}' has {candidates} candidate values, exactly one is required")]
    AmbiguousInputOnly { key: AttributeName, candidates: usize },
    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, MatchError>;
