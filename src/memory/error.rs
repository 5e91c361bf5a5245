use crate::settings::InvalidSetting;

/// Reasons the memory governor could not be built.
///
/// None of these stop a write: writers that cannot get a governor keep the
/// stripe size they asked for.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GovernorError {
    /// A memory pool setting does not parse
    #[error("Invalid memory pool setting: {0}")]
    InvalidSetting(#[from] InvalidSetting),

    /// The pool fraction is not in `(0, 1]`
    #[error("Memory pool fraction {0} must be greater than 0 and at most 1")]
    InvalidFraction(f64),

    /// The resulting budget rounds down to nothing
    #[error("Memory budget must be at least one byte")]
    EmptyBudget,
}
