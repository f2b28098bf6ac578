use hideout_paths::PathError;
use thiserror::Error;

/// Errors returned by hide-spot queries.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HideError {
    /// Every obstacle-adjacent cell is in the threat's line of sight.
    #[error("no hiding spot out of the threat's line of sight")]
    NoHidingSpotFound,

    #[error(transparent)]
    Path(#[from] PathError),
}
