use hideout_core::Point;
use thiserror::Error;

/// Errors returned by grid construction and path search.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    /// Width or height is not positive, or the cell size is not a positive
    /// finite number.
    #[error("invalid grid config: {width}x{height} cells of size {cell_size}")]
    InvalidGridConfig {
        width: i32,
        height: i32,
        cell_size: f32,
    },

    /// The open set ran out before the goal was reached.
    #[error("no path from {from} to {to}")]
    NoPathFound { from: Point, to: Point },
}
