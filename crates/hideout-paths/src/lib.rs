//! Navigation grid and pathfinding.
//!
//! A [`Grid`] is generated once from a [`GridConfig`] and an obstacle
//! oracle. It owns every cell as a [`Node`] in a flat arena; adjacency is
//! stored as [`NodeId`] indices, so the grid is immutable after
//! construction and can be shared freely.
//!
//! Searches run through a [`PathFinder`], which owns the per-search scratch
//! table (costs, parents, open/closed state). Reusing one `PathFinder`
//! across queries avoids reallocating that table.
//!
//! # Queries
//!
//! | Operation | Purpose |
//! |---|---|
//! | [`Grid::node_from_world_point`] | world position → cell (clamped) |
//! | [`Grid::nearest_nodes`] | the 3×3 block around a cell |
//! | [`Grid::nearest_nodes_in_range`] | every Chebyshev ring up to a radius |
//! | [`Grid::nearest_nodes_in_range_walk`] | endpoints of adjacency walks |
//! | [`PathFinder::find_path`] | A* between two world positions |

mod astar;
mod config;
mod distance;
mod error;
mod grid;
mod neighbors;
mod node;
mod pathfinder;

pub use config::{CellMapping, GridConfig};
pub use distance::{DIAGONAL_COST, STRAIGHT_COST, chebyshev, estimate, manhattan, step_cost};
pub use error::PathError;
pub use grid::Grid;
pub use node::{Node, NodeId};
pub use pathfinder::{Path, PathFinder};
