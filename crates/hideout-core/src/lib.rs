//! Shared types for grid navigation.
//!
//! This crate provides the foundational types used across the *hideout*
//! crates: integer grid geometry, world-space vectors, and the obstacle
//! oracles through which the navigation code asks the outside world
//! whether a region or a line of sight is obstructed.

pub mod geom;
pub mod oracle;
pub mod world;

pub use geom::{Point, Range};
pub use oracle::{Aabb, LayerMask, ObstacleSet, OverlapOracle, SightOracle};
pub use world::Vec3;
