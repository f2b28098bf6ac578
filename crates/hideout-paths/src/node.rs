use std::fmt;

use hideout_core::{Point, Vec3};

/// Index of a [`Node`] inside its [`Grid`](crate::Grid).
///
/// Ids are only meaningful for the grid that produced them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position in the grid's node arena.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One grid cell.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) pos: Point,
    pub(crate) world: Vec3,
    pub(crate) walkable: bool,
    pub(crate) neighbors: Vec<NodeId>,
}

impl Node {
    pub(crate) fn new(pos: Point, world: Vec3, walkable: bool) -> Self {
        Self {
            pos,
            world,
            walkable,
            neighbors: Vec::with_capacity(8),
        }
    }

    /// Grid coordinates.
    #[inline]
    pub fn pos(&self) -> Point {
        self.pos
    }

    /// World-space center of the cell.
    #[inline]
    pub fn world(&self) -> Vec3 {
        self.world
    }

    #[inline]
    pub fn is_walkable(&self) -> bool {
        self.walkable
    }

    /// Adjacent cells in the order they were linked during construction.
    /// Includes non-walkable cells.
    #[inline]
    pub fn neighbors(&self) -> &[NodeId] {
        &self.neighbors
    }
}
