use std::collections::BinaryHeap;

use hideout_core::{Point, Vec3};

use crate::grid::Grid;
use crate::node::NodeId;

/// A route through the grid, start and goal included.
///
/// Only a search can build one, so it always holds at least one cell. It
/// serializes for inspection but does not deserialize.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Path {
    pub(crate) nodes: Vec<NodeId>,
    pub(crate) cost: i32,
}

impl Path {
    /// The cells in walking order.
    #[inline]
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Sum of the step costs along the route.
    #[inline]
    pub fn cost(&self) -> i32 {
        self.cost
    }

    /// Number of cells, endpoints included. Never zero.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn start(&self) -> NodeId {
        self.nodes[0]
    }

    #[inline]
    pub fn goal(&self) -> NodeId {
        self.nodes[self.nodes.len() - 1]
    }

    /// Grid coordinates of every cell.
    pub fn points(&self, grid: &Grid) -> Vec<Point> {
        self.nodes.iter().map(|&id| grid.node(id).pos()).collect()
    }

    /// World-space centers of every cell, for a mover to follow.
    pub fn waypoints(&self, grid: &Grid) -> Vec<Vec3> {
        self.nodes.iter().map(|&id| grid.node(id).world()).collect()
    }

    pub fn into_nodes(self) -> Vec<NodeId> {
        self.nodes
    }
}

// ---------------------------------------------------------------------------
// Per-search scratch records
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Visit {
    Unseen,
    Open,
    Closed,
}

/// Search record for one cell. Only valid when `generation` matches the
/// finder's current generation.
#[derive(Clone)]
pub(crate) struct SearchNode {
    pub(crate) g: i32,
    pub(crate) h: i32,
    pub(crate) parent: usize,
    /// Order in which the cell first entered the open set.
    pub(crate) seq: u32,
    pub(crate) generation: u32,
    pub(crate) visit: Visit,
}

impl SearchNode {
    #[inline]
    pub(crate) fn f(&self) -> i32 {
        self.g + self.h
    }
}

impl Default for SearchNode {
    fn default() -> Self {
        Self {
            g: 0,
            h: 0,
            parent: NO_PARENT,
            seq: 0,
            generation: 0,
            visit: Visit::Unseen,
        }
    }
}

pub(crate) const NO_PARENT: usize = usize::MAX;

/// Open-set entry, ordered by `f` then by `seq` for use in `BinaryHeap`.
#[derive(Clone, Copy, Eq, PartialEq)]
pub(crate) struct NodeRef {
    pub(crate) idx: usize,
    pub(crate) f: i32,
    pub(crate) seq: u32,
}

impl Ord for NodeRef {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reverse so BinaryHeap (max-heap) pops the smallest f first, and
        // among equal f the cell that was opened first.
        other.f.cmp(&self.f).then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for NodeRef {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

// ---------------------------------------------------------------------------
// PathFinder
// ---------------------------------------------------------------------------

/// A* searcher owning the scratch table for its searches.
///
/// Search state never lives on the grid's nodes. Records are stamped with a
/// generation counter, so starting a new search invalidates the previous one
/// without clearing the table. One `PathFinder` can serve any number of
/// grids; give each concurrent search its own.
#[derive(Default)]
pub struct PathFinder {
    pub(crate) nodes: Vec<SearchNode>,
    pub(crate) generation: u32,
    pub(crate) open: BinaryHeap<NodeRef>,
}

impl PathFinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A finder with its table pre-sized for `grid`.
    pub fn for_grid(grid: &Grid) -> Self {
        let mut finder = Self::new();
        finder.nodes.resize(grid.len(), SearchNode::default());
        finder
    }

    /// Size the table for `len` cells and start a new generation.
    pub(crate) fn begin(&mut self, len: usize) -> u32 {
        if self.nodes.len() < len {
            self.nodes.resize(len, SearchNode::default());
        }
        self.open.clear();
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            // Wrapped: old stamps could alias the new generation.
            for n in self.nodes.iter_mut() {
                n.generation = 0;
            }
            self.generation = 1;
        }
        self.generation
    }

    /// Trace parents back from `goal` and return the route start → goal.
    pub(crate) fn trace(&self, goal: usize) -> Path {
        let mut nodes = Vec::new();
        let mut ci = goal;
        while ci != NO_PARENT {
            nodes.push(NodeId(ci));
            ci = self.nodes[ci].parent;
        }
        nodes.reverse();
        Path {
            nodes,
            cost: self.nodes[goal].g,
        }
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use hideout_core::ObstacleSet;

    use crate::GridConfig;

    use super::*;

    #[test]
    fn searched_path_serializes_ids_and_cost() {
        let g = Grid::new(GridConfig::new(3, 3, 1.0), &ObstacleSet::new()).unwrap();
        let path = g
            .find_path(Vec3::ground(0.0, 0.0), Vec3::ground(2.0, 2.0))
            .unwrap();
        assert_eq!(path.start(), g.node_at(Point::new(0, 0)).unwrap());
        assert_eq!(path.goal(), g.node_at(Point::new(2, 2)).unwrap());
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, r#"{"nodes":[0,4,8],"cost":28}"#);
    }
}
