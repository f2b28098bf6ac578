//! Neighbor and ring queries.
//!
//! Three distinct queries are provided. The first two are geometric and
//! work on grid coordinates; the third follows the adjacency graph.

use hideout_core::Range;

use crate::distance::chebyshev;
use crate::grid::Grid;
use crate::node::NodeId;

impl Grid {
    /// Cells of the 3×3 block around `id`, excluding `id` itself, in `dx`
    /// then `dy` order. With `only_walkable`, obstacle cells are skipped.
    pub fn nearest_nodes(&self, id: NodeId, only_walkable: bool) -> Vec<NodeId> {
        let p = self.node(id).pos();
        let mut out = Vec::with_capacity(8);
        for dx in -1..=1 {
            for dy in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let Some(n) = self.node_at(p.shift(dx, dy)) else {
                    continue;
                };
                if only_walkable && !self.node(n).is_walkable() {
                    continue;
                }
                out.push(n);
            }
        }
        out
    }

    /// Every in-bounds cell at Chebyshev distance `1..=range` from `id`,
    /// ring by ring. Walkability is ignored; `range == 0` yields nothing.
    pub fn nearest_nodes_in_range(&self, id: NodeId, range: u32) -> Vec<NodeId> {
        let p = self.node(id).pos();
        // No cell is farther than the longer grid side.
        let max_r = range.min(self.width().max(self.height()) as u32) as i32;
        let mut out = Vec::new();
        for r in 1..=max_r {
            let ring = Range::around(p, r)
                .intersect(self.bounds())
                .iter()
                .filter(|&q| chebyshev(p, q) == r);
            out.extend(ring.map(|q| self.id_unchecked(q)));
        }
        out
    }

    /// Every cell that ends an adjacency walk of exactly `range` steps from
    /// `id`, in node order. `range == 0` yields `id` alone.
    ///
    /// Unlike [`nearest_nodes_in_range`](Self::nearest_nodes_in_range) this
    /// follows the neighbor links, so for `range >= 2` the start cell itself
    /// is included (walk out and back).
    pub fn nearest_nodes_in_range_walk(&self, id: NodeId, range: u32) -> Vec<NodeId> {
        let mut before = Vec::new();
        let mut frontier = vec![id];
        let mut reached = vec![false; self.len()];

        for step in 1..=range {
            reached.fill(false);
            let mut next = Vec::with_capacity(frontier.len() * 2);
            for &cur in &frontier {
                for &n in self.node(cur).neighbors() {
                    if !reached[n.index()] {
                        reached[n.index()] = true;
                        next.push(n);
                    }
                }
            }
            next.sort_unstable();

            if next.is_empty() {
                return next;
            }
            // Each frontier depends only on the previous one, so once a set
            // comes back after two steps the walk alternates from then on.
            if next == before {
                return if (range - step) % 2 == 0 { next } else { frontier };
            }
            before = std::mem::replace(&mut frontier, next);
        }

        frontier
    }
}
