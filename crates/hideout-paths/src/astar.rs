use hideout_core::Vec3;

use crate::distance::{estimate, step_cost};
use crate::error::PathError;
use crate::grid::Grid;
use crate::node::NodeId;
use crate::pathfinder::{NO_PARENT, NodeRef, PathFinder, SearchNode, Visit};
use crate::Path;

impl PathFinder {
    /// Compute a path between two world positions using A*.
    ///
    /// Both positions are first mapped to cells with
    /// [`Grid::node_from_world_point`], so they never fail to resolve.
    pub fn find_path(&mut self, grid: &Grid, start: Vec3, end: Vec3) -> Result<Path, PathError> {
        let from = grid.node_from_world_point(start);
        let to = grid.node_from_world_point(end);
        self.find_path_between(grid, from, to)
    }

    /// Compute a path between two cells using A*.
    ///
    /// Only walkable cells are entered; the start cell itself is not
    /// checked. Among open cells with equal `f` the one opened first is
    /// expanded first, which makes results deterministic.
    pub fn find_path_between(
        &mut self,
        grid: &Grid,
        start: NodeId,
        goal: NodeId,
    ) -> Result<Path, PathError> {
        let cur_gen = self.begin(grid.len());
        let goal_pos = grid.node(goal).pos();
        let start_pos = grid.node(start).pos();

        self.nodes[start.index()] = SearchNode {
            g: 0,
            h: estimate(start_pos, goal_pos),
            parent: NO_PARENT,
            seq: 0,
            generation: cur_gen,
            visit: Visit::Open,
        };
        self.open.push(NodeRef {
            idx: start.index(),
            f: self.nodes[start.index()].f(),
            seq: 0,
        });

        let mut next_seq = 1u32;
        let mut expanded = 0usize;

        let found = 'search: loop {
            let Some(current) = self.open.pop() else {
                break 'search false;
            };

            let ci = current.idx;

            // Skip entries superseded by a cheaper route or already closed.
            let cn = &self.nodes[ci];
            if cn.visit != Visit::Open || cn.f() != current.f {
                continue;
            }

            if ci == goal.index() {
                break 'search true;
            }

            let current_g = cn.g;
            let current_node = grid.node(NodeId(ci));
            let current_pos = current_node.pos();
            expanded += 1;

            for &nid in current_node.neighbors() {
                let neighbor = grid.node(nid);
                if !neighbor.is_walkable() {
                    continue;
                }

                let n = &mut self.nodes[nid.index()];
                if n.generation != cur_gen {
                    *n = SearchNode {
                        generation: cur_gen,
                        ..SearchNode::default()
                    };
                }
                if n.visit == Visit::Closed {
                    continue;
                }

                let tentative_g = current_g + step_cost(current_pos, neighbor.pos());
                if n.visit == Visit::Open && n.g <= tentative_g {
                    continue;
                }

                n.parent = ci;
                n.g = tentative_g;
                n.h = estimate(neighbor.pos(), goal_pos);
                if n.visit != Visit::Open {
                    n.visit = Visit::Open;
                    n.seq = next_seq;
                    next_seq += 1;
                }

                let entry = NodeRef {
                    idx: nid.index(),
                    f: n.f(),
                    seq: n.seq,
                };
                self.open.push(entry);
            }

            self.nodes[ci].visit = Visit::Closed;
        };

        if !found {
            log::debug!(
                "no path {} -> {} after expanding {} cells",
                start_pos,
                goal_pos,
                expanded
            );
            return Err(PathError::NoPathFound {
                from: start_pos,
                to: goal_pos,
            });
        }

        let path = self.trace(goal.index());
        log::debug!(
            "path {} -> {}: {} cells, cost {}, {} expanded",
            start_pos,
            goal_pos,
            path.len(),
            path.cost(),
            expanded
        );
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use hideout_core::{ObstacleSet, Point};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use crate::{GridConfig, step_cost};

    use super::*;

    fn grid_from(rows: &[&str]) -> Grid {
        let w = rows[0].len() as i32;
        let h = rows.len() as i32;
        let obstacles = ObstacleSet::from_ascii(rows, 1.0, Vec3::ZERO);
        Grid::new(GridConfig::new(w, h, 1.0), &obstacles).unwrap()
    }

    fn at(g: &Grid, x: i32, y: i32) -> NodeId {
        g.node_at(Point::new(x, y)).unwrap()
    }

    fn assert_well_formed(g: &Grid, path: &Path, start: NodeId, goal: NodeId) {
        assert_eq!(path.start(), start);
        assert_eq!(path.goal(), goal);
        let pts = path.points(g);
        let mut cost = 0;
        for pair in pts.windows(2) {
            assert!(pair[0].is_adjacent(pair[1]), "{} -> {} not adjacent", pair[0], pair[1]);
            cost += step_cost(pair[0], pair[1]);
        }
        assert_eq!(cost, path.cost());
        for &id in &path.nodes()[1..] {
            assert!(g.node(id).is_walkable());
        }
    }

    #[test]
    fn open_grid_diagonal() {
        let g = grid_from(&["....."; 5]);
        let path = g
            .find_path(Vec3::ground(0.0, 0.0), Vec3::ground(4.0, 4.0))
            .unwrap();
        assert_eq!(path.len(), 5);
        assert_eq!(path.cost(), 56);
        assert_eq!(
            path.points(&g),
            (0..5).map(|i| Point::new(i, i)).collect::<Vec<_>>()
        );
    }

    #[test]
    fn straight_line() {
        let g = grid_from(&["....."; 3]);
        let path = g
            .find_path(Vec3::ground(0.0, 1.0), Vec3::ground(4.0, 1.0))
            .unwrap();
        assert_eq!(path.cost(), 40);
        assert_eq!(path.len(), 5);
        assert_well_formed(&g, &path, at(&g, 0, 1), at(&g, 4, 1));
    }

    #[test]
    fn start_is_goal() {
        let g = grid_from(&["..."; 3]);
        let path = g
            .find_path(Vec3::ground(1.0, 1.0), Vec3::ground(1.0, 1.0))
            .unwrap();
        assert_eq!(path.nodes(), &[at(&g, 1, 1)]);
        assert_eq!(path.cost(), 0);
    }

    #[test]
    fn detours_around_wall() {
        let g = grid_from(&[
            ".....", //
            "..#..",
            "..#..",
            "..#..",
            ".....",
        ]);
        let (s, t) = (at(&g, 0, 2), at(&g, 4, 2));
        let path = PathFinder::new().find_path_between(&g, s, t).unwrap();
        assert_well_formed(&g, &path, s, t);
        assert!(!path.points(&g).contains(&Point::new(2, 2)));
    }

    #[test]
    fn full_height_wall_has_no_path() {
        let g = grid_from(&["..#.."; 5]);
        let err = g
            .find_path(Vec3::ground(0.0, 0.0), Vec3::ground(4.0, 4.0))
            .unwrap_err();
        assert_eq!(
            err,
            PathError::NoPathFound {
                from: Point::new(0, 0),
                to: Point::new(4, 4),
            }
        );
    }

    #[test]
    fn blocked_goal_has_no_path() {
        let g = grid_from(&["...", ".#.", "..."]);
        let err = PathFinder::new()
            .find_path_between(&g, at(&g, 0, 0), at(&g, 1, 1))
            .unwrap_err();
        assert!(matches!(err, PathError::NoPathFound { .. }));
    }

    #[test]
    fn repeated_searches_are_identical() {
        let g = grid_from(&[
            "........",
            ".##.#...",
            "...#..#.",
            ".#...#..",
            "...#....",
        ]);
        let (s, t) = (Vec3::ground(0.0, 0.0), Vec3::ground(7.0, 4.0));
        let mut pf = PathFinder::for_grid(&g);
        let first = pf.find_path(&g, s, t).unwrap();
        let second = pf.find_path(&g, s, t).unwrap();
        let fresh = PathFinder::new().find_path(&g, s, t).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, fresh);
    }

    #[test]
    fn finder_reuse_after_failure() {
        let walled = grid_from(&["..#.."; 3]);
        let open = grid_from(&["....."; 3]);
        let mut pf = PathFinder::new();
        assert!(pf.find_path_between(&walled, at(&walled, 0, 0), at(&walled, 4, 0)).is_err());
        let path = pf.find_path_between(&open, at(&open, 0, 0), at(&open, 4, 0)).unwrap();
        assert_eq!(path.cost(), 40);
    }

    #[test]
    fn random_grids_yield_well_formed_paths() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut pf = PathFinder::new();
        for _ in 0..20 {
            let mut obstacles = ObstacleSet::new();
            for _ in 0..30 {
                let x = rng.random_range(0..10) as f32;
                let z = rng.random_range(0..10) as f32;
                obstacles.push_block(Vec3::ground(x, z), 1.0);
            }
            let g = Grid::new(GridConfig::new(10, 10, 1.0), &obstacles).unwrap();
            let s = at(&g, rng.random_range(0..10), rng.random_range(0..10));
            let t = at(&g, rng.random_range(0..10), rng.random_range(0..10));
            match pf.find_path_between(&g, s, t) {
                Ok(path) => assert_well_formed(&g, &path, s, t),
                Err(PathError::NoPathFound { from, to }) => {
                    assert_eq!(from, g.node(s).pos());
                    assert_eq!(to, g.node(t).pos());
                }
                Err(e) => panic!("unexpected error {e}"),
            }
        }
    }
}
