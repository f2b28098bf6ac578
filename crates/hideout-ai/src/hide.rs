//! Hide-spot selection.
//!
//! Cover is any walkable cell touching an obstacle. A cover cell is a hiding
//! spot when the line of sight from it to the threat is blocked.

use hideout_core::{SightOracle, Vec3};
use hideout_paths::{Grid, NodeId, Path, PathFinder};

use crate::error::HideError;

/// Picks hiding spots on a grid using a line-of-sight oracle.
pub struct HideSpotSelector<'a, S> {
    grid: &'a Grid,
    sight: &'a S,
}

impl<'a, S: SightOracle> HideSpotSelector<'a, S> {
    pub fn new(grid: &'a Grid, sight: &'a S) -> Self {
        Self { grid, sight }
    }

    /// Whether the threat's view of `from` is blocked, using the grid's
    /// obstacle layers.
    pub fn is_hidden(&self, from: Vec3, threat: Vec3) -> bool {
        self.sight.ray_blocked(from, threat, self.grid.layers())
    }

    /// Every walkable cell adjacent to an obstacle, each listed once, in the
    /// order they are first met scanning obstacles in grid order.
    pub fn candidates(&self) -> Vec<NodeId> {
        let mut listed = vec![false; self.grid.len()];
        let mut out = Vec::new();
        for (id, node) in self.grid.nodes() {
            if node.is_walkable() {
                continue;
            }
            for n in self.grid.nearest_nodes(id, true) {
                if !listed[n.index()] {
                    listed[n.index()] = true;
                    out.push(n);
                }
            }
        }
        out
    }

    /// All hiding spots from `threat`, nearest to `self_pos` first. Equal
    /// distances keep candidate order.
    pub fn hidden_nodes(&self, threat: Vec3, self_pos: Vec3) -> Vec<NodeId> {
        let mut ranked: Vec<(f32, NodeId)> = self
            .candidates()
            .into_iter()
            .filter(|&id| self.is_hidden(self.grid.node(id).world(), threat))
            .map(|id| (self.grid.node(id).world().distance(self_pos), id))
            .collect();
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
        log::trace!("{} hiding spots from threat at {}", ranked.len(), threat);
        ranked.into_iter().map(|(_, id)| id).collect()
    }

    /// The hiding spot nearest to `self_pos`.
    pub fn find_hiding_node(&self, threat: Vec3, self_pos: Vec3) -> Result<NodeId, HideError> {
        self.hidden_nodes(threat, self_pos)
            .first()
            .copied()
            .ok_or(HideError::NoHidingSpotFound)
    }

    /// Pick the nearest hiding spot and plan a route to it from the cell
    /// under `self_pos`.
    pub fn plan_escape(
        &self,
        finder: &mut PathFinder,
        threat: Vec3,
        self_pos: Vec3,
    ) -> Result<(NodeId, Path), HideError> {
        let spot = self.find_hiding_node(threat, self_pos)?;
        let from = self.grid.node_from_world_point(self_pos);
        let path = finder.find_path_between(self.grid, from, spot)?;
        Ok((spot, path))
    }
}

#[cfg(test)]
mod tests {
    use hideout_core::{ObstacleSet, Point};
    use hideout_paths::{GridConfig, PathError};

    use super::*;

    fn world(rows: &[&str]) -> (Grid, ObstacleSet) {
        let w = rows[0].len() as i32;
        let h = rows.len() as i32;
        let obstacles = ObstacleSet::from_ascii(rows, 1.0, Vec3::ZERO);
        let grid = Grid::new(GridConfig::new(w, h, 1.0), &obstacles).unwrap();
        (grid, obstacles)
    }

    fn pos(g: &Grid, id: NodeId) -> Point {
        g.node(id).pos()
    }

    const WALL: [&str; 5] = [
        ".......", //
        "...#...",
        "...#...",
        "...#...",
        ".......",
    ];

    #[test]
    fn single_occluded_neighbor_is_chosen() {
        let (g, obstacles) = world(&[".#."]);
        let sel = HideSpotSelector::new(&g, &obstacles);
        let threat = Vec3::ground(-5.0, 0.0);
        let spot = sel.find_hiding_node(threat, Vec3::ground(0.0, 0.0)).unwrap();
        assert_eq!(pos(&g, spot), Point::new(2, 0));
    }

    #[test]
    fn no_occluded_neighbor_is_an_error() {
        let (g, obstacles) = world(&[".#."]);
        let sel = HideSpotSelector::new(&g, &obstacles);
        let threat = Vec3::ground(1.0, 5.0);
        assert_eq!(
            sel.find_hiding_node(threat, Vec3::ZERO),
            Err(HideError::NoHidingSpotFound)
        );
    }

    #[test]
    fn no_obstacles_means_no_candidates() {
        let (g, obstacles) = world(&["...", "..."]);
        let sel = HideSpotSelector::new(&g, &obstacles);
        assert!(sel.candidates().is_empty());
        assert_eq!(
            sel.find_hiding_node(Vec3::ZERO, Vec3::ZERO),
            Err(HideError::NoHidingSpotFound)
        );
    }

    #[test]
    fn candidates_are_walkable_obstacle_neighbors_listed_once() {
        let (g, obstacles) = world(&WALL);
        let sel = HideSpotSelector::new(&g, &obstacles);
        let cands = sel.candidates();
        // Columns 2 and 4 for rows 0..=4, plus (3, 0) and (3, 4).
        assert_eq!(cands.len(), 12);
        let mut sorted = cands.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), cands.len());
        for id in cands {
            let node = g.node(id);
            assert!(node.is_walkable());
            assert!(g.nearest_nodes(id, false).iter().any(|&n| !g.node(n).is_walkable()));
        }
    }

    #[test]
    fn hidden_nodes_are_ranked_by_distance() {
        let (g, obstacles) = world(&WALL);
        let sel = HideSpotSelector::new(&g, &obstacles);
        let threat = Vec3::ground(0.0, 2.0);
        let ranked: Vec<_> = sel
            .hidden_nodes(threat, Vec3::ground(6.0, 4.0))
            .into_iter()
            .map(|id| pos(&g, id))
            .collect();
        assert_eq!(
            ranked,
            vec![
                Point::new(4, 4),
                Point::new(4, 3),
                Point::new(4, 2),
                Point::new(4, 1),
                Point::new(4, 0),
            ]
        );
    }

    #[test]
    fn plan_escape_ends_on_the_spot() {
        let (g, obstacles) = world(&WALL);
        let sel = HideSpotSelector::new(&g, &obstacles);
        let mut finder = PathFinder::new();
        let (spot, path) = sel
            .plan_escape(&mut finder, Vec3::ground(0.0, 2.0), Vec3::ground(6.0, 4.0))
            .unwrap();
        assert_eq!(pos(&g, spot), Point::new(4, 4));
        assert_eq!(path.goal(), spot);
        assert_eq!(
            path.points(&g),
            vec![Point::new(6, 4), Point::new(5, 4), Point::new(4, 4)]
        );
    }

    #[test]
    fn plan_escape_reports_unreachable_spot() {
        // The only hiding spot sits in a sealed pocket on the right.
        let (g, obstacles) = world(&[
            "..#..", //
            "..#..",
            "..#..",
        ]);
        let sel = HideSpotSelector::new(&g, &obstacles);
        let mut finder = PathFinder::new();
        let err = sel
            .plan_escape(&mut finder, Vec3::ground(-3.0, 1.0), Vec3::ground(0.0, 1.0))
            .unwrap_err();
        assert!(matches!(err, HideError::Path(PathError::NoPathFound { .. })));
    }
}
