//! Scenario files for the demo.
//!
//! A scenario is a TOML document describing the grid, the obstacles, where
//! the threat stands and where the agent starts. Every field is optional;
//! missing ones fall back to the built-in scenario.

use std::path::Path;

use anyhow::Context;
use hideout_ai::AgentConfig;
use hideout_core::{ObstacleSet, OverlapOracle, Vec3};
use hideout_paths::{CellMapping, Grid, GridConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand::seq::IndexedRandom;
use serde::Deserialize;

/// Random blocks dropped on free cells, each on a different cell. Fewer
/// than `count` land when the map runs out of free cells.
#[derive(Clone, Debug, Deserialize)]
pub struct Scatter {
    pub count: usize,
    #[serde(default)]
    pub seed: u64,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub grid: GridConfig,
    pub agent: AgentConfig,
    /// Rows of the map, `#` marking a block. Row `i` is grid row `i`.
    pub map: Vec<String>,
    /// Extra boxes in world space.
    pub obstacles: ObstacleSet,
    pub scatter: Option<Scatter>,
    pub threat: Vec3,
    pub start: Vec3,
    pub frames: u32,
    pub frame_ms: u64,
}

impl Default for Scenario {
    fn default() -> Self {
        let map = [
            "..............",
            "..............",
            "....######....",
            "..............",
            "..........#...",
            "..........#...",
            "..........#...",
            "..............",
        ];
        Self {
            grid: GridConfig::new(14, 8, 2.0).with_mapping(CellMapping::Nearest),
            agent: AgentConfig {
                speed: 4.0,
                ..AgentConfig::default()
            },
            map: map.iter().map(|r| r.to_string()).collect(),
            obstacles: ObstacleSet::new(),
            scatter: None,
            threat: Vec3::ground(2.0, 12.0),
            start: Vec3::ground(10.0, 12.0),
            frames: 120,
            frame_ms: 100,
        }
    }
}

impl Scenario {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        let scenario: Scenario = toml::from_str(&text)
            .with_context(|| format!("parsing scenario {}", path.display()))?;
        Ok(scenario)
    }

    /// Collect every obstacle the scenario describes and build the grid.
    pub fn build(&self) -> anyhow::Result<(Grid, ObstacleSet)> {
        self.grid.validate()?;
        let rows: Vec<&str> = self.map.iter().map(String::as_str).collect();
        let mut obstacles =
            ObstacleSet::from_ascii(&rows, self.grid.cell_size, self.grid.origin);
        for aabb in self.obstacles.iter() {
            obstacles.push(*aabb);
        }

        if let Some(scatter) = &self.scatter {
            let c = self.grid.cell_size;
            let half = Vec3::splat(c * 0.5);
            let free: Vec<Vec3> = (0..self.grid.width)
                .flat_map(|x| (0..self.grid.height).map(move |y| (x, y)))
                .map(|(x, y)| self.grid.origin + Vec3::ground(x as f32 * c, y as f32 * c))
                .filter(|&center| !obstacles.overlaps_box(center, half, self.grid.layers))
                .collect();

            let mut rng = StdRng::seed_from_u64(scatter.seed);
            let picked: Vec<Vec3> = free
                .choose_multiple(&mut rng, scatter.count)
                .copied()
                .collect();
            for &center in &picked {
                obstacles.push_block(center, c);
            }
            log::info!(
                "scattered {} of {} blocks (seed {})",
                picked.len(),
                scatter.count,
                scatter.seed
            );
        }

        let grid = Grid::new(self.grid, &obstacles)?;
        Ok((grid, obstacles))
    }
}

#[cfg(test)]
mod tests {
    use hideout_core::Point;

    use super::*;

    #[test]
    fn built_in_scenario_builds() {
        let (grid, obstacles) = Scenario::default().build().unwrap();
        assert_eq!(grid.len(), 14 * 8);
        assert_eq!(obstacles.len(), 9);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let s: Scenario = toml::from_str(
            r##"
            frames = 10
            map = ["..#", "..."]

            [grid]
            width = 3
            height = 2
            cell_size = 1.0

            [threat]
            x = 0.0
            y = 0.0
            z = 0.0
            "##,
        )
        .unwrap();
        assert_eq!(s.frames, 10);
        assert_eq!(s.frame_ms, 100);
        assert_eq!(s.agent.check_interval_ms, 500);
        let (grid, _) = s.build().unwrap();
        assert!(!grid.node(grid.node_at(Point::new(2, 0)).unwrap()).is_walkable());
    }

    #[test]
    fn scatter_is_seeded() {
        let s = Scenario {
            map: Vec::new(),
            scatter: Some(Scatter { count: 12, seed: 3 }),
            ..Scenario::default()
        };
        let blocked = |g: &Grid| -> Vec<_> {
            g.nodes()
                .filter(|(_, n)| !n.is_walkable())
                .map(|(id, _)| id)
                .collect()
        };
        let (a, _) = s.build().unwrap();
        let (b, _) = s.build().unwrap();
        assert_eq!(blocked(&a), blocked(&b));
        assert_eq!(blocked(&a).len(), 12);
    }

    #[test]
    fn scatter_only_uses_free_cells() {
        let s = Scenario {
            scatter: Some(Scatter { count: 40, seed: 9 }),
            ..Scenario::default()
        };
        let (grid, obstacles) = s.build().unwrap();
        // 9 map blocks, and every scattered block lands on its own free cell.
        assert_eq!(obstacles.len(), 9 + 40);
        let blocked = grid.nodes().filter(|(_, n)| !n.is_walkable()).count();
        assert_eq!(blocked, 9 + 40);
    }

    #[test]
    fn scatter_stops_when_the_map_is_full() {
        let s: Scenario = toml::from_str(
            r##"
            map = ["#..", "..."]

            [grid]
            width = 3
            height = 2
            cell_size = 1.0

            [scatter]
            count = 10
            "##,
        )
        .unwrap();
        let (grid, obstacles) = s.build().unwrap();
        assert_eq!(obstacles.len(), 6);
        assert!(grid.nodes().all(|(_, n)| !n.is_walkable()));
    }

    #[test]
    fn bad_grid_is_rejected() {
        let s: Scenario = toml::from_str("[grid]\nwidth = 0\n").unwrap();
        assert!(s.build().is_err());
    }
}
