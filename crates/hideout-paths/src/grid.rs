//! Grid generation and world ↔ cell mapping.

use hideout_core::{LayerMask, OverlapOracle, Point, Range, Vec3};

use crate::config::{CellMapping, GridConfig};
use crate::error::PathError;
use crate::node::{Node, NodeId};
use crate::pathfinder::{Path, PathFinder};

/// The navigable world: a `width × height` arena of [`Node`]s.
///
/// Nodes are stored column by column (`index = x * height + y`), the same
/// order they are generated in. Walkability and adjacency are fixed at
/// construction; obstacles that move afterwards are not picked up.
#[derive(Debug, Clone)]
pub struct Grid {
    config: GridConfig,
    nodes: Vec<Node>,
}

impl Grid {
    /// Generate a grid, asking `oracle` once per cell whether a box the size
    /// of the cell is obstructed on the configured layers.
    pub fn new(config: GridConfig, oracle: &impl OverlapOracle) -> Result<Self, PathError> {
        config.validate()?;

        let (w, h) = (config.width, config.height);
        let half = Vec3::splat(config.cell_size / 2.0);
        let mut grid = Self {
            config,
            nodes: Vec::with_capacity(w as usize * h as usize),
        };

        let mut links = 0usize;
        for x in 0..w {
            for y in 0..h {
                let pos = Point::new(x, y);
                let world = grid.cell_center(pos);
                let walkable = !oracle.overlaps_box(world, half, config.layers);
                let id = NodeId(grid.nodes.len());
                grid.nodes.push(Node::new(pos, world, walkable));

                // Only link to cells that already exist; later cells link
                // back to this one when they are created.
                let earlier = [
                    (x > 0).then(|| Point::new(x - 1, y)),
                    (y > 0).then(|| Point::new(x, y - 1)),
                    (x > 0 && y > 0).then(|| Point::new(x - 1, y - 1)),
                    (x > 0 && y + 1 < h).then(|| Point::new(x - 1, y + 1)),
                ];
                for other in earlier.into_iter().flatten() {
                    let other = grid.id_unchecked(other);
                    grid.link(id, other);
                    links += 1;
                }
            }
        }

        log::debug!(
            "generated {}x{} grid: {} walkable cells, {} links",
            w,
            h,
            grid.nodes.iter().filter(|n| n.walkable).count(),
            links
        );
        Ok(grid)
    }

    fn link(&mut self, a: NodeId, b: NodeId) {
        self.nodes[a.0].neighbors.push(b);
        self.nodes[b.0].neighbors.push(a);
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    #[inline]
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.config.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.config.height
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.config.cell_size
    }

    #[inline]
    pub fn layers(&self) -> LayerMask {
        self.config.layers
    }

    /// The grid rectangle `[0, width) × [0, height)`.
    #[inline]
    pub fn bounds(&self) -> Range {
        Range::new(0, 0, self.width(), self.height())
    }

    /// Number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The node behind `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was produced by a larger grid.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// All nodes in generation order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// The node at grid coordinates `p`, or `None` if out of bounds.
    #[inline]
    pub fn node_at(&self, p: Point) -> Option<NodeId> {
        self.bounds().contains(p).then(|| self.id_unchecked(p))
    }

    #[inline]
    pub(crate) fn id_unchecked(&self, p: Point) -> NodeId {
        NodeId((p.x * self.height() + p.y) as usize)
    }

    // -----------------------------------------------------------------------
    // World mapping
    // -----------------------------------------------------------------------

    /// World-space center of grid cell `p`.
    #[inline]
    pub fn cell_center(&self, p: Point) -> Vec3 {
        let c = self.config.cell_size;
        self.config.origin + Vec3::ground(p.x as f32 * c, p.y as f32 * c)
    }

    /// Whether `world` lies on the grid's footprint (the union of all cell
    /// squares). Positions outside still map to a cell, see
    /// [`node_from_world_point`](Self::node_from_world_point).
    pub fn contains_world(&self, world: Vec3) -> bool {
        let c = self.config.cell_size;
        let local = world - self.config.origin;
        let fx = local.x / c + 0.5;
        let fz = local.z / c + 0.5;
        (0.0..self.width() as f32).contains(&fx) && (0.0..self.height() as f32).contains(&fz)
    }

    /// Map a world position to a cell. Never fails: positions off the grid
    /// collapse onto the nearest edge cell.
    ///
    /// With the default [`CellMapping::Normalized`] the result is only exact
    /// for a cell size of 1.
    pub fn node_from_world_point(&self, world: Vec3) -> NodeId {
        let (w, h) = (self.width(), self.height());
        let c = self.config.cell_size;
        let local = world - self.config.origin;

        let (x, y) = match self.config.mapping {
            CellMapping::Normalized => {
                let px = (local.x / w as f32 * c).clamp(0.0, 1.0);
                let py = (local.z / h as f32 * c).clamp(0.0, 1.0);
                (
                    (px * w as f32).round_ties_even() as i32,
                    (py * h as f32).round_ties_even() as i32,
                )
            }
            CellMapping::Nearest => ((local.x / c).round() as i32, (local.z / c).round() as i32),
        };

        self.id_unchecked(Point::new(x.clamp(0, w - 1), y.clamp(0, h - 1)))
    }

    /// Run a one-off A* search between two world positions.
    ///
    /// Allocates a fresh [`PathFinder`]; keep one around for repeated
    /// queries.
    pub fn find_path(&self, start: Vec3, end: Vec3) -> Result<Path, PathError> {
        PathFinder::new().find_path(self, start, end)
    }
}
