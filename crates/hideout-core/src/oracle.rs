//! Obstacle oracles.
//!
//! Navigation never inspects world geometry directly. Walkability is
//! decided once per cell through an [`OverlapOracle`], and visibility is
//! decided per query through a [`SightOracle`]. Any physics backend can
//! implement these; [`ObstacleSet`] is a plain list of axis-aligned boxes
//! implementing both.

use crate::world::Vec3;

/// Bit mask selecting which obstacle layers a query considers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(u32::MAX);

    /// Mask containing only layer `index` (0..32).
    #[inline]
    pub const fn layer(index: u32) -> Self {
        Self(1 << index)
    }

    /// Whether the two masks share at least one layer.
    #[inline]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::ALL
    }
}

/// Box-overlap test used to decide walkability at grid construction.
pub trait OverlapOracle {
    /// Whether any obstacle on `layers` overlaps the axis-aligned box
    /// centered at `center` with the given half extents.
    fn overlaps_box(&self, center: Vec3, half_extents: Vec3, layers: LayerMask) -> bool;
}

/// Line-of-sight test used by visibility queries.
pub trait SightOracle {
    /// Whether an obstacle on `layers` blocks the segment from `from` to
    /// `to`. Obstacles that contain `from` are not reported.
    fn ray_blocked(&self, from: Vec3, to: Vec3, layers: LayerMask) -> bool;
}

impl<T: OverlapOracle + ?Sized> OverlapOracle for &T {
    fn overlaps_box(&self, center: Vec3, half_extents: Vec3, layers: LayerMask) -> bool {
        (**self).overlaps_box(center, half_extents, layers)
    }
}

impl<T: SightOracle + ?Sized> SightOracle for &T {
    fn ray_blocked(&self, from: Vec3, to: Vec3, layers: LayerMask) -> bool {
        (**self).ray_blocked(from, to, layers)
    }
}

// ---------------------------------------------------------------------------
// Aabb
// ---------------------------------------------------------------------------

/// An axis-aligned obstacle box on one or more layers.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
    #[cfg_attr(feature = "serde", serde(default))]
    pub layers: LayerMask,
}

impl Aabb {
    /// Box spanning the two corners, on every layer.
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: Vec3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Vec3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
            layers: LayerMask::ALL,
        }
    }

    pub fn from_center(center: Vec3, half_extents: Vec3) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    /// Restrict the box to the given layers.
    pub fn on_layers(mut self, layers: LayerMask) -> Self {
        self.layers = layers;
        self
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Strict overlap: boxes that only touch do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    /// Parametric entry point `t` in `[0, 1]` of the segment `from → to`
    /// into the box, or `None` if the segment misses it, only grazes it, or
    /// starts inside it.
    pub fn segment_entry(&self, from: Vec3, to: Vec3) -> Option<f32> {
        let dir = to - from;
        let mut t_enter = f32::NEG_INFINITY;
        let mut t_exit = f32::INFINITY;

        for (o, d, lo, hi) in [
            (from.x, dir.x, self.min.x, self.max.x),
            (from.y, dir.y, self.min.y, self.max.y),
            (from.z, dir.z, self.min.z, self.max.z),
        ] {
            if d == 0.0 {
                if o <= lo || o >= hi {
                    return None;
                }
                continue;
            }
            let (mut a, mut b) = ((lo - o) / d, (hi - o) / d);
            if a > b {
                std::mem::swap(&mut a, &mut b);
            }
            t_enter = t_enter.max(a);
            t_exit = t_exit.min(b);
        }

        if t_enter < t_exit && (0.0..=1.0).contains(&t_enter) {
            Some(t_enter)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// ObstacleSet
// ---------------------------------------------------------------------------

/// A flat list of obstacle boxes implementing both oracles.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ObstacleSet {
    boxes: Vec<Aabb>,
}

impl ObstacleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, aabb: Aabb) {
        self.boxes.push(aabb);
    }

    /// Add a box of horizontal size `size` centered on a ground point,
    /// one unit tall on either side of the ground plane.
    pub fn push_block(&mut self, center: Vec3, size: f32) {
        let h = size * 0.5;
        self.push(Aabb::from_center(center, Vec3::new(h, 1.0, h)));
    }

    /// Build a set from an ASCII map. Each line is one grid row `y` (world
    /// `z`), each character one column `x`; `#` places a block of size
    /// `cell_size` centered on `origin + (x*cell_size, 0, y*cell_size)`.
    pub fn from_ascii(rows: &[&str], cell_size: f32, origin: Vec3) -> Self {
        let mut set = Self::new();
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if ch == '#' {
                    let offset = Vec3::ground(x as f32 * cell_size, y as f32 * cell_size);
                    set.push_block(origin + offset, cell_size);
                }
            }
        }
        set
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Aabb> + '_ {
        self.boxes.iter()
    }

    fn on(&self, layers: LayerMask) -> impl Iterator<Item = &Aabb> + '_ {
        self.boxes.iter().filter(move |b| b.layers.intersects(layers))
    }
}

impl FromIterator<Aabb> for ObstacleSet {
    fn from_iter<I: IntoIterator<Item = Aabb>>(iter: I) -> Self {
        Self {
            boxes: iter.into_iter().collect(),
        }
    }
}

impl OverlapOracle for ObstacleSet {
    fn overlaps_box(&self, center: Vec3, half_extents: Vec3, layers: LayerMask) -> bool {
        let probe = Aabb::from_center(center, half_extents);
        self.on(layers).any(|b| b.overlaps(&probe))
    }
}

impl SightOracle for ObstacleSet {
    fn ray_blocked(&self, from: Vec3, to: Vec3, layers: LayerMask) -> bool {
        self.on(layers).any(|b| b.segment_entry(from, to).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_block(x: f32, z: f32) -> ObstacleSet {
        let mut set = ObstacleSet::new();
        set.push_block(Vec3::ground(x, z), 1.0);
        set
    }

    #[test]
    fn ascii_map_places_blocks() {
        let set = ObstacleSet::from_ascii(&["..#", "#.."], 2.0, Vec3::ZERO);
        assert_eq!(set.len(), 2);
        let centers: Vec<_> = set.iter().map(Aabb::center).collect();
        assert_eq!(centers, vec![Vec3::ground(4.0, 0.0), Vec3::ground(0.0, 2.0)]);
    }

    #[test]
    fn layer_mask_intersection() {
        assert!(LayerMask::ALL.intersects(LayerMask::layer(3)));
        assert!(!LayerMask::layer(1).intersects(LayerMask::layer(2)));
        assert!(!LayerMask::NONE.intersects(LayerMask::ALL));
    }

    #[test]
    fn touching_boxes_do_not_overlap() {
        let set = unit_block(1.0, 1.0);
        let half = Vec3::splat(0.5);
        assert!(set.overlaps_box(Vec3::ground(1.0, 1.0), half, LayerMask::ALL));
        assert!(!set.overlaps_box(Vec3::ground(2.0, 1.0), half, LayerMask::ALL));
        assert!(!set.overlaps_box(Vec3::ground(2.0, 2.0), half, LayerMask::ALL));
    }

    #[test]
    fn overlap_respects_layers() {
        let mut set = ObstacleSet::new();
        set.push(Aabb::from_center(Vec3::ZERO, Vec3::ONE).on_layers(LayerMask::layer(4)));
        let half = Vec3::splat(0.5);
        assert!(set.overlaps_box(Vec3::ZERO, half, LayerMask::layer(4)));
        assert!(!set.overlaps_box(Vec3::ZERO, half, LayerMask::layer(0)));
    }

    #[test]
    fn ray_through_box_is_blocked() {
        let set = unit_block(2.0, 0.0);
        let from = Vec3::ground(0.0, 0.0);
        let to = Vec3::ground(4.0, 0.0);
        assert!(set.ray_blocked(from, to, LayerMask::ALL));
        assert!(set.ray_blocked(to, from, LayerMask::ALL));
    }

    #[test]
    fn ray_stopping_short_is_clear() {
        let set = unit_block(2.0, 0.0);
        let from = Vec3::ground(0.0, 0.0);
        assert!(!set.ray_blocked(from, Vec3::ground(1.0, 0.0), LayerMask::ALL));
    }

    #[test]
    fn ray_passing_beside_is_clear() {
        let set = unit_block(2.0, 0.0);
        let from = Vec3::ground(0.0, 1.0);
        let to = Vec3::ground(4.0, 1.0);
        assert!(!set.ray_blocked(from, to, LayerMask::ALL));
    }

    #[test]
    fn ray_starting_inside_is_ignored() {
        let set = unit_block(0.0, 0.0);
        assert!(!set.ray_blocked(Vec3::ZERO, Vec3::ground(5.0, 0.0), LayerMask::ALL));
    }

    #[test]
    fn diagonal_ray_hits() {
        let set = unit_block(1.0, 1.0);
        let entry = set
            .iter()
            .next()
            .and_then(|b| b.segment_entry(Vec3::ground(0.0, 0.0), Vec3::ground(2.0, 2.0)));
        assert_eq!(entry, Some(0.25));
    }
}
