use hideout_core::{LayerMask, Vec3};

use crate::error::PathError;

/// How [`Grid::node_from_world_point`](crate::Grid::node_from_world_point)
/// turns a world position into a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CellMapping {
    /// Normalize each axis as `local / cells * cell_size`, clamp to `[0, 1]`
    /// and scale back by the cell count. Only exact when `cell_size == 1`;
    /// kept as the default because existing scenes were tuned against it.
    #[default]
    Normalized,
    /// Round `local / cell_size` to the closest cell center.
    Nearest,
}

/// Construction parameters for a [`Grid`](crate::Grid).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridConfig {
    /// Number of columns (world x).
    pub width: i32,
    /// Number of rows (world z).
    pub height: i32,
    /// Edge length of one cell in world units.
    pub cell_size: f32,
    /// World position of the center of cell `(0, 0)`.
    pub origin: Vec3,
    /// Obstacle layers considered for walkability and line of sight.
    pub layers: LayerMask,
    pub mapping: CellMapping,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 30,
            height: 30,
            cell_size: 2.0,
            origin: Vec3::ZERO,
            layers: LayerMask::ALL,
            mapping: CellMapping::Normalized,
        }
    }
}

impl GridConfig {
    pub fn new(width: i32, height: i32, cell_size: f32) -> Self {
        Self {
            width,
            height,
            cell_size,
            ..Self::default()
        }
    }

    pub fn with_origin(mut self, origin: Vec3) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_layers(mut self, layers: LayerMask) -> Self {
        self.layers = layers;
        self
    }

    pub fn with_mapping(mut self, mapping: CellMapping) -> Self {
        self.mapping = mapping;
        self
    }

    /// Reject non-positive dimensions and non-positive or non-finite cell
    /// sizes.
    pub fn validate(&self) -> Result<(), PathError> {
        let size_ok = self.cell_size.is_finite() && self.cell_size > 0.0;
        if self.width <= 0 || self.height <= 0 || !size_ok {
            return Err(PathError::InvalidGridConfig {
                width: self.width,
                height: self.height,
                cell_size: self.cell_size,
            });
        }
        Ok(())
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn partial_config_uses_defaults() {
        let c: GridConfig = serde_json::from_str(r#"{"width": 8, "mapping": "nearest"}"#).unwrap();
        assert_eq!(c.width, 8);
        assert_eq!(c.height, 30);
        assert_eq!(c.mapping, CellMapping::Nearest);
    }
}
