//! Tile addressing in the slippy-map grid.
//!
//! A mosaic at zoom level `z` is a square grid of `2^z × 2^z` tiles.
//! `TileCoord` identifies one tile by column (west to east), row (north to
//! south) and zoom level.

/// Maximum zoom level accepted by the mosaic builder.
///
/// The public OpenStreetMap tile servers stop at zoom 19; higher values
/// would also overflow the raster dimensions long before that matters.
pub const MAX_ZOOM: u8 = 19;

/// Number of tiles along one axis of the grid at the given zoom level.
///
/// Zoom 0 is a single tile; each level doubles both axes.
pub fn grid_len(zoom: u8) -> u32 {
    1u32 << zoom
}

/// Coordinates of one tile within a zoom level's grid.
///
/// Column and row are unsigned indices in `[0, 2^zoom)`. The pair maps
/// deterministically to a tile URL via [`crate::provider::UrlTemplate`]
/// and to a pixel offset within the mosaic raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    /// Tile column (X, increases eastward).
    col: u32,
    /// Tile row (Y, increases southward).
    row: u32,
    /// Zoom level.
    zoom: u8,
}

impl TileCoord {
    /// Create a new tile coordinate.
    pub fn new(col: u32, row: u32, zoom: u8) -> Self {
        Self { col, row, zoom }
    }

    /// Get the tile column.
    pub fn col(&self) -> u32 {
        self.col
    }

    /// Get the tile row.
    pub fn row(&self) -> u32 {
        self.row
    }

    /// Get the zoom level.
    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    /// Iterate over every tile of the grid at `zoom`, column-major.
    ///
    /// The column is the outer loop and the row the inner one; this is
    /// also the order of the deterministic final sweep performed by the
    /// mosaic builder.
    pub fn grid(zoom: u8) -> impl Iterator<Item = TileCoord> {
        let len = grid_len(zoom);
        (0..len).flat_map(move |col| (0..len).map(move |row| TileCoord::new(col, row, zoom)))
    }

    /// Flat index of this tile within the column-major grid of its zoom.
    pub fn grid_index(&self) -> usize {
        (self.col as usize) * (grid_len(self.zoom) as usize) + self.row as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_len_doubles_per_level() {
        assert_eq!(grid_len(0), 1);
        assert_eq!(grid_len(1), 2);
        assert_eq!(grid_len(5), 32);
    }

    #[test]
    fn test_accessors() {
        let coord = TileCoord::new(3, 7, 4);
        assert_eq!(coord.col(), 3);
        assert_eq!(coord.row(), 7);
        assert_eq!(coord.zoom(), 4);
    }

    #[test]
    fn test_grid_zoom_zero_is_single_tile() {
        let tiles: Vec<_> = TileCoord::grid(0).collect();
        assert_eq!(tiles, vec![TileCoord::new(0, 0, 0)]);
    }

    #[test]
    fn test_grid_is_column_major() {
        let tiles: Vec<_> = TileCoord::grid(1).collect();
        assert_eq!(
            tiles,
            vec![
                TileCoord::new(0, 0, 1),
                TileCoord::new(0, 1, 1),
                TileCoord::new(1, 0, 1),
                TileCoord::new(1, 1, 1),
            ]
        );
    }

    #[test]
    fn test_grid_covers_full_square() {
        let count = TileCoord::grid(3).count();
        assert_eq!(count, 64);
    }

    #[test]
    fn test_grid_index_matches_iteration_order() {
        for (i, coord) in TileCoord::grid(2).enumerate() {
            assert_eq!(coord.grid_index(), i);
        }
    }

    #[test]
    fn test_hash_and_eq() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(TileCoord::new(1, 2, 3));
        set.insert(TileCoord::new(1, 2, 3));
        set.insert(TileCoord::new(2, 1, 3));
        assert_eq!(set.len(), 2);
    }
}
