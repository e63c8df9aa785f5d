//! Mosaic build error types.

use thiserror::Error;

use crate::coord::MAX_ZOOM;
use crate::fetch::FetchError;

/// Errors that can occur while building a mosaic.
#[derive(Debug, Error)]
pub enum BuildError {
    /// One tile failed to fetch or decode; the build is abandoned.
    ///
    /// Tiles drawn before the failure remain in the raster buffer that
    /// progress frames exposed; no final sweep is performed.
    #[error("tile ({col}, {row}) at zoom {zoom} failed")]
    Tile {
        /// Column of the failing tile.
        col: u32,
        /// Row of the failing tile.
        row: u32,
        /// Zoom level of the build.
        zoom: u8,
        /// The underlying fetch failure.
        #[source]
        source: FetchError,
    },

    /// The requested zoom level exceeds what tile servers provide.
    #[error("unsupported zoom level {0} (max {MAX_ZOOM})")]
    UnsupportedZoom(u8),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::HttpError;

    #[test]
    fn test_tile_error_reports_coordinates() {
        let err = BuildError::Tile {
            col: 1,
            row: 0,
            zoom: 1,
            source: FetchError::Network(HttpError::Request("refused".to_string())),
        };
        assert_eq!(err.to_string(), "tile (1, 0) at zoom 1 failed");
    }

    #[test]
    fn test_tile_error_exposes_source() {
        use std::error::Error;

        let err = BuildError::Tile {
            col: 0,
            row: 0,
            zoom: 0,
            source: FetchError::Decode("bad magic".to_string()),
        };
        assert!(err.source().unwrap().to_string().contains("bad magic"));
    }

    #[test]
    fn test_unsupported_zoom_display() {
        let err = BuildError::UnsupportedZoom(25);
        assert_eq!(err.to_string(), "unsupported zoom level 25 (max 19)");
    }
}
