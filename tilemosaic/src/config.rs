//! Mosaic configuration.
//!
//! `MosaicConfig` gathers the knobs of the streaming core in one place so
//! embedders and the CLI configure everything consistently.

use std::time::Duration;

use crate::provider::UrlTemplate;

/// Pixel size of a standard OpenStreetMap tile.
pub const DEFAULT_TILE_SIZE: u32 = 256;

/// Default number of simultaneous outbound fetches.
///
/// Matches the admission limit public tile servers tolerate comfortably.
pub const DEFAULT_GATE_CAPACITY: usize = 3;

/// Default minimum interval between progress callbacks.
pub const DEFAULT_NOTIFY_INTERVAL: Duration = Duration::from_millis(250);

/// Configuration for the tile-streaming core.
#[derive(Debug, Clone)]
pub struct MosaicConfig {
    /// Edge length of one tile in pixels.
    pub tile_size: u32,

    /// Capacity of the fetch admission gate.
    pub gate_capacity: usize,

    /// Minimum interval between progress notifications.
    pub notify_interval: Duration,

    /// Tile server URL template.
    pub template: UrlTemplate,
}

impl Default for MosaicConfig {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            gate_capacity: DEFAULT_GATE_CAPACITY,
            notify_interval: DEFAULT_NOTIFY_INTERVAL,
            template: UrlTemplate::openstreetmap(),
        }
    }
}

impl MosaicConfig {
    /// Set the gate capacity.
    pub fn with_gate_capacity(mut self, capacity: usize) -> Self {
        self.gate_capacity = capacity;
        self
    }

    /// Set the tile size in pixels.
    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size;
        self
    }

    /// Set the progress notification interval.
    pub fn with_notify_interval(mut self, interval: Duration) -> Self {
        self.notify_interval = interval;
        self
    }

    /// Set the tile server template.
    pub fn with_template(mut self, template: UrlTemplate) -> Self {
        self.template = template;
        self
    }
}
