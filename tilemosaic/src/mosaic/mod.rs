//! Progressive mosaic assembly.
//!
//! A mosaic build fetches every tile of a zoom level concurrently and
//! blits each one into a shared raster buffer as it arrives, signaling a
//! throttled progress notifier along the way. Once all tiles have
//! resolved, every tile is redrawn once more in grid order so the final
//! image is deterministic regardless of completion order. A single failed
//! tile aborts the whole build.

mod builder;
mod error;

pub use builder::{MosaicBuilder, ProgressFrame};
pub use error::BuildError;
