//! TileMosaic - progressive map tile compositing
//!
//! This library streams a large raster image assembled from many small
//! remote map tiles. Outbound fetches pass through a bounded admission
//! gate, responses are served from a pluggable cache where possible, and
//! progress callbacks are rate-limited so consumers are not overwhelmed
//! by partial updates.
//!
//! # High-Level API
//!
//! ```ignore
//! use std::sync::Arc;
//! use tilemosaic::cache::MemoryCache;
//! use tilemosaic::config::MosaicConfig;
//! use tilemosaic::fetch::TileFetcher;
//! use tilemosaic::gate::FetchGate;
//! use tilemosaic::mosaic::MosaicBuilder;
//! use tilemosaic::provider::ReqwestClient;
//!
//! let config = MosaicConfig::default();
//! let client = ReqwestClient::new()?;
//! let cache = Arc::new(MemoryCache::unbounded());
//! let gate = Arc::new(FetchGate::new(config.gate_capacity));
//!
//! let fetcher = Arc::new(TileFetcher::new(client, cache, gate));
//! let builder = MosaicBuilder::new(fetcher, config.template.clone(), config.tile_size);
//!
//! let raster = builder.build(2).await?;
//! ```

pub mod cache;
pub mod config;
pub mod coord;
pub mod fetch;
pub mod gate;
pub mod logging;
pub mod mosaic;
pub mod notify;
pub mod provider;

/// Version of the TileMosaic library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
