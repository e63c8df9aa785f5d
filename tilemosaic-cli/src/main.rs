//! TileMosaic CLI.
//!
//! Builds one composite raster for a zoom level and writes it to a PNG
//! file, with a progress bar driven by the library's throttled notifier.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use tilemosaic::cache::{MemoryCache, TileCache};
use tilemosaic::config::MosaicConfig;
use tilemosaic::fetch::TileFetcher;
use tilemosaic::gate::FetchGate;
use tilemosaic::logging::init_logging;
use tilemosaic::mosaic::MosaicBuilder;
use tilemosaic::provider::{ReqwestClient, UrlTemplate};

/// Stream map tiles into a single composite raster image.
#[derive(Debug, Parser)]
#[command(name = "tilemosaic", version = tilemosaic::VERSION)]
struct Cli {
    /// Zoom level to assemble (grid is 2^zoom by 2^zoom tiles).
    #[arg(short, long, default_value_t = 2)]
    zoom: u8,

    /// Output PNG path.
    #[arg(short, long, default_value = "mosaic.png")]
    output: PathBuf,

    /// Maximum simultaneous tile downloads.
    #[arg(long, default_value_t = 3)]
    capacity: usize,

    /// Minimum milliseconds between progress updates.
    #[arg(long, default_value_t = 250)]
    interval_ms: u64,

    /// Tile server URL template with {z}/{x}/{y} placeholders.
    #[arg(long)]
    template: Option<String>,

    /// Bound the in-memory tile cache to this many megabytes.
    #[arg(long)]
    cache_mb: Option<u64>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let _logging = match init_logging("logs", "tilemosaic.log") {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("failed to initialize logging: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = run(cli).await {
        tracing::error!("{e}");
        eprintln!("error: {e}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = MosaicConfig::default()
        .with_gate_capacity(cli.capacity)
        .with_notify_interval(Duration::from_millis(cli.interval_ms));
    if let Some(template) = &cli.template {
        config = config.with_template(UrlTemplate::new(template));
    }

    let cache: Arc<dyn TileCache> = match cli.cache_mb {
        Some(mb) => Arc::new(MemoryCache::bounded(mb * 1024 * 1024)),
        None => Arc::new(MemoryCache::unbounded()),
    };

    let client = ReqwestClient::new()?;
    let gate = Arc::new(FetchGate::new(config.gate_capacity));
    let fetcher = Arc::new(TileFetcher::new(client, cache, gate));

    let tile_count = 1u64 << (2 * cli.zoom as u64);
    let bar = ProgressBar::new(tile_count);
    bar.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} tiles ({elapsed})")
            .expect("valid progress template"),
    );

    let progress = bar.clone();
    let builder = MosaicBuilder::new(fetcher, config.template.clone(), config.tile_size)
        .on_progress(config.notify_interval, move |frame| {
            progress.set_position(frame.completed as u64);
        });

    let raster = builder.build(cli.zoom).await?;
    bar.finish_with_message("done");

    raster.save_with_format(&cli.output, image::ImageFormat::Png)?;
    tracing::info!(path = %cli.output.display(), "Wrote mosaic");
    println!("wrote {}", cli.output.display());

    Ok(())
}
