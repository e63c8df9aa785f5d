//! Mosaic build implementation.

use std::sync::Arc;
use std::time::Duration;

use image::{imageops, Rgba, RgbaImage};
use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::coord::{grid_len, TileCoord, MAX_ZOOM};
use crate::fetch::{FetchError, TileFetcher};
use crate::mosaic::BuildError;
use crate::notify::Throttle;
use crate::provider::{AsyncHttpClient, UrlTemplate};

/// One progress update from an in-flight build.
///
/// The frame shares the live raster buffer; consumers lock it and read
/// whatever has been drawn so far. Tiles land at fixed, disjoint offsets,
/// so an intermediate read is always a valid partial image.
#[derive(Clone)]
pub struct ProgressFrame {
    /// Tiles drawn so far.
    pub completed: usize,
    /// Total tiles in this build.
    pub total: usize,
    /// The shared raster buffer.
    pub buffer: Arc<Mutex<RgbaImage>>,
}

/// Assembles full-zoom-level mosaics from individually fetched tiles.
///
/// # Example
///
/// ```ignore
/// use tilemosaic::mosaic::MosaicBuilder;
///
/// let builder = MosaicBuilder::new(fetcher, UrlTemplate::openstreetmap(), 256)
///     .on_progress(Duration::from_millis(250), |frame| {
///         println!("{}/{} tiles", frame.completed, frame.total);
///     });
///
/// let raster = builder.build(2).await?;
/// ```
pub struct MosaicBuilder<C> {
    fetcher: Arc<TileFetcher<C>>,
    template: UrlTemplate,
    tile_size: u32,
    notifier: Option<Throttle<ProgressFrame>>,
}

impl<C: AsyncHttpClient + 'static> MosaicBuilder<C> {
    /// Creates a builder fetching `tile_size`-pixel tiles through the
    /// given fetcher, addressing them via `template`.
    pub fn new(fetcher: Arc<TileFetcher<C>>, template: UrlTemplate, tile_size: u32) -> Self {
        Self {
            fetcher,
            template,
            tile_size,
            notifier: None,
        }
    }

    /// The fetcher this builder requests tiles through.
    pub fn fetcher(&self) -> &Arc<TileFetcher<C>> {
        &self.fetcher
    }

    /// Installs a progress callback, throttled to fire at most once per
    /// `interval` (leading edge plus one coalesced trailing edge).
    pub fn on_progress(
        mut self,
        interval: Duration,
        callback: impl Fn(ProgressFrame) + Send + Sync + 'static,
    ) -> Self {
        self.notifier = Some(Throttle::new(interval, callback));
        self
    }

    /// Builds the complete mosaic for one zoom level.
    ///
    /// All `4^zoom` tile fetches are issued concurrently; each one is
    /// independently admitted by the shared gate. Completed tiles are
    /// drawn as they arrive and redrawn once more in grid order after the
    /// last one, which makes the returned image independent of completion
    /// order.
    ///
    /// On the first tile failure the build returns immediately with the
    /// failing coordinates. Remaining in-flight fetches run to completion
    /// and are discarded.
    pub async fn build(&self, zoom: u8) -> Result<RgbaImage, BuildError> {
        if zoom > MAX_ZOOM {
            return Err(BuildError::UnsupportedZoom(zoom));
        }

        let grid = grid_len(zoom);
        let total = (grid as usize) * (grid as usize);
        let side = self.tile_size * grid;

        tracing::info!(zoom, tiles = total, side, "Starting mosaic build");

        let canvas = Arc::new(Mutex::new(RgbaImage::from_pixel(
            side,
            side,
            Rgba([255, 255, 255, 255]),
        )));

        let (tx, mut rx) = mpsc::unbounded_channel::<(TileCoord, Result<RgbaImage, FetchError>)>();

        for coord in TileCoord::grid(zoom) {
            let fetcher = Arc::clone(&self.fetcher);
            let url = self.template.url_for(coord);
            let tx = tx.clone();

            tokio::spawn(async move {
                let result = fetcher.fetch_image(&url).await;
                // The receiver goes away when the build fails fast; late
                // results are simply discarded.
                let _ = tx.send((coord, result));
            });
        }
        drop(tx);

        let mut tiles: Vec<Option<RgbaImage>> = vec![None; total];
        let mut completed = 0usize;

        while completed < total {
            let (coord, result) = rx
                .recv()
                .await
                .expect("every tile task reports exactly once");

            let tile = result.map_err(|source| {
                tracing::warn!(
                    col = coord.col(),
                    row = coord.row(),
                    zoom,
                    "Tile fetch failed, abandoning build"
                );
                BuildError::Tile {
                    col: coord.col(),
                    row: coord.row(),
                    zoom,
                    source,
                }
            })?;

            self.blit(&canvas, &tile, coord);
            tiles[coord.grid_index()] = Some(tile);
            completed += 1;

            if let Some(notifier) = &self.notifier {
                notifier.call(ProgressFrame {
                    completed,
                    total,
                    buffer: Arc::clone(&canvas),
                });
            }
        }

        // Final sweep: redraw everything in grid order so the terminal
        // image does not depend on arrival order.
        for coord in TileCoord::grid(zoom) {
            if let Some(tile) = &tiles[coord.grid_index()] {
                self.blit(&canvas, tile, coord);
            }
        }

        tracing::info!(zoom, tiles = total, "Mosaic build complete");

        let image = match Arc::try_unwrap(canvas) {
            Ok(mutex) => mutex.into_inner(),
            // A progress consumer still holds the buffer; hand back a copy.
            Err(shared) => shared.lock().clone(),
        };
        Ok(image)
    }

    fn blit(&self, canvas: &Arc<Mutex<RgbaImage>>, tile: &RgbaImage, coord: TileCoord) {
        let x = coord.col() as i64 * self.tile_size as i64;
        let y = coord.row() as i64 * self.tile_size as i64;
        imageops::replace(&mut *canvas.lock(), tile, x, y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{MemoryCache, TileCache};
    use crate::gate::FetchGate;
    use crate::provider::{MockHttpClient, TileResponse};
    use bytes::Bytes;
    use std::io::Cursor;

    fn solid_png(color: [u8; 4], size: u32) -> Bytes {
        let img = RgbaImage::from_pixel(size, size, Rgba(color));
        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, image::ImageFormat::Png)
            .expect("failed to encode test PNG");
        Bytes::from(buffer.into_inner())
    }

    fn builder_returning(
        body: Bytes,
        tile_size: u32,
    ) -> MosaicBuilder<MockHttpClient> {
        let client = MockHttpClient {
            response: Ok(TileResponse {
                status: 200,
                content_type: "image/png".to_string(),
                body,
            }),
        };
        let cache = Arc::new(MemoryCache::unbounded()) as Arc<dyn TileCache>;
        let gate = Arc::new(FetchGate::new(3));
        let fetcher = Arc::new(TileFetcher::new(client, cache, gate));
        MosaicBuilder::new(fetcher, UrlTemplate::openstreetmap(), tile_size)
    }

    #[tokio::test]
    async fn test_zoom_zero_is_single_tile_build() {
        let builder = builder_returning(solid_png([200, 100, 50, 255], 8), 8);

        let raster = builder.build(0).await.unwrap();

        assert_eq!(raster.dimensions(), (8, 8));
        assert_eq!(raster.get_pixel(0, 0), &Rgba([200, 100, 50, 255]));
        assert_eq!(raster.get_pixel(7, 7), &Rgba([200, 100, 50, 255]));
    }

    #[tokio::test]
    async fn test_zoom_one_covers_all_quadrants() {
        let builder = builder_returning(solid_png([0, 0, 255, 255], 4), 4);

        let raster = builder.build(1).await.unwrap();

        assert_eq!(raster.dimensions(), (8, 8));
        for (x, y) in [(0, 0), (7, 0), (0, 7), (7, 7)] {
            assert_eq!(raster.get_pixel(x, y), &Rgba([0, 0, 255, 255]));
        }
    }

    #[tokio::test]
    async fn test_zoom_beyond_max_is_rejected() {
        let builder = builder_returning(solid_png([0, 0, 0, 255], 4), 4);

        let err = builder.build(MAX_ZOOM + 1).await;
        assert!(matches!(err, Err(BuildError::UnsupportedZoom(z)) if z == MAX_ZOOM + 1));
    }

    #[tokio::test]
    async fn test_progress_frames_share_live_buffer() {
        let frames: Arc<Mutex<Vec<(usize, usize)>>> = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&frames);

        let builder = builder_returning(solid_png([1, 2, 3, 255], 4), 4).on_progress(
            Duration::ZERO,
            move |frame| {
                assert_eq!(frame.buffer.lock().dimensions(), (8, 8));
                log.lock().push((frame.completed, frame.total));
            },
        );

        builder.build(1).await.unwrap();

        let frames = frames.lock();
        assert!(!frames.is_empty());
        assert!(frames.iter().all(|(_, total)| *total == 4));
        assert_eq!(frames.last().unwrap().0, 4);
    }
}
