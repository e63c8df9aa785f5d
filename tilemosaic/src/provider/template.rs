//! URL templates for tile servers.

use crate::coord::TileCoord;

/// Template URL of the public OpenStreetMap tile server.
const OSM_TEMPLATE: &str = "https://a.tile.openstreetmap.org/{z}/{x}/{y}.png";

/// A tile URL template with `{z}`, `{x}` and `{y}` placeholders.
///
/// The expansion is deterministic: the same coordinate always yields the
/// same URL, which doubles as the cache key for that tile.
///
/// # Example
///
/// ```
/// use tilemosaic::coord::TileCoord;
/// use tilemosaic::provider::UrlTemplate;
///
/// let template = UrlTemplate::openstreetmap();
/// let url = template.url_for(TileCoord::new(1, 2, 3));
/// assert_eq!(url, "https://a.tile.openstreetmap.org/3/1/2.png");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate {
    template: String,
}

impl UrlTemplate {
    /// Creates a template from a URL string containing `{z}`, `{x}` and
    /// `{y}` placeholders.
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// The OpenStreetMap raster tile server (256 px tiles).
    pub fn openstreetmap() -> Self {
        Self::new(OSM_TEMPLATE)
    }

    /// Expands the template for one tile coordinate.
    pub fn url_for(&self, coord: TileCoord) -> String {
        self.template
            .replace("{z}", &coord.zoom().to_string())
            .replace("{x}", &coord.col().to_string())
            .replace("{y}", &coord.row().to_string())
    }
}

impl Default for UrlTemplate {
    fn default() -> Self {
        Self::openstreetmap()
    }
}
