//! Map configuration: viewport constraints and the basemap style.

use std::path::PathBuf;

use walkers::sources::{Attribution, TileSource};
use egui::{Rangef, Rect, Vec2, vec2};
use walkers::{Position, Projector, TileId, lon_lat};

/// West, south, east, north edges of the North Pacific region, in degrees.
pub const NORTH_PACIFIC_BOUNDS: Bounds = Bounds {
    west: -180.0,
    south: 35.0,
    east: -100.0,
    north: 70.0,
};

/// Longitude and latitude of the initial map center.
pub const DEFAULT_CENTER: [f64; 2] = [-140.0, 55.0];
pub const DEFAULT_ZOOM: f64 = 4.0;
pub const MIN_ZOOM: f64 = 3.0;
pub const MAX_ZOOM: f64 = 12.0;

/// Raster tiles of the basemap.
pub const OSM_TILES: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";

/// Highest zoom level supported by the map widget.
const WIDGET_MAX_ZOOM: f64 = 19.0;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("bounds are inverted or outside of the world: {0:?}")]
    InvalidBounds(Bounds),
    #[error("zoom {zoom} is outside of the allowed range {min}..={max}")]
    ZoomOutOfRange { zoom: f64, min: f64, max: f64 },
    #[error("center {0:?} is outside of the bounds")]
    CenterOutOfBounds([f64; 2]),
    #[error("tile URL template '{0}' lacks one of the {{z}}, {{x}} or {{y}} placeholders")]
    TileTemplate(String),
    #[error("tile size {0} is not a multiple of 256")]
    TileSize(u32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl Bounds {
    pub fn contains(&self, [lon, lat]: [f64; 2]) -> bool {
        (self.west..=self.east).contains(&lon) && (self.south..=self.north).contains(&lat)
    }

    fn is_valid(&self) -> bool {
        -180.0 <= self.west
            && self.west < self.east
            && self.east <= 180.0
            && -90.0 <= self.south
            && self.south < self.north
            && self.north <= 90.0
    }
}

/// Where the map may look at.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    pub bounds: Bounds,
    pub center: [f64; 2],
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            bounds: NORTH_PACIFIC_BOUNDS,
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
        }
    }
}

impl Viewport {
    pub fn center(&self) -> Position {
        let [lon, lat] = self.center;
        lon_lat(lon, lat)
    }

    /// Center which keeps the whole `view` within the bounds, or `None` if it already is.
    pub fn clamp_center(&self, projector: &Projector, view: Rect) -> Option<Position> {
        let north_west = projector.project(lon_lat(self.bounds.west, self.bounds.north));
        let south_east = projector.project(lon_lat(self.bounds.east, self.bounds.south));
        let bounds = Rect::from_two_pos(north_west.to_pos2(), south_east.to_pos2());

        let shift = clamp_view(view, bounds);
        (shift.length() > 0.5).then(|| projector.unproject((view.center() + shift).to_vec2()))
    }

    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }

    /// Zoom `step` levels away from `zoom`, stopping at the allowed range.
    pub fn step_zoom(&self, zoom: f64, step: f64) -> f64 {
        self.clamp_zoom(zoom + step)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.bounds.is_valid() {
            return Err(ConfigError::InvalidBounds(self.bounds));
        }

        if !(0.0 <= self.min_zoom && self.min_zoom <= self.max_zoom && self.max_zoom <= WIDGET_MAX_ZOOM)
        {
            return Err(ConfigError::ZoomOutOfRange {
                zoom: self.max_zoom,
                min: 0.0,
                max: WIDGET_MAX_ZOOM,
            });
        }

        if !(self.min_zoom..=self.max_zoom).contains(&self.zoom) {
            return Err(ConfigError::ZoomOutOfRange {
                zoom: self.zoom,
                min: self.min_zoom,
                max: self.max_zoom,
            });
        }

        if !self.bounds.contains(self.center) {
            return Err(ConfigError::CenterOutOfBounds(self.center));
        }

        Ok(())
    }
}

/// Offset which moves `view` into `bounds`, in screen pixels. Bounds smaller than the view are
/// centered in it.
pub fn clamp_view(view: Rect, bounds: Rect) -> Vec2 {
    vec2(
        clamp_span(view.x_range(), bounds.x_range()),
        clamp_span(view.y_range(), bounds.y_range()),
    )
}

fn clamp_span(view: Rangef, bounds: Rangef) -> f32 {
    if bounds.span() <= view.span() {
        bounds.center() - view.center()
    } else if bounds.min > view.min {
        bounds.min - view.min
    } else if bounds.max < view.max {
        bounds.max - view.max
    } else {
        0.0
    }
}

/// Basemap part of the style document: where raster tiles come from and whom to credit.
#[derive(Debug, Clone, PartialEq)]
pub struct BasemapStyle {
    /// URL template with `{z}`, `{x}` and `{y}` placeholders.
    pub tiles: String,
    pub tile_size: u32,
    pub attribution: &'static str,
    pub attribution_url: &'static str,
}

impl Default for BasemapStyle {
    fn default() -> Self {
        Self {
            tiles: OSM_TILES.to_owned(),
            tile_size: 256,
            attribution: "© OpenStreetMap contributors",
            attribution_url: "https://www.openstreetmap.org/copyright",
        }
    }
}

impl BasemapStyle {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !["{z}", "{x}", "{y}"]
            .iter()
            .all(|placeholder| self.tiles.contains(placeholder))
        {
            return Err(ConfigError::TileTemplate(self.tiles.clone()));
        }

        if self.tile_size == 0 || self.tile_size % 256 != 0 {
            return Err(ConfigError::TileSize(self.tile_size));
        }

        Ok(())
    }
}

impl TileSource for BasemapStyle {
    fn tile_url(&self, tile_id: TileId) -> String {
        self.tiles
            .replace("{z}", &tile_id.zoom.to_string())
            .replace("{x}", &tile_id.x.to_string())
            .replace("{y}", &tile_id.y.to_string())
    }

    fn attribution(&self) -> Attribution {
        Attribution {
            text: self.attribution,
            url: self.attribution_url,
            logo_light: None,
            logo_dark: None,
        }
    }

    fn tile_size(&self) -> u32 {
        self.tile_size
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    pub viewport: Viewport,
    pub basemap: BasemapStyle,
    /// Directory of the HTTP tile cache. `None` disables caching.
    pub http_cache: Option<PathBuf>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            basemap: BasemapStyle::default(),
            http_cache: default_http_cache(),
        }
    }
}

fn default_http_cache() -> Option<PathBuf> {
    // Not sure where to put cache on Android, and there is no file system in the browser.
    if cfg!(target_os = "android") || cfg!(target_arch = "wasm32") {
        None
    } else {
        Some(".cache".into())
    }
}

impl MapConfig {
    /// Defaults, overridden by `BECI_TILE_URL` and `NO_HTTP_CACHE` environment variables.
    pub fn from_env() -> Self {
        Self::with_overrides(|name| std::env::var(name).ok())
    }

    fn with_overrides(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(tiles) = var("BECI_TILE_URL") {
            log::info!("Using basemap tiles from {tiles}.");
            config.basemap.tiles = tiles;
        }

        if var("NO_HTTP_CACHE").is_some() {
            config.http_cache = None;
        }

        config
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.viewport.validate()?;
        self.basemap.validate()
    }
}
