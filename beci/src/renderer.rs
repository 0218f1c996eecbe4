//! The map surface: basemap tiles, map memory and data layers drawn by [`walkers`].

use egui::{Context, Rect, Ui};
use walkers::sources::{Attribution, TileSource as _};
use walkers::{HttpOptions, HttpTiles, InvalidZoom, Map, MapMemory, Projector};

use crate::config::{ConfigError, MapConfig, Viewport};
use crate::data::{Datasets, FeatureCollection, Properties};
use crate::encoding::paint;
use crate::layers::{Layer, LayerId, Layers, Source, Surface};
use crate::plugin::DataLayers;
use crate::popup::Popup;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RenderSurfaceError {
    #[error("map container '{0}' not found")]
    MissingContainer(String),
    #[error("invalid map style: {0}")]
    InvalidStyle(ConfigError),
    #[error("invalid viewport: {0}")]
    InvalidViewport(ConfigError),
    #[error(transparent)]
    Zoom(#[from] InvalidZoom),
    #[error("could not start the application: {0}")]
    Runner(String),
}

/// Map with data layers on top of the basemap.
pub struct MapView {
    config: MapConfig,
    tiles: HttpTiles,
    memory: MapMemory,
    layers: Layers,
}

/// Create the map surface. The configuration is checked before any tile is requested.
pub fn initialize(config: MapConfig, egui_ctx: &Context) -> Result<MapView, RenderSurfaceError> {
    config
        .viewport
        .validate()
        .map_err(RenderSurfaceError::InvalidViewport)?;
    config
        .basemap
        .validate()
        .map_err(RenderSurfaceError::InvalidStyle)?;

    let mut memory = MapMemory::default();
    memory.set_zoom(config.viewport.zoom)?;
    memory.center_at(config.viewport.center());

    let tiles = HttpTiles::with_options(
        config.basemap.clone(),
        HttpOptions {
            cache: config.http_cache.clone(),
            ..Default::default()
        },
        egui_ctx.to_owned(),
    );

    log::info!(
        "Map initialized at {:?}, zoom {}, tiles from {}.",
        config.viewport.center,
        config.viewport.zoom,
        config.basemap.tiles
    );

    Ok(MapView {
        config,
        tiles,
        memory,
        layers: Layers::default(),
    })
}

impl MapView {
    /// Draw the map and its layers, then keep the viewport within its limits.
    pub fn show(&mut self, ui: &mut Ui) {
        let center = self.config.viewport.center();
        let view = ui.available_rect_before_wrap();

        Map::new(None, &mut self.memory, center)
            .with_layer(&mut self.tiles, 1.0)
            .with_plugin(DataLayers::new(&mut self.layers, center.x()))
            .show(ui, |_, _, _, _| {});

        enforce_viewport(&self.config.viewport, &mut self.memory, view);
    }

    pub fn zoom_in(&mut self) {
        step_zoom(&self.config.viewport, &mut self.memory, 1.0);
    }

    pub fn zoom_out(&mut self) {
        step_zoom(&self.config.viewport, &mut self.memory, -1.0);
    }

    pub fn zoom(&self) -> f64 {
        self.memory.zoom()
    }

    pub fn attribution(&self) -> Attribution {
        self.config.basemap.attribution()
    }
}

/// Clamp the zoom into its range, then move the center so that nothing outside of the bounds
/// is visible in `view`.
fn enforce_viewport(viewport: &Viewport, memory: &mut MapMemory, view: Rect) {
    let zoom = memory.zoom();
    let clamped = viewport.clamp_zoom(zoom);
    if (clamped - zoom).abs() > f64::EPSILON {
        log::trace!("Clamping zoom {zoom} to {clamped}.");
        if let Err(err) = memory.set_zoom(clamped) {
            log::warn!("Could not clamp zoom: {err:?}");
        }
    }

    let projector = Projector::new(view, memory, viewport.center());
    if let Some(center) = viewport.clamp_center(&projector, view) {
        log::trace!("Moving the map center to {center:?}.");
        memory.center_at(center);
    }
}

fn step_zoom(viewport: &Viewport, memory: &mut MapMemory, step: f64) {
    let zoom = viewport.step_zoom(memory.zoom(), step);
    if let Err(err) = memory.set_zoom(zoom) {
        log::warn!("Could not zoom to {zoom}: {err:?}");
    }
}

impl Surface for MapView {
    fn add_source(&mut self, id: LayerId, source: Source) {
        self.layers.add_source(id, source);
    }

    fn add_layer(&mut self, layer: Layer) {
        self.layers.add_layer(layer);
    }

    fn has_layer(&self, id: LayerId) -> bool {
        self.layers.has_layer(id)
    }

    fn set_visibility(&mut self, id: LayerId, visible: bool) {
        self.layers.set_visibility(id, visible);
    }

    fn is_visible(&self, id: LayerId) -> Option<bool> {
        self.layers.is_visible(id)
    }

    fn show_popup(&mut self, popup: Popup) {
        self.layers.show_popup(popup);
    }

    fn close_popups(&mut self) {
        self.layers.close_popups();
    }

    fn popup(&self) -> Option<&Popup> {
        self.layers.popup()
    }
}

fn add_data_layer<P: Properties>(
    surface: &mut impl Surface,
    id: LayerId,
    collection: FeatureCollection<P>,
) {
    if collection.is_empty() {
        log::debug!("No features for '{id}', layer not added.");
        return;
    }

    surface.add_source(id, collection.into());
    surface.add_layer(Layer::new(id, paint(id)));
}

/// Register every non-empty dataset as a source with a single, visible layer.
pub fn add_data_layers(surface: &mut impl Surface, datasets: Datasets) {
    let Datasets {
        salmon_populations,
        migration_corridors,
        temperature_anomalies,
        monitoring_stations,
    } = datasets;

    add_data_layer(surface, LayerId::SalmonPopulations, salmon_populations);
    add_data_layer(surface, LayerId::MigrationCorridors, migration_corridors);
    add_data_layer(surface, LayerId::TemperatureAnomalies, temperature_anomalies);
    add_data_layer(surface, LayerId::MonitoringStations, monitoring_stations);
}

/// Show or hide a layer. Layers which were never added are ignored.
pub fn toggle_layer(surface: &mut impl Surface, id: LayerId, visible: bool) {
    if surface.has_layer(id) {
        surface.set_visibility(id, visible);
    } else {
        log::debug!("Layer '{id}' does not exist, cannot set its visibility.");
    }
}
