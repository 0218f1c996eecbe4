//! Sources, layers and their visibility: the renderer's internal state, behind the narrow
//! [`Surface`] port.

use std::fmt;
use std::str::FromStr;

use crate::data::{FeatureCollection, Geometry, Properties};
use crate::encoding::Paint;
use crate::popup::{Popup, PopupContent};

/// Identifier of a data layer, and of the source it draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LayerId {
    SalmonPopulations,
    MigrationCorridors,
    TemperatureAnomalies,
    MonitoringStations,
}

impl LayerId {
    /// All layers, bottom to top.
    pub const ALL: [LayerId; 4] = [
        LayerId::SalmonPopulations,
        LayerId::MigrationCorridors,
        LayerId::TemperatureAnomalies,
        LayerId::MonitoringStations,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LayerId::SalmonPopulations => "salmon-populations",
            LayerId::MigrationCorridors => "migration-corridors",
            LayerId::TemperatureAnomalies => "temperature-anomalies",
            LayerId::MonitoringStations => "monitoring-stations",
        }
    }

    /// Human readable name, as shown next to the toggle.
    pub fn title(self) -> &'static str {
        match self {
            LayerId::SalmonPopulations => "Salmon Populations",
            LayerId::MigrationCorridors => "Migration Corridors",
            LayerId::TemperatureAnomalies => "Temperature Anomalies",
            LayerId::MonitoringStations => "Monitoring Stations",
        }
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("unknown layer: {0}")]
pub struct UnknownLayer(pub String);

impl FromStr for LayerId {
    type Err = UnknownLayer;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownLayer(s.to_owned()))
    }
}

/// Feature as seen by the renderer: its geometry, the value driving its encoding and the
/// content of its popup.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFeature {
    pub geometry: Geometry,
    pub measurement: Option<f64>,
    pub popup: PopupContent,
}

/// Data registered with the surface.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Source {
    pub features: Vec<SourceFeature>,
}

impl<P: Properties> From<FeatureCollection<P>> for Source {
    fn from(collection: FeatureCollection<P>) -> Self {
        Self {
            features: collection
                .features
                .into_iter()
                .map(|feature| SourceFeature {
                    measurement: feature.properties.measurement(),
                    popup: feature.properties.popup(),
                    geometry: feature.geometry,
                })
                .collect(),
        }
    }
}

/// Visual representation of a source.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub id: LayerId,
    pub paint: Paint,
    pub visible: bool,
}

impl Layer {
    pub fn new(id: LayerId, paint: Paint) -> Self {
        Self {
            id,
            paint,
            visible: true,
        }
    }
}

/// The port between the application and whatever draws the map.
pub trait Surface {
    fn add_source(&mut self, id: LayerId, source: Source);

    /// Add a layer drawing the source with the same id. Layers added later are drawn on top.
    fn add_layer(&mut self, layer: Layer);

    fn has_layer(&self, id: LayerId) -> bool;

    /// Show or hide a layer. Does nothing if there is no such layer.
    fn set_visibility(&mut self, id: LayerId, visible: bool);

    /// `None` if there is no such layer.
    fn is_visible(&self, id: LayerId) -> Option<bool>;

    /// Open a popup, closing the previous one.
    fn show_popup(&mut self, popup: Popup);

    fn close_popups(&mut self);

    fn popup(&self) -> Option<&Popup>;
}

/// In-memory layer registry.
#[derive(Debug, Clone, Default)]
pub struct Layers {
    sources: Vec<(LayerId, Source)>,
    layers: Vec<Layer>,
    popup: Option<Popup>,
}

impl Layers {
    pub fn source(&self, id: LayerId) -> Option<&Source> {
        self.sources
            .iter()
            .find(|(source_id, _)| *source_id == id)
            .map(|(_, source)| source)
    }

    /// Layers in drawing order, bottom first.
    pub fn layers(&self) -> impl DoubleEndedIterator<Item = &Layer> {
        self.layers.iter()
    }

    /// Visible layers paired with their sources, bottom first.
    pub fn visible(&self) -> impl DoubleEndedIterator<Item = (&Layer, &Source)> {
        self.layers
            .iter()
            .filter(|layer| layer.visible)
            .filter_map(|layer| self.source(layer.id).map(|source| (layer, source)))
    }

    fn layer_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|layer| layer.id == id)
    }
}

impl Surface for Layers {
    fn add_source(&mut self, id: LayerId, source: Source) {
        log::debug!("Adding source '{id}' with {} features.", source.features.len());
        if let Some((_, existing)) = self.sources.iter_mut().find(|(s, _)| *s == id) {
            *existing = source;
        } else {
            self.sources.push((id, source));
        }
    }

    fn add_layer(&mut self, layer: Layer) {
        if self.source(layer.id).is_none() {
            log::warn!("Layer '{}' has no source, skipping.", layer.id);
            return;
        }

        if let Some(existing) = self.layer_mut(layer.id) {
            *existing = layer;
        } else {
            self.layers.push(layer);
        }
    }

    fn has_layer(&self, id: LayerId) -> bool {
        self.layers.iter().any(|layer| layer.id == id)
    }

    fn set_visibility(&mut self, id: LayerId, visible: bool) {
        if let Some(layer) = self.layer_mut(id) {
            layer.visible = visible;
        }
    }

    fn is_visible(&self, id: LayerId) -> Option<bool> {
        self.layers
            .iter()
            .find(|layer| layer.id == id)
            .map(|layer| layer.visible)
    }

    fn show_popup(&mut self, popup: Popup) {
        self.popup = Some(popup);
    }

    fn close_popups(&mut self) {
        self.popup = None;
    }

    fn popup(&self) -> Option<&Popup> {
        self.popup.as_ref()
    }
}
