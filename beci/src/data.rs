//! Feature collections and the typed attribute records of each dataset.
//!
//! Everything here serializes to plain GeoJSON, so the datasets can be validated and
//! inspected with the same tooling as a real data feed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::popup::PopupContent;

/// Longitude and latitude, in this order, as in GeoJSON.
pub type Coordinate = [f64; 2];

/// Geometry of a single feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Point(Coordinate),
    LineString(Vec<Coordinate>),
    /// Outer ring first, followed by holes. Rings are closed.
    Polygon(Vec<Vec<Coordinate>>),
}

/// Geometry kind shared by all features of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
    Point,
    LineString,
    Polygon,
}

impl Geometry {
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Point(_) => GeometryKind::Point,
            Geometry::LineString(_) => GeometryKind::LineString,
            Geometry::Polygon(_) => GeometryKind::Polygon,
        }
    }
}

/// Geometry with its attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct Feature<P> {
    pub geometry: Geometry,
    pub properties: P,
}

/// Ordered set of features of one geometry kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct FeatureCollection<P> {
    pub features: Vec<Feature<P>>,
}

impl<P> FeatureCollection<P> {
    pub fn new(features: Vec<Feature<P>>) -> Self {
        Self { features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl<P> Default for FeatureCollection<P> {
    fn default() -> Self {
        Self {
            features: Vec::new(),
        }
    }
}

/// Attribute record of a feature, as seen by the renderer.
pub trait Properties {
    /// Attribute driving the visual encoding of the layer, if it has one.
    fn measurement(&self) -> Option<f64>;

    /// Content of the info popup, with defaults filled in for absent attributes.
    fn popup(&self) -> PopupContent;
}

/// Salmon population density observed at a location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalmonPopulation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
    /// Fish per square kilometer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub density: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
}

/// Route taken by migrating salmon.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MigrationCorridor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
    /// Percent of the peak migration intensity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intensity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
}

/// Sea surface temperature anomaly over a zone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemperatureAnomaly {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Degrees Celsius relative to the climatological mean.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anomaly: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// Percent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<u32>,
}

/// Ocean observing station.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringStation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_update: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_streams: Option<u32>,
}

/// All datasets shown on the map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Datasets {
    pub salmon_populations: FeatureCollection<SalmonPopulation>,
    pub migration_corridors: FeatureCollection<MigrationCorridor>,
    pub temperature_anomalies: FeatureCollection<TemperatureAnomaly>,
    pub monitoring_stations: FeatureCollection<MonitoringStation>,
}

impl Datasets {
    /// GeoJSON documents of all datasets, keyed by their conventional names.
    pub fn to_geojson(&self) -> Vec<(&'static str, serde_json::Value)> {
        vec![
            ("salmonPopulations", to_value(&self.salmon_populations)),
            ("migrationCorridors", to_value(&self.migration_corridors)),
            ("temperatureAnomalies", to_value(&self.temperature_anomalies)),
            ("monitoringStations", to_value(&self.monitoring_stations)),
        ]
    }
}

fn to_value<T: Serialize>(collection: &T) -> serde_json::Value {
    serde_json::to_value(collection).unwrap_or_else(|err| {
        // Only maps with non-string keys can fail, and there are none here.
        log::warn!("Could not serialize a collection: {err}");
        serde_json::Value::Null
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn point_feature_serializes_to_geojson() {
        let feature = Feature {
            geometry: Geometry::Point([-158.5, 58.5]),
            properties: SalmonPopulation {
                location: Some("Bristol Bay".to_owned()),
                density: Some(42),
                ..Default::default()
            },
        };

        assert_eq!(
            serde_json::to_value(&feature).unwrap(),
            json!({
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [-158.5, 58.5] },
                "properties": { "location": "Bristol Bay", "density": 42 }
            })
        );
    }

    #[test]
    fn station_uses_geojson_attribute_names() {
        let station = MonitoringStation {
            kind: Some("Weather".to_owned()),
            last_update: NaiveDate::from_ymd_opt(2024, 6, 1),
            data_streams: Some(3),
            ..Default::default()
        };

        assert_eq!(
            serde_json::to_value(&station).unwrap(),
            json!({ "type": "Weather", "lastUpdate": "2024-06-01", "dataStreams": 3 })
        );
    }

    #[test]
    fn collection_parses_back_from_geojson() {
        let collection: FeatureCollection<TemperatureAnomaly> = serde_json::from_value(json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
                },
                "properties": { "anomaly": -1.5 }
            }]
        }))
        .unwrap();

        assert_eq!(collection.len(), 1);
        assert_eq!(collection.features[0].geometry.kind(), GeometryKind::Polygon);
        assert_eq!(collection.features[0].properties.anomaly, Some(-1.5));
    }

    #[test]
    fn empty_datasets_are_still_feature_collections() {
        for (_, value) in Datasets::default().to_geojson() {
            assert_eq!(value, json!({ "type": "FeatureCollection", "features": [] }));
        }
    }
}
