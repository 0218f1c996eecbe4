//! Info popups opened by clicking a feature.

use std::fmt::Display;

use walkers::Position;

use crate::data::{
    MigrationCorridor, MonitoringStation, Properties, SalmonPopulation, TemperatureAnomaly,
};

/// One line of a popup, e.g. `Species: Chinook`.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub label: &'static str,
    pub value: String,
    /// Rendered as a highlighted measurement.
    pub emphasized: bool,
}

/// Rendered template of a feature's attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupContent {
    pub title: &'static str,
    pub symbol: char,
    pub rows: Vec<Row>,
}

impl PopupContent {
    fn new(title: &'static str, symbol: char) -> Self {
        Self {
            title,
            symbol,
            rows: Vec::new(),
        }
    }

    fn row(mut self, label: &'static str, value: Option<impl Display>, fallback: &str) -> Self {
        self.rows.push(Row {
            label,
            value: value.map_or_else(|| fallback.to_owned(), |v| v.to_string()),
            emphasized: false,
        });
        self
    }

    fn measurement(
        mut self,
        label: &'static str,
        value: Option<impl Display>,
        fallback: &str,
        unit: &str,
    ) -> Self {
        let value = value.map_or_else(|| fallback.to_owned(), |v| v.to_string());
        self.rows.push(Row {
            label,
            value: format!("{value}{unit}"),
            emphasized: true,
        });
        self
    }

    /// Value of the row with given label.
    pub fn value(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|row| row.label == label)
            .map(|row| row.value.as_str())
    }
}

/// Popup anchored at a geographical position.
#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub anchor: Position,
    pub content: PopupContent,
}

impl Properties for SalmonPopulation {
    fn measurement(&self) -> Option<f64> {
        self.density.map(f64::from)
    }

    fn popup(&self) -> PopupContent {
        PopupContent::new("Salmon Population", '🐟')
            .row("Location", self.location.as_ref(), "Unknown")
            .row("Species", self.species.as_ref(), "Mixed")
            .measurement("Density", self.density, "0", " fish/km²")
            .row("Season", self.season.as_ref(), "Year-round")
    }
}

impl Properties for MigrationCorridor {
    fn measurement(&self) -> Option<f64> {
        self.intensity.map(f64::from)
    }

    fn popup(&self) -> PopupContent {
        PopupContent::new("Migration Corridor", '🐠')
            .row("Route", self.route.as_ref(), "Unknown")
            .row("Species", self.species.as_ref(), "Mixed")
            .measurement("Intensity", self.intensity, "0", "%")
            .row("Season", self.season.as_ref(), "Seasonal")
    }
}

impl Properties for TemperatureAnomaly {
    fn measurement(&self) -> Option<f64> {
        self.anomaly
    }

    fn popup(&self) -> PopupContent {
        PopupContent::new("Temperature Anomaly", '🌡')
            .row("Location", self.location.as_ref(), "Unknown")
            .measurement("Anomaly", self.anomaly, "0", "°C")
            .row("Depth", self.depth.as_ref(), "Surface")
            .row("Date", self.date, "Recent")
    }
}

impl Properties for MonitoringStation {
    fn measurement(&self) -> Option<f64> {
        None
    }

    fn popup(&self) -> PopupContent {
        PopupContent::new("Monitoring Station", '📡')
            .row("Station", self.name.as_ref(), "Unknown")
            .row("Type", self.kind.as_ref(), "Multi-sensor")
            .measurement("Status", self.status.as_ref(), "Active", "")
            .row("Last Update", self.last_update, "Recent")
    }
}
