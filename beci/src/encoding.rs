//! Visual encoding of features: how an attribute value turns into a radius, width or color.
//!
//! Breakpoints are configuration constants, evaluated the same way as MapLibre's
//! `["interpolate", ["linear"], ...]` expression: linear between the two surrounding stops,
//! clamped to the first and the last stop outside of the range.

use egui::{Color32, Stroke};

use crate::layers::LayerId;

/// Values which can be linearly interpolated.
pub trait Lerp: Copy {
    fn lerp(self, other: Self, t: f64) -> Self;
}

impl Lerp for f32 {
    fn lerp(self, other: Self, t: f64) -> Self {
        self + (other - self) * t as f32
    }
}

impl Lerp for Color32 {
    fn lerp(self, other: Self, t: f64) -> Self {
        let channel = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
        let [r1, g1, b1, a1] = self.to_srgba_unmultiplied();
        let [r2, g2, b2, a2] = other.to_srgba_unmultiplied();
        Color32::from_rgba_unmultiplied(
            channel(r1, r2),
            channel(g1, g2),
            channel(b1, b2),
            channel(a1, a2),
        )
    }
}

/// Piecewise-linear interpolation over `stops`, which must be sorted by their input.
/// Returns `None` only if there are no stops at all.
pub fn interpolate<T: Lerp>(stops: &[(f64, T)], input: f64) -> Option<T> {
    let (first, last) = (stops.first()?, stops.last()?);

    if input <= first.0 {
        return Some(first.1);
    }

    if input >= last.0 {
        return Some(last.1);
    }

    stops.windows(2).find_map(|pair| {
        let ((left, from), (right, to)) = (pair[0], pair[1]);
        if left <= input && input <= right {
            // Position of the input between the two stops (0.0 to 1.0).
            let t = if right > left {
                (input - left) / (right - left)
            } else {
                0.0
            };
            Some(from.lerp(to, t))
        } else {
            None
        }
    })
}

/// Visual property which is either fixed or driven by the feature's measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Encoded<T: 'static> {
    Constant(T),
    Interpolate(&'static [(f64, T)]),
}

impl<T: Lerp + Default> Encoded<T> {
    /// Evaluate for a feature. Missing measurements count as zero.
    pub fn evaluate(&self, measurement: Option<f64>) -> T {
        match self {
            Encoded::Constant(value) => *value,
            Encoded::Interpolate(stops) => {
                interpolate(stops, measurement.unwrap_or(0.0)).unwrap_or_default()
            }
        }
    }
}

/// Circle outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outline {
    pub width: f32,
    pub color: Color32,
}

/// How a layer draws its features.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Circle {
        radius: Encoded<f32>,
        color: Encoded<Color32>,
        opacity: f32,
        outline: Outline,
    },
    Line {
        width: Encoded<f32>,
        color: Encoded<Color32>,
        opacity: f32,
    },
    Fill {
        color: Encoded<Color32>,
        opacity: f32,
    },
}

/// [`Paint`] evaluated for a single feature, ready to be drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Symbol {
    Circle {
        radius: f32,
        fill: Color32,
        stroke: Stroke,
    },
    Line {
        stroke: Stroke,
    },
    Fill {
        fill: Color32,
    },
}

impl Paint {
    pub fn evaluate(&self, measurement: Option<f64>) -> Symbol {
        match self {
            Paint::Circle {
                radius,
                color,
                opacity,
                outline,
            } => Symbol::Circle {
                radius: radius.evaluate(measurement),
                fill: color.evaluate(measurement).gamma_multiply(*opacity),
                stroke: Stroke::new(outline.width, outline.color),
            },
            Paint::Line {
                width,
                color,
                opacity,
            } => Symbol::Line {
                stroke: Stroke::new(
                    width.evaluate(measurement),
                    color.evaluate(measurement).gamma_multiply(*opacity),
                ),
            },
            Paint::Fill { color, opacity } => Symbol::Fill {
                fill: color.evaluate(measurement).gamma_multiply(*opacity),
            },
        }
    }
}

/// Salmon density (fish/km²) to circle radius.
pub const SALMON_RADIUS: &[(f64, f32)] = &[(0.0, 5.0), (100.0, 20.0)];

/// Salmon density (fish/km²) to circle color.
pub const SALMON_COLOR: &[(f64, Color32)] = &[
    (0.0, Color32::from_rgb(0xff, 0xe6, 0xe6)),
    (50.0, Color32::from_rgb(0xff, 0x99, 0x99)),
    (100.0, Color32::from_rgb(0xff, 0x33, 0x33)),
];

/// Migration intensity (%) to line width.
pub const CORRIDOR_WIDTH: &[(f64, f32)] = &[(0.0, 2.0), (100.0, 8.0)];

pub const CORRIDOR_COLOR: Color32 = Color32::from_rgb(0x4e, 0xcd, 0xc4);

/// Temperature anomaly (°C) to fill color, from cold blue through white to warm red.
pub const ANOMALY_COLOR: &[(f64, Color32)] = &[
    (-3.0, Color32::from_rgb(0x00, 0x66, 0xcc)),
    (-1.0, Color32::from_rgb(0x66, 0xb3, 0xff)),
    (0.0, Color32::from_rgb(0xff, 0xff, 0xff)),
    (1.0, Color32::from_rgb(0xff, 0x99, 0x99)),
    (3.0, Color32::from_rgb(0xcc, 0x00, 0x00)),
];

pub const STATION_RADIUS: f32 = 8.0;
pub const STATION_COLOR: Color32 = Color32::from_rgb(0xf3, 0x9c, 0x12);

/// Fixed encoding table of every layer.
pub fn paint(layer: LayerId) -> Paint {
    match layer {
        LayerId::SalmonPopulations => Paint::Circle {
            radius: Encoded::Interpolate(SALMON_RADIUS),
            color: Encoded::Interpolate(SALMON_COLOR),
            opacity: 0.8,
            outline: Outline {
                width: 2.0,
                color: Color32::from_rgb(0xcc, 0x00, 0x00),
            },
        },
        LayerId::MigrationCorridors => Paint::Line {
            width: Encoded::Interpolate(CORRIDOR_WIDTH),
            color: Encoded::Constant(CORRIDOR_COLOR),
            opacity: 0.8,
        },
        LayerId::TemperatureAnomalies => Paint::Fill {
            color: Encoded::Interpolate(ANOMALY_COLOR),
            opacity: 0.6,
        },
        LayerId::MonitoringStations => Paint::Circle {
            radius: Encoded::Constant(STATION_RADIUS),
            color: Encoded::Constant(STATION_COLOR),
            opacity: 1.0,
            outline: Outline {
                width: 2.0,
                color: Color32::WHITE,
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn radius(density: f64) -> f32 {
        Encoded::Interpolate(SALMON_RADIUS).evaluate(Some(density))
    }

    #[test]
    fn salmon_radius_follows_density() {
        assert_relative_eq!(radius(0.0), 5.0);
        assert_relative_eq!(radius(100.0), 20.0);
        assert_relative_eq!(radius(50.0), 12.5);
    }

    #[test]
    fn inputs_outside_of_stops_are_clamped() {
        assert_relative_eq!(radius(-10.0), 5.0);
        assert_relative_eq!(radius(109.0), 20.0);
    }

    #[test]
    fn missing_measurement_counts_as_zero() {
        assert_relative_eq!(Encoded::Interpolate(SALMON_RADIUS).evaluate(None), 5.0);
    }

    #[test]
    fn no_stops_no_value() {
        assert_eq!(interpolate::<f32>(&[], 1.0), None);
    }

    #[test]
    fn corridor_width_follows_intensity() {
        let width = Encoded::Interpolate(CORRIDOR_WIDTH);
        assert_relative_eq!(width.evaluate(Some(0.0)), 2.0);
        assert_relative_eq!(width.evaluate(Some(75.0)), 6.5);
        assert_relative_eq!(width.evaluate(Some(100.0)), 8.0);
    }

    #[test]
    fn colors_hit_their_breakpoints() {
        let color = Encoded::Interpolate(ANOMALY_COLOR);
        assert_eq!(color.evaluate(Some(-3.0)), Color32::from_rgb(0x00, 0x66, 0xcc));
        assert_eq!(color.evaluate(Some(0.0)), Color32::WHITE);
        assert_eq!(color.evaluate(Some(3.0)), Color32::from_rgb(0xcc, 0x00, 0x00));
        assert_eq!(color.evaluate(Some(-7.0)), Color32::from_rgb(0x00, 0x66, 0xcc));
    }

    #[test]
    fn colors_are_blended_between_breakpoints() {
        let color = Encoded::Interpolate(ANOMALY_COLOR).evaluate(Some(2.0));
        // Halfway between #ff9999 and #cc0000.
        assert_eq!(color, Color32::from_rgb(0xe6, 0x4d, 0x4d));
    }

    #[test]
    fn stations_are_not_interpolated() {
        let Symbol::Circle { radius, fill, .. } =
            paint(LayerId::MonitoringStations).evaluate(Some(1000.0))
        else {
            panic!("stations are circles");
        };
        assert_relative_eq!(radius, STATION_RADIUS);
        assert_eq!(fill, STATION_COLOR);
    }

    #[test]
    fn every_layer_has_expected_paint_kind() {
        assert!(matches!(paint(LayerId::SalmonPopulations), Paint::Circle { .. }));
        assert!(matches!(paint(LayerId::MigrationCorridors), Paint::Line { .. }));
        assert!(matches!(paint(LayerId::TemperatureAnomalies), Paint::Fill { .. }));
        assert!(matches!(paint(LayerId::MonitoringStations), Paint::Circle { .. }));
    }
}
