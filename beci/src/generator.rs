//! Synthetic oceanographic and salmon data for the North Pacific.
//!
//! Locations, routes, zones and stations are fixed. Measurements are drawn anew on each call,
//! so consumers must not rely on them being stable.

use chrono::{Duration, NaiveDate, Utc};
use rand::Rng;

use crate::data::{
    Coordinate, Datasets, Feature, FeatureCollection, Geometry, MigrationCorridor,
    MonitoringStation, SalmonPopulation, TemperatureAnomaly,
};

const YEAR: u16 = 2024;

const SPECIES: [&str; 5] = ["Chinook", "Coho", "Sockeye", "Pink", "Chum"];
const SEASONS: [&str; 4] = ["Spring", "Summer", "Fall", "Winter"];

const SALMON_LOCATIONS: [(&str, Coordinate); 10] = [
    ("Bristol Bay", [-158.5, 58.5]),
    ("Prince William Sound", [-147.0, 60.5]),
    ("Southeast Alaska", [-134.0, 57.0]),
    ("British Columbia Coast", [-125.0, 52.0]),
    ("Washington Coast", [-124.0, 47.5]),
    ("Oregon Coast", [-124.0, 44.0]),
    ("Northern California", [-124.0, 40.0]),
    ("Kamchatka Peninsula", [158.0, 56.0]),
    ("Hokkaido", [143.0, 43.0]),
    ("Sakhalin Island", [143.0, 51.0]),
];

struct Corridor {
    route: &'static str,
    species: &'static str,
    intensity: u32,
    coordinates: &'static [Coordinate],
}

const CORRIDORS: [Corridor; 4] = [
    Corridor {
        route: "Alaska to California",
        species: "Chinook",
        intensity: 85,
        coordinates: &[
            [-158.0, 58.0],
            [-150.0, 55.0],
            [-140.0, 50.0],
            [-130.0, 45.0],
            [-125.0, 40.0],
        ],
    },
    Corridor {
        route: "Japan to Alaska",
        species: "Sockeye",
        intensity: 72,
        coordinates: &[[143.0, 43.0], [165.0, 50.0], [-175.0, 55.0], [-158.0, 58.0]],
    },
    Corridor {
        route: "Kamchatka to Alaska",
        species: "Pink",
        intensity: 68,
        coordinates: &[[158.0, 56.0], [175.0, 58.0], [-170.0, 60.0], [-158.0, 58.0]],
    },
    Corridor {
        route: "British Columbia Coastal",
        species: "Coho",
        intensity: 91,
        coordinates: &[[-125.0, 48.0], [-126.0, 50.0], [-128.0, 52.0], [-130.0, 54.0]],
    },
];

/// Zone name, anomaly in °C and the south-west and north-east corners.
const ANOMALY_ZONES: [(&str, f64, Coordinate, Coordinate); 5] = [
    ("Gulf of Alaska Warming", 2.1, [-155.0, 56.0], [-145.0, 60.0]),
    ("Bering Sea Cold Pool", -1.5, [-175.0, 58.0], [-165.0, 62.0]),
    ("California Current Cool", -0.8, [-125.0, 35.0], [-120.0, 42.0]),
    ("Kuroshio Extension Warm", 1.7, [140.0, 40.0], [150.0, 45.0]),
    ("Oyashio Current Cold", -1.2, [140.0, 45.0], [150.0, 50.0]),
];

const STATIONS: [(&str, Coordinate, &str); 10] = [
    ("Sitka Ocean Station", [-135.3, 57.0], "Oceanographic"),
    ("Kodiak Research Station", [-152.4, 57.8], "Fisheries"),
    ("Prince Rupert Buoy", [-130.3, 54.3], "Weather"),
    ("Vancouver Island Observatory", [-125.9, 49.7], "Multi-sensor"),
    ("Crescent City Station", [-124.2, 41.7], "Tsunami"),
    ("Monterey Bay Research", [-121.9, 36.8], "Deep Sea"),
    ("Hokkaido Marine Lab", [143.2, 42.9], "Fisheries"),
    ("Kamchatka Buoy Array", [158.6, 55.2], "Oceanographic"),
    ("Bering Sea Station", [-168.9, 60.8], "Climate"),
    ("Aleutian Observatory", [-166.5, 53.9], "Seismic"),
];

/// Generate all datasets using thread-local randomness.
pub fn load_mock_data() -> Datasets {
    log::info!("Loading mock data.");
    let datasets = generate(&mut rand::rng(), Utc::now().date_naive());
    log::info!("Mock data generated.");
    datasets
}

/// Placeholder for live data ingestion. Returns mock data until the feeds are wired up.
pub fn load_live_data() -> Datasets {
    const FEEDS: [(&str, &str); 4] = [
        ("Pacific Salmon Explorer", "https://api.example.com/salmon-data"),
        ("Ocean Observatory", "https://api.example.com/ocean-data"),
        ("Fishing Reports", "https://api.example.com/fishing-data"),
        ("Weather Data", "https://api.example.com/weather-data"),
    ];

    log::info!("Live data integration is not implemented yet.");
    for (name, url) in FEEDS {
        log::info!("Available feed: {name} at {url}");
    }

    load_mock_data()
}

/// Generate all datasets. `today` is the reference date of station updates.
pub fn generate(rng: &mut impl Rng, today: NaiveDate) -> Datasets {
    Datasets {
        salmon_populations: salmon_populations(rng),
        migration_corridors: migration_corridors(),
        temperature_anomalies: temperature_anomalies(rng),
        monitoring_stations: monitoring_stations(rng, today),
    }
}

fn pick<'a>(rng: &mut impl Rng, values: &[&'a str]) -> &'a str {
    values[rng.random_range(0..values.len())]
}

pub fn salmon_populations(rng: &mut impl Rng) -> FeatureCollection<SalmonPopulation> {
    FeatureCollection::new(
        SALMON_LOCATIONS
            .iter()
            .map(|(location, coordinate)| Feature {
                geometry: Geometry::Point(*coordinate),
                properties: SalmonPopulation {
                    location: Some((*location).to_owned()),
                    species: Some(pick(rng, &SPECIES).to_owned()),
                    density: Some(rng.random_range(10..110)),
                    season: Some(pick(rng, &SEASONS).to_owned()),
                    year: Some(YEAR),
                },
            })
            .collect(),
    )
}

pub fn migration_corridors() -> FeatureCollection<MigrationCorridor> {
    FeatureCollection::new(
        CORRIDORS
            .iter()
            .map(|corridor| Feature {
                geometry: Geometry::LineString(corridor.coordinates.to_vec()),
                properties: MigrationCorridor {
                    route: Some(corridor.route.to_owned()),
                    species: Some(corridor.species.to_owned()),
                    intensity: Some(corridor.intensity),
                    season: Some("Spring-Fall".to_owned()),
                    year: Some(YEAR),
                },
            })
            .collect(),
    )
}

pub fn temperature_anomalies(rng: &mut impl Rng) -> FeatureCollection<TemperatureAnomaly> {
    FeatureCollection::new(
        ANOMALY_ZONES
            .iter()
            .map(|(name, anomaly, south_west, north_east)| Feature {
                geometry: Geometry::Polygon(vec![rectangle(*south_west, *north_east)]),
                properties: TemperatureAnomaly {
                    location: Some((*name).to_owned()),
                    anomaly: Some(*anomaly),
                    depth: Some("Surface".to_owned()),
                    date: NaiveDate::from_ymd_opt(2024, 6, 1),
                    confidence: Some(rng.random_range(80..100)),
                },
            })
            .collect(),
    )
}

pub fn monitoring_stations(
    rng: &mut impl Rng,
    today: NaiveDate,
) -> FeatureCollection<MonitoringStation> {
    FeatureCollection::new(
        STATIONS
            .iter()
            .map(|(name, coordinate, kind)| {
                let status = if rng.random_bool(0.9) {
                    "Active"
                } else {
                    "Maintenance"
                };
                let age = Duration::seconds(rng.random_range(0..7 * 24 * 60 * 60));

                Feature {
                    geometry: Geometry::Point(*coordinate),
                    properties: MonitoringStation {
                        name: Some((*name).to_owned()),
                        kind: Some((*kind).to_owned()),
                        status: Some(status.to_owned()),
                        last_update: today.checked_sub_signed(age),
                        data_streams: Some(rng.random_range(2..7)),
                    },
                }
            })
            .collect(),
    )
}

/// Closed ring going counter-clockwise from the south-west corner.
fn rectangle(south_west: Coordinate, north_east: Coordinate) -> Vec<Coordinate> {
    let [west, south] = south_west;
    let [east, north] = north_east;
    vec![
        [west, south],
        [east, south],
        [east, north],
        [west, north],
        [west, south],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::GeometryKind;
    use rand::{SeedableRng, rngs::StdRng};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn datasets(seed: u64) -> Datasets {
        generate(&mut StdRng::seed_from_u64(seed), today())
    }

    #[test]
    fn collections_have_fixed_sizes() {
        let datasets = datasets(1);
        assert_eq!(datasets.salmon_populations.len(), 10);
        assert_eq!(datasets.migration_corridors.len(), 4);
        assert_eq!(datasets.temperature_anomalies.len(), 5);
        assert_eq!(datasets.monitoring_stations.len(), 10);
    }

    #[test]
    fn each_collection_has_a_single_geometry_kind() {
        let datasets = datasets(2);
        assert!(
            datasets
                .salmon_populations
                .features
                .iter()
                .all(|f| f.geometry.kind() == GeometryKind::Point)
        );
        assert!(
            datasets
                .migration_corridors
                .features
                .iter()
                .all(|f| f.geometry.kind() == GeometryKind::LineString)
        );
        assert!(
            datasets
                .temperature_anomalies
                .features
                .iter()
                .all(|f| f.geometry.kind() == GeometryKind::Polygon)
        );
        assert!(
            datasets
                .monitoring_stations
                .features
                .iter()
                .all(|f| f.geometry.kind() == GeometryKind::Point)
        );
    }

    #[test]
    fn measurements_stay_within_their_ranges() {
        for seed in 0..20 {
            let datasets = datasets(seed);

            for feature in &datasets.salmon_populations.features {
                let properties = &feature.properties;
                let density = properties.density.unwrap();
                assert!((10..110).contains(&density), "density {density}");
                assert!(SPECIES.contains(&properties.species.as_deref().unwrap()));
                assert!(SEASONS.contains(&properties.season.as_deref().unwrap()));
            }

            for feature in &datasets.temperature_anomalies.features {
                let confidence = feature.properties.confidence.unwrap();
                assert!((80..100).contains(&confidence), "confidence {confidence}");
            }

            for feature in &datasets.monitoring_stations.features {
                let properties = &feature.properties;
                let streams = properties.data_streams.unwrap();
                assert!((2..7).contains(&streams), "data streams {streams}");

                let last_update = properties.last_update.unwrap();
                assert!(last_update <= today());
                assert!(last_update >= today() - Duration::days(7));

                let status = properties.status.as_deref().unwrap();
                assert!(status == "Active" || status == "Maintenance");
            }
        }
    }

    #[test]
    fn fixed_attributes_do_not_depend_on_randomness() {
        let a = datasets(3);
        let b = datasets(4);

        assert_eq!(a.migration_corridors, b.migration_corridors);

        for (a, b) in a
            .temperature_anomalies
            .features
            .iter()
            .zip(&b.temperature_anomalies.features)
        {
            assert_eq!(a.geometry, b.geometry);
            assert_eq!(a.properties.location, b.properties.location);
            assert_eq!(a.properties.anomaly, b.properties.anomaly);
        }
    }

    #[test]
    fn anomaly_zones_are_closed_rings() {
        for feature in &datasets(5).temperature_anomalies.features {
            let Geometry::Polygon(rings) = &feature.geometry else {
                panic!("not a polygon");
            };
            let ring = &rings[0];
            assert_eq!(ring.len(), 5);
            assert_eq!(ring.first(), ring.last());
        }
    }

    #[test]
    fn live_data_falls_back_to_mock_data() {
        let datasets = load_live_data();
        assert_eq!(datasets.salmon_populations.len(), 10);
        assert_eq!(datasets.monitoring_stations.len(), 10);
    }
}
