//! Shape checks and statistics of GeoJSON datasets. Used for diagnostics only.

use std::collections::BTreeMap;

use serde_json::Value;

/// Quality points lost for each collection which fails [`validate_geojson`].
const INVALID_COLLECTION_PENALTY: i32 = 10;

/// Check that `data` is a feature collection whose every feature has a geometry and properties.
pub fn validate_geojson(data: &Value) -> bool {
    let Some(object) = data.as_object() else {
        return false;
    };

    if object.get("type").and_then(Value::as_str) != Some("FeatureCollection") {
        return false;
    }

    let Some(features) = object.get("features").and_then(Value::as_array) else {
        return false;
    };

    features.iter().all(|feature| {
        feature.get("type").and_then(Value::as_str) == Some("Feature")
            && feature.get("geometry").is_some_and(|g| !g.is_null())
            && feature.get("properties").is_some_and(|p| !p.is_null())
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataStats {
    pub total_features: usize,
    /// Number of features of each valid collection.
    pub feature_types: BTreeMap<String, usize>,
    /// Starts at 100, lowered for each invalid collection.
    pub data_quality: i32,
}

impl Default for DataStats {
    fn default() -> Self {
        Self {
            total_features: 0,
            feature_types: BTreeMap::new(),
            data_quality: 100,
        }
    }
}

/// Count features of named collections, penalizing the invalid ones.
pub fn calculate_data_stats<'a, I>(collections: I) -> DataStats
where
    I: IntoIterator<Item = (&'a str, &'a Value)>,
{
    let mut stats = DataStats::default();

    for (name, collection) in collections {
        match collection.get("features").and_then(Value::as_array) {
            Some(features) if validate_geojson(collection) => {
                stats.total_features += features.len();
                stats.feature_types.insert(name.to_owned(), features.len());
            }
            _ => {
                log::warn!("Collection '{name}' is not a valid feature collection.");
                stats.data_quality -= INVALID_COLLECTION_PENALTY;
            }
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::generate;
    use chrono::NaiveDate;
    use rand::{SeedableRng, rngs::StdRng};
    use serde_json::json;

    fn valid_collection() -> Value {
        json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [0.0, 0.0] },
                "properties": {}
            }]
        })
    }

    #[test]
    fn generated_collections_are_valid() {
        let datasets = generate(
            &mut StdRng::seed_from_u64(7),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        );

        for (name, collection) in datasets.to_geojson() {
            assert!(validate_geojson(&collection), "{name} is invalid");
        }
    }

    #[test]
    fn missing_top_level_fields_are_invalid() {
        assert!(validate_geojson(&valid_collection()));
        assert!(!validate_geojson(&json!({ "features": [] })));
        assert!(!validate_geojson(&json!({ "type": "FeatureCollection" })));
        assert!(!validate_geojson(&json!({ "type": "Feature", "features": [] })));
        assert!(!validate_geojson(
            &json!({ "type": "FeatureCollection", "features": {} })
        ));
        assert!(!validate_geojson(&json!(null)));
        assert!(!validate_geojson(&json!([1, 2, 3])));
    }

    #[test]
    fn features_without_geometry_or_properties_are_invalid() {
        let mut collection = valid_collection();
        collection["features"][0]
            .as_object_mut()
            .unwrap()
            .remove("geometry");
        assert!(!validate_geojson(&collection));

        let mut collection = valid_collection();
        collection["features"][0]["properties"] = Value::Null;
        assert!(!validate_geojson(&collection));

        let mut collection = valid_collection();
        collection["features"][0]["type"] = json!("Point");
        assert!(!validate_geojson(&collection));
    }

    #[test]
    fn empty_collection_is_valid() {
        assert!(validate_geojson(
            &json!({ "type": "FeatureCollection", "features": [] })
        ));
    }

    #[test]
    fn one_invalid_collection_costs_ten_points() {
        let valid = valid_collection();
        let invalid = json!({ "features": [] });

        let stats = calculate_data_stats([("a", &valid), ("b", &invalid), ("c", &valid)]);

        assert_eq!(stats.data_quality, 90);
        assert_eq!(stats.total_features, 2);
        assert_eq!(
            stats.feature_types,
            BTreeMap::from([("a".to_owned(), 1), ("c".to_owned(), 1)])
        );
    }

    #[test]
    fn statistics_of_generated_data() {
        let datasets = generate(
            &mut StdRng::seed_from_u64(8),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        );
        let collections = datasets.to_geojson();

        let stats = calculate_data_stats(collections.iter().map(|(name, v)| (*name, v)));

        assert_eq!(stats.data_quality, 100);
        assert_eq!(stats.total_features, 29);
        assert_eq!(stats.feature_types.get("migrationCorridors"), Some(&4));
    }
}
