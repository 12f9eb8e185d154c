//! GeoJSON export of records.
//!
//! Enable the `geojson` feature to use this module.
//!
//! # Example
//!
//! ```ignore
//! use pmstore::geojson::records_to_feature_collection;
//!
//! let collection = records_to_feature_collection(&store.list_all());
//! println!("{}", collection);
//! // {"type": "FeatureCollection", "features": [{"type": "Feature",
//! //   "id": 0, "geometry": {"type": "Point", "coordinates": [-179.1, 68.0]},
//! //   "properties": {"Id": 0, "PM2.5_Level": 2.8}}]}
//! ```

use geojson::{feature::Id, Feature, FeatureCollection, Geometry, JsonObject, Value};

use crate::record::{Record, ID, PM25_LEVEL};

/// Convert records into a GeoJSON feature collection.
///
/// Each record becomes one feature, in input order. See [`record_to_feature`].
pub fn records_to_feature_collection(records: &[Record]) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: records.iter().map(record_to_feature).collect(),
        foreign_members: None,
    }
}

/// Convert one record into a GeoJSON feature.
///
/// The geometry is a Point at `[Longitude, Latitude]`, or absent when either
/// coordinate is missing. `Id`, `PM2.5_Level` and every extra column become
/// properties; the feature id is the record Id.
pub fn record_to_feature(record: &Record) -> Feature {
    let geometry = match (record.longitude, record.latitude) {
        (Some(lon), Some(lat)) => Some(Geometry::new(Value::Point(vec![lon, lat]))),
        _ => None,
    };

    let mut properties = JsonObject::new();
    properties.insert(ID.to_string(), record.id.into());
    properties.insert(
        PM25_LEVEL.to_string(),
        serde_json::to_value(record.pm25_level).unwrap_or_default(),
    );
    for (column, value) in &record.extra {
        properties.insert(
            column.clone(),
            serde_json::to_value(value).unwrap_or_default(),
        );
    }

    Feature {
        bbox: None,
        geometry,
        id: Some(Id::Number(record.id.into())),
        properties: Some(properties),
        foreign_members: None,
    }
}
