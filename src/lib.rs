//! Conversion between Esri JSON geometry and GeoJSON geometry.

use log::debug;
use serde_json::Value;

pub mod coord;
pub mod dispatch;
pub mod error;
pub mod esri;
pub mod export;
mod file;
pub mod geojson_geom;
pub mod import;
pub mod ring;

pub use coord::Coord;
pub use dispatch::{detect_esri, detect_geojson, GeometryKind};
pub use error::{ConversionError, Result};
pub use esri::EsriGeometry;
pub use file::{dump, load, load_geometry, load_with};
pub use geojson_geom::GeoJsonGeometry;
pub use geojson_geom::MultiPointTag;
pub use import::ImportOptions;

/// Converts an Esri JSON geometry to GeoJSON.
///
/// A `Value::String` is taken as raw JSON text and parsed first.
pub fn convert_esri_to_geojson(value: &Value) -> Result<Value> {
    convert_esri_to_geojson_with(value, &ImportOptions::default())
}

pub fn convert_esri_to_geojson_with(value: &Value, options: &ImportOptions) -> Result<Value> {
    let esri = match value {
        Value::String(text) => EsriGeometry::from_json(text)?,
        _ => EsriGeometry::from_value(value)?,
    };
    debug!("importing Esri {}", esri.kind());
    import::render(&import::to_geojson(&esri, options), options)
}

/// Converts a GeoJSON geometry to Esri JSON.
pub fn convert_geojson_to_esri(value: &Value) -> Result<Value> {
    let geometry = GeoJsonGeometry::from_value(value)?;
    debug!("exporting GeoJSON {}", geometry.kind());
    export::to_esri(&geometry)?.to_value()
}

/// Parses Esri JSON text into a GeoJSON value.
pub fn loads(text: &str) -> Result<Value> {
    convert_esri_to_geojson(&serde_json::from_str(text)?)
}

/// Renders a GeoJSON value as Esri JSON text.
pub fn dumps(value: &Value) -> Result<String> {
    Ok(serde_json::to_string(&convert_geojson_to_esri(value)?)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn accepts_raw_json_text() {
        let value = convert_esri_to_geojson(&json!(r#"{"x": 1.5, "y": 2.5}"#)).unwrap();
        assert_eq!(value, json!({"type": "Point", "coordinates": [1.5, 2.5]}));
    }

    #[test]
    fn string_that_is_not_json() {
        assert!(matches!(
            convert_esri_to_geojson(&json!("POINT (1 2)")),
            Err(ConversionError::Json(_))
        ));
    }

    #[test]
    fn dumps_writes_text() {
        let text = dumps(&json!({"type": "Point", "coordinates": [1, 2]})).unwrap();
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, json!({"x": 1, "y": 2, "spatialReference": {"wkid": 4326}}));
        assert!(text.contains(r#""x":1,"#));
    }

    #[test]
    fn integer_points_stay_integers() {
        let value = convert_esri_to_geojson(&json!({"points": [[1, 2], [3, 4]]})).unwrap();
        assert_eq!(value["coordinates"], json!([[1, 2], [3, 4]]));

        let value = convert_esri_to_geojson(&json!({"x": 9007199254740993_u64, "y": 1})).unwrap();
        assert_eq!(value["coordinates"], json!([9007199254740993_u64, 1]));
    }

    #[test]
    fn loads_unrecognized() {
        match loads(r#"{"z": 3}"#) {
            Err(ConversionError::UnrecognizedFormat(v)) => assert_eq!(v, json!({"z": 3})),
            other => panic!("expected UnrecognizedFormat, got {other:?}"),
        }
    }
}
