//! GeoJSON to Esri JSON.

use crate::coord::{Coord, Path, Ring};
use crate::esri::EsriGeometry;
use crate::error::{ConversionError, Result};
use crate::geojson_geom::GeoJsonGeometry;

pub fn point(coord: Option<Coord>) -> Result<EsriGeometry> {
    let Coord(x, y) = coord.ok_or_else(|| ConversionError::malformed("point has no coordinates"))?;
    Ok(EsriGeometry::Point {
        x: Some(x),
        y: Some(y),
    })
}

pub fn multi_point(points: &[Coord]) -> EsriGeometry {
    EsriGeometry::MultiPoint(points.to_vec())
}

/// LineString and MultiLineString share this; a single line becomes one path.
pub fn polyline(lines: Vec<Path>) -> EsriGeometry {
    EsriGeometry::Polyline(lines)
}

/// Polygon and MultiPolygon share this; each polygon becomes one `rings` part.
pub fn polygon(polygons: Vec<Vec<Ring>>) -> EsriGeometry {
    EsriGeometry::Polygon(polygons)
}

pub fn to_esri(geometry: &GeoJsonGeometry) -> Result<EsriGeometry> {
    match geometry {
        GeoJsonGeometry::Point(coord) => point(coord.clone()),
        GeoJsonGeometry::MultiPoint(points) => Ok(multi_point(points)),
        GeoJsonGeometry::LineString(line) => Ok(polyline(vec![line.clone()])),
        GeoJsonGeometry::MultiLineString(lines) => Ok(polyline(lines.clone())),
        GeoJsonGeometry::Polygon(rings) => Ok(polygon(vec![rings.clone()])),
        GeoJsonGeometry::MultiPolygon(polygons) => Ok(polygon(polygons.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn export(value: Value) -> Result<Value> {
        to_esri(&GeoJsonGeometry::from_value(&value)?)?.to_value()
    }

    #[test]
    fn point_to_xy() {
        let value = export(json!({"type": "Point", "coordinates": [10, 20]})).unwrap();
        assert_eq!(value, json!({"x": 10, "y": 20, "spatialReference": {"wkid": 4326}}));
    }

    #[test]
    fn empty_point_is_malformed() {
        let err = export(json!({"type": "Point", "coordinates": []})).unwrap_err();
        assert!(matches!(err, ConversionError::MalformedGeometry(_)));
    }

    #[test]
    fn multipoint_with_any_key_case() {
        let value = export(json!({"type": "MultiPoint", "COORDINATES": [[1, 2], [3, 4]]})).unwrap();
        assert_eq!(
            value,
            json!({"points": [[1, 2], [3, 4]], "spatialReference": {"wkid": 4326}})
        );
    }

    #[test]
    fn linestring_is_wrapped_in_one_path() {
        let value = export(json!({"type": "LineString", "coordinates": [[0, 0], [1, 1]]})).unwrap();
        assert_eq!(
            value,
            json!({"paths": [[[0, 0], [1, 1]]], "spatialReference": {"wkid": 4326}})
        );
    }

    #[test]
    fn multilinestring_paths_are_used_directly() {
        let value = export(json!({
            "type": "MultiLineString",
            "coordinates": [[[0, 0], [1, 1]], [[2, 2], [3, 3]]]
        }))
        .unwrap();
        assert_eq!(value["paths"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn polygon_single_ring() {
        let value = export(json!({
            "type": "Polygon",
            "coordinates": [[[0, 0], [0, 5], [5, 5], [5, 0], [0, 0]]]
        }))
        .unwrap();
        assert_eq!(
            value,
            json!({
                "rings": [[[0, 0], [0, 5], [5, 5], [5, 0], [0, 0]]],
                "spatialReference": {"wkid": 4326}
            })
        );
    }

    #[test]
    fn multipolygon_holes_become_sentinels() {
        let value = export(json!({
            "type": "multipolygon",
            "coordinates": [
                [[[0, 0], [0, 5], [5, 0], [0, 0]], [[1, 1], [1, 2], [2, 1], [1, 1]]],
                [[[9, 9], [9, 8], [8, 9], [9, 9]]]
            ]
        }))
        .unwrap();
        assert_eq!(
            value["rings"],
            json!([
                [[0, 0], [0, 5], [5, 0], [0, 0], null, [1, 1], [1, 2], [2, 1], [1, 1]],
                [[9, 9], [9, 8], [8, 9], [9, 9]]
            ])
        );
    }

    #[test]
    fn float_and_integer_ordinates_keep_their_form() {
        let value = export(json!({"type": "Point", "coordinates": [-0.5, 9007199254740993_u64]})).unwrap();
        assert_eq!(value["x"], json!(-0.5));
        assert_eq!(value["y"], json!(9007199254740993_u64));
    }

    #[test]
    fn empty_polygons_are_dropped() {
        let value = export(json!({"type": "MultiPolygon", "coordinates": [[], [[[0, 0], [1, 0], [0, 0]]]]})).unwrap();
        assert_eq!(value["rings"].as_array().unwrap().len(), 1);
    }
}
