//! Esri JSON to GeoJSON.
//!
//! Polylines always come out as `MultiLineString` and polygons as
//! `MultiPolygon`, since Esri JSON carries no single/multi distinction.

use serde_json::{Number, Value};

use crate::coord::{Coord, Path, Ring};
use crate::esri::EsriGeometry;
use crate::error::Result;
use crate::geojson_geom::GeoJsonGeometry;

pub use crate::geojson_geom::MultiPointTag;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportOptions {
    pub multipoint_tag: MultiPointTag,
    /// Emit a `LineString` when a polyline has exactly one path.
    pub single_part_linestring: bool,
}

pub fn point(x: Option<&Number>, y: Option<&Number>) -> GeoJsonGeometry {
    match (x, y) {
        (Some(x), Some(y)) => GeoJsonGeometry::Point(Some(Coord(x.clone(), y.clone()))),
        _ => GeoJsonGeometry::Point(None),
    }
}

pub fn multi_point(points: &[Coord]) -> GeoJsonGeometry {
    GeoJsonGeometry::MultiPoint(points.to_vec())
}

pub fn polyline(paths: &[Path], options: &ImportOptions) -> GeoJsonGeometry {
    match paths {
        [single] if options.single_part_linestring => GeoJsonGeometry::LineString(single.clone()),
        _ => GeoJsonGeometry::MultiLineString(paths.to_vec()),
    }
}

pub fn polygon(parts: &[Vec<Ring>]) -> GeoJsonGeometry {
    GeoJsonGeometry::MultiPolygon(parts.to_vec())
}

pub fn to_geojson(geometry: &EsriGeometry, options: &ImportOptions) -> GeoJsonGeometry {
    match geometry {
        EsriGeometry::Point { x, y } => point(x.as_ref(), y.as_ref()),
        EsriGeometry::MultiPoint(points) => multi_point(points),
        EsriGeometry::Polyline(paths) => polyline(paths, options),
        EsriGeometry::Polygon(parts) => polygon(parts),
    }
}

/// Serializes an imported geometry with the configured multipoint tag.
pub fn render(geometry: &GeoJsonGeometry, options: &ImportOptions) -> Result<Value> {
    Ok(serde_json::to_value(geometry.tagged(options.multipoint_tag))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn import(value: Value, options: &ImportOptions) -> Value {
        let esri = EsriGeometry::from_value(&value).unwrap();
        render(&to_geojson(&esri, options), options).unwrap()
    }

    #[test]
    fn point_with_both_ordinates() {
        let value = import(json!({"x": 10, "y": 20}), &ImportOptions::default());
        assert_eq!(value, json!({"type": "Point", "coordinates": [10, 20]}));

        let value = import(json!({"x": -0.5, "y": 51.25}), &ImportOptions::default());
        assert_eq!(value, json!({"type": "Point", "coordinates": [-0.5, 51.25]}));
    }

    #[test]
    fn point_beyond_f64_precision_is_exact() {
        let value = import(json!({"x": 9007199254740993_u64, "y": 1}), &ImportOptions::default());
        assert_eq!(value["coordinates"], json!([9007199254740993_u64, 1]));
    }

    #[test]
    fn point_missing_ordinate_is_empty() {
        for input in [json!({"x": 10}), json!({"y": 20}), json!({"x": null, "y": 20})] {
            let value = import(input, &ImportOptions::default());
            assert_eq!(value, json!({"type": "Point", "coordinates": []}));
        }
    }

    #[test]
    fn multipoint_points_pass_through_unchanged() {
        let points = json!([[1, 2], [3.5, 4], [-7, 8.25]]);
        let value = import(json!({"points": points.clone()}), &ImportOptions::default());
        assert_eq!(value, json!({"type": "Multipoint", "coordinates": points}));
    }

    #[test]
    fn multipoint_canonical_tag() {
        let options = ImportOptions {
            multipoint_tag: MultiPointTag::Canonical,
            ..ImportOptions::default()
        };
        let value = import(json!({"points": [[1, 2]]}), &options);
        assert_eq!(value, json!({"type": "MultiPoint", "coordinates": [[1, 2]]}));
    }

    #[test]
    fn polyline_is_always_multilinestring() {
        let value = import(json!({"paths": [[[0, 0], [1, 1]]]}), &ImportOptions::default());
        assert_eq!(value, json!({"type": "MultiLineString", "coordinates": [[[0, 0], [1, 1]]]}));
    }

    #[test]
    fn polyline_sentinels_pass_through() {
        let value = import(
            json!({"paths": [[[0, 0], null, [], [1, 1, 9]], [[2, 2]]]}),
            &ImportOptions::default(),
        );
        assert_eq!(value["coordinates"], json!([[[0, 0], null, null, [1, 1]], [[2, 2]]]));
    }

    #[test]
    fn single_path_restored_on_request() {
        let options = ImportOptions {
            single_part_linestring: true,
            ..ImportOptions::default()
        };
        let value = import(json!({"paths": [[[0, 0], [1, 1]]]}), &options);
        assert_eq!(value, json!({"type": "LineString", "coordinates": [[0, 0], [1, 1]]}));

        let value = import(json!({"paths": [[[0, 0]], [[1, 1]]]}), &options);
        assert_eq!(value["type"], json!("MultiLineString"));
    }

    #[test]
    fn polygon_with_hole() {
        let value = import(
            json!({"rings": [[
                [0, 0], [0, 5], [5, 5], [5, 0], [0, 0], null,
                [1, 1], [1, 2], [2, 2], [2, 1], [1, 1]
            ]]}),
            &ImportOptions::default(),
        );
        assert_eq!(
            value,
            json!({
                "type": "MultiPolygon",
                "coordinates": [[
                    [[0, 0], [0, 5], [5, 5], [5, 0], [0, 0]],
                    [[1, 1], [1, 2], [2, 2], [2, 1], [1, 1]]
                ]]
            })
        );
    }

    #[test]
    fn polygon_parts_of_only_sentinels_stay_empty() {
        let value = import(json!({"rings": [[null], [[0, 0], [1, 0], [0, 0]]]}), &ImportOptions::default());
        assert_eq!(value["coordinates"], json!([[], [[[0, 0], [1, 0], [0, 0]]]]));
    }
}
