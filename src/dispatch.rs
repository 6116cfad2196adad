use std::fmt;

use serde_json::Value;

use crate::coord::get_ci;
use crate::error::{ConversionError, Result};

/// The six geometry kinds both encodings can express.
///
/// Esri input only ever detects as `Point`, `MultiPoint`, `MultiLineString`
/// (`paths`) or `MultiPolygon` (`rings`), since Esri JSON does not tell single
/// and multi-part lines or polygons apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    Point,
    MultiPoint,
    LineString,
    MultiLineString,
    Polygon,
    MultiPolygon,
}

impl GeometryKind {
    /// Canonical GeoJSON type tag.
    pub fn type_name(self) -> &'static str {
        match self {
            GeometryKind::Point => "Point",
            GeometryKind::MultiPoint => "MultiPoint",
            GeometryKind::LineString => "LineString",
            GeometryKind::MultiLineString => "MultiLineString",
            GeometryKind::Polygon => "Polygon",
            GeometryKind::MultiPolygon => "MultiPolygon",
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_lowercase().as_str() {
            "point" => Some(GeometryKind::Point),
            "multipoint" => Some(GeometryKind::MultiPoint),
            "linestring" => Some(GeometryKind::LineString),
            "multilinestring" => Some(GeometryKind::MultiLineString),
            "polygon" => Some(GeometryKind::Polygon),
            "multipolygon" => Some(GeometryKind::MultiPolygon),
            _ => None,
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Picks the Esri shape by key, in priority order rings > paths > x/y > points.
pub fn detect_esri(value: &Value) -> Result<GeometryKind> {
    let obj = value
        .as_object()
        .ok_or_else(|| ConversionError::UnrecognizedFormat(value.clone()))?;

    if obj.contains_key("rings") {
        Ok(GeometryKind::MultiPolygon)
    } else if obj.contains_key("paths") {
        Ok(GeometryKind::MultiLineString)
    } else if obj.contains_key("x") || obj.contains_key("y") {
        Ok(GeometryKind::Point)
    } else if obj.contains_key("points") {
        Ok(GeometryKind::MultiPoint)
    } else {
        Err(ConversionError::UnrecognizedFormat(value.clone()))
    }
}

/// Reads the GeoJSON `type` tag; both key and tag are matched case-insensitively.
pub fn detect_geojson(value: &Value) -> Result<GeometryKind> {
    value
        .as_object()
        .and_then(|obj| get_ci(obj, "type"))
        .and_then(Value::as_str)
        .and_then(GeometryKind::from_tag)
        .ok_or_else(|| ConversionError::UnrecognizedFormat(value.clone()))
}
