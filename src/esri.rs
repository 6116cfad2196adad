use log::trace;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Number, Value};

use crate::coord::{
    as_array, parse_coord, parse_coords, parse_ordinate, parse_path, round_ordinate, round_path,
    round_ring, Coord, Path, Ring,
};
use crate::dispatch::{detect_esri, GeometryKind};
use crate::error::{ConversionError, Result};
use crate::ring;

/// Coordinate system descriptor attached to every Esri geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct SpatialReference {
    pub wkid: u32,
}

/// WGS84, the only spatial reference this crate writes.
pub const WGS84: SpatialReference = SpatialReference { wkid: 4326 };

/// An Esri JSON geometry.
///
/// Polygon parts are held as decoded rings; the `null` ring separator only
/// appears in the serialized form.
#[derive(Debug, Clone, PartialEq)]
pub enum EsriGeometry {
    Point { x: Option<Number>, y: Option<Number> },
    MultiPoint(Vec<Coord>),
    Polyline(Vec<Path>),
    Polygon(Vec<Vec<Ring>>),
}

fn member<'a>(obj: &'a Map<String, Value>, key: &str) -> Result<&'a Value> {
    obj.get(key)
        .ok_or_else(|| ConversionError::malformed(format!("missing member '{key}'")))
}

fn parse_ring_vertex(value: &Value) -> Result<Option<Coord>> {
    match value {
        Value::Null => Ok(None),
        _ => parse_coord(value).map(Some),
    }
}

fn parse_polygon_part(value: &Value) -> Result<Vec<Ring>> {
    let vertices = as_array(value, "rings part")?
        .iter()
        .map(parse_ring_vertex)
        .collect::<Result<Vec<_>>>()?;
    Ok(ring::decode(vertices))
}

impl EsriGeometry {
    /// Builds a geometry from a parsed Esri JSON object.
    pub fn from_value(value: &Value) -> Result<Self> {
        let kind = detect_esri(value)?;
        let obj = value
            .as_object()
            .ok_or_else(|| ConversionError::UnrecognizedFormat(value.clone()))?;

        if let Some(sr) = obj.get("spatialReference") {
            trace!("ignoring input spatialReference {sr}");
        }

        match kind {
            GeometryKind::Point => Ok(EsriGeometry::Point {
                x: parse_ordinate(obj.get("x"), "x")?,
                y: parse_ordinate(obj.get("y"), "y")?,
            }),
            GeometryKind::MultiPoint => Ok(EsriGeometry::MultiPoint(parse_coords(
                member(obj, "points")?,
                "points",
            )?)),
            GeometryKind::MultiLineString => {
                let paths = as_array(member(obj, "paths")?, "paths")?
                    .iter()
                    .map(parse_path)
                    .collect::<Result<Vec<_>>>()?;
                Ok(EsriGeometry::Polyline(paths))
            }
            GeometryKind::MultiPolygon => {
                let parts = as_array(member(obj, "rings")?, "rings")?
                    .iter()
                    .map(parse_polygon_part)
                    .collect::<Result<Vec<_>>>()?;
                Ok(EsriGeometry::Polygon(parts))
            }
            GeometryKind::LineString | GeometryKind::Polygon => {
                Err(ConversionError::UnrecognizedFormat(value.clone()))
            }
        }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Self::from_value(&serde_json::from_str(text)?)
    }

    pub fn kind(&self) -> GeometryKind {
        match self {
            EsriGeometry::Point { .. } => GeometryKind::Point,
            EsriGeometry::MultiPoint(_) => GeometryKind::MultiPoint,
            EsriGeometry::Polyline(_) => GeometryKind::MultiLineString,
            EsriGeometry::Polygon(_) => GeometryKind::MultiPolygon,
        }
    }

    /// Rounds float ordinates to `precision` decimals.
    pub fn round(&mut self, precision: u8) {
        match self {
            EsriGeometry::Point { x, y } => {
                for ordinate in [x, y].into_iter().flatten() {
                    *ordinate = round_ordinate(ordinate, precision);
                }
            }
            EsriGeometry::MultiPoint(points) => round_ring(points, precision),
            EsriGeometry::Polyline(paths) => {
                paths.iter_mut().for_each(|path| round_path(path, precision))
            }
            EsriGeometry::Polygon(parts) => parts
                .iter_mut()
                .flatten()
                .for_each(|ring| round_ring(ring, precision)),
        }
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl Serialize for EsriGeometry {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            EsriGeometry::Point { x, y } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("x", x)?;
                map.serialize_entry("y", y)?;
                map.serialize_entry("spatialReference", &WGS84)?;
                map.end()
            }
            EsriGeometry::MultiPoint(points) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("points", points)?;
                map.serialize_entry("spatialReference", &WGS84)?;
                map.end()
            }
            EsriGeometry::Polyline(paths) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("paths", paths)?;
                map.serialize_entry("spatialReference", &WGS84)?;
                map.end()
            }
            EsriGeometry::Polygon(polygons) => {
                let parts: Vec<Path> = polygons
                    .iter()
                    .map(|rings| ring::encode(rings))
                    .filter(|part| {
                        if part.is_empty() {
                            trace!("dropping empty polygon part");
                        }
                        !part.is_empty()
                    })
                    .collect();
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("rings", &parts)?;
                map.serialize_entry("spatialReference", &WGS84)?;
                map.end()
            }
        }
    }
}
