use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use crate::coord::{
    as_array, get_ci, parse_coord, parse_coords, parse_path, round_path, round_ring, Coord, Path,
    Ring,
};
use crate::dispatch::{detect_geojson, GeometryKind};
use crate::error::{ConversionError, Result};

/// A GeoJSON geometry object restricted to the six simple geometry types.
#[derive(Debug, Clone, PartialEq)]
pub enum GeoJsonGeometry {
    /// `None` is the empty point, written as `"coordinates": []`.
    Point(Option<Coord>),
    MultiPoint(Vec<Coord>),
    LineString(Path),
    MultiLineString(Vec<Path>),
    Polygon(Vec<Ring>),
    MultiPolygon(Vec<Vec<Ring>>),
}

/// Type tag written for multipoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MultiPointTag {
    /// `"Multipoint"`, as emitted by earlier Esri converters.
    #[default]
    Legacy,
    /// `"MultiPoint"`, the RFC 7946 spelling.
    Canonical,
}

impl MultiPointTag {
    pub fn as_str(self) -> &'static str {
        match self {
            MultiPointTag::Legacy => "Multipoint",
            MultiPointTag::Canonical => "MultiPoint",
        }
    }
}

/// A geometry paired with the multipoint tag it serializes with.
#[derive(Debug, Clone, Copy)]
pub struct TaggedGeometry<'a> {
    geometry: &'a GeoJsonGeometry,
    multipoint_tag: MultiPointTag,
}

fn parse_polygon(value: &Value) -> Result<Vec<Ring>> {
    as_array(value, "polygon")?
        .iter()
        .map(|ring| parse_coords(ring, "ring"))
        .collect()
}

impl GeoJsonGeometry {
    /// Builds a geometry from a parsed GeoJSON object.
    ///
    /// `type` and `coordinates` are looked up without regard to key casing.
    pub fn from_value(value: &Value) -> Result<Self> {
        let kind = detect_geojson(value)?;
        let coordinates = value
            .as_object()
            .and_then(|obj| get_ci(obj, "coordinates"))
            .ok_or_else(|| ConversionError::malformed(format!("{kind} has no coordinates")))?;

        Ok(match kind {
            GeometryKind::Point => {
                if as_array(coordinates, "coordinates")?.is_empty() {
                    GeoJsonGeometry::Point(None)
                } else {
                    GeoJsonGeometry::Point(Some(parse_coord(coordinates)?))
                }
            }
            GeometryKind::MultiPoint => {
                GeoJsonGeometry::MultiPoint(parse_coords(coordinates, "coordinates")?)
            }
            GeometryKind::LineString => GeoJsonGeometry::LineString(parse_path(coordinates)?),
            GeometryKind::MultiLineString => GeoJsonGeometry::MultiLineString(
                as_array(coordinates, "coordinates")?
                    .iter()
                    .map(parse_path)
                    .collect::<Result<_>>()?,
            ),
            GeometryKind::Polygon => GeoJsonGeometry::Polygon(parse_polygon(coordinates)?),
            GeometryKind::MultiPolygon => GeoJsonGeometry::MultiPolygon(
                as_array(coordinates, "coordinates")?
                    .iter()
                    .map(parse_polygon)
                    .collect::<Result<_>>()?,
            ),
        })
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Self::from_value(&serde_json::from_str(text)?)
    }

    pub fn kind(&self) -> GeometryKind {
        match self {
            GeoJsonGeometry::Point(_) => GeometryKind::Point,
            GeoJsonGeometry::MultiPoint(_) => GeometryKind::MultiPoint,
            GeoJsonGeometry::LineString(_) => GeometryKind::LineString,
            GeoJsonGeometry::MultiLineString(_) => GeometryKind::MultiLineString,
            GeoJsonGeometry::Polygon(_) => GeometryKind::Polygon,
            GeoJsonGeometry::MultiPolygon(_) => GeometryKind::MultiPolygon,
        }
    }

    /// Rounds float ordinates to `precision` decimals.
    pub fn round(&mut self, precision: u8) {
        match self {
            GeoJsonGeometry::Point(coord) => {
                if let Some(coord) = coord {
                    *coord = coord.round(precision);
                }
            }
            GeoJsonGeometry::MultiPoint(points) => round_ring(points, precision),
            GeoJsonGeometry::LineString(line) => round_path(line, precision),
            GeoJsonGeometry::MultiLineString(lines) => {
                lines.iter_mut().for_each(|line| round_path(line, precision))
            }
            GeoJsonGeometry::Polygon(rings) => {
                rings.iter_mut().for_each(|ring| round_ring(ring, precision))
            }
            GeoJsonGeometry::MultiPolygon(polygons) => polygons
                .iter_mut()
                .flatten()
                .for_each(|ring| round_ring(ring, precision)),
        }
    }

    /// Serializes with `tag` as the type of a multipoint; other kinds are unaffected.
    pub fn tagged(&self, tag: MultiPointTag) -> TaggedGeometry<'_> {
        TaggedGeometry {
            geometry: self,
            multipoint_tag: tag,
        }
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl Serialize for TaggedGeometry<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let type_name = match self.geometry {
            GeoJsonGeometry::MultiPoint(_) => self.multipoint_tag.as_str(),
            geometry => geometry.kind().type_name(),
        };

        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("type", type_name)?;
        match self.geometry {
            GeoJsonGeometry::Point(Some(coord)) => map.serialize_entry("coordinates", coord)?,
            GeoJsonGeometry::Point(None) => map.serialize_entry("coordinates", &[] as &[f64])?,
            GeoJsonGeometry::MultiPoint(points) => map.serialize_entry("coordinates", points)?,
            GeoJsonGeometry::LineString(line) => map.serialize_entry("coordinates", line)?,
            GeoJsonGeometry::MultiLineString(lines) => map.serialize_entry("coordinates", lines)?,
            GeoJsonGeometry::Polygon(rings) => map.serialize_entry("coordinates", rings)?,
            GeoJsonGeometry::MultiPolygon(polygons) => {
                map.serialize_entry("coordinates", polygons)?
            }
        }
        map.end()
    }
}

/// Writes the canonical RFC 7946 tags.
impl Serialize for GeoJsonGeometry {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.tagged(MultiPointTag::Canonical).serialize(serializer)
    }
}

fn line_positions(line: &Path) -> Result<geojson::LineStringType> {
    line.iter()
        .map(|vertex| {
            vertex
                .as_ref()
                .map(Vec::from)
                .ok_or_else(|| ConversionError::malformed("line contains a null vertex"))
        })
        .collect()
}

fn ring_positions(ring: &Ring) -> geojson::LineStringType {
    ring.iter().map(Vec::from).collect()
}

fn polygon_positions(rings: &[Ring]) -> geojson::PolygonType {
    rings.iter().map(ring_positions).collect()
}

/// The `geojson` crate holds positions as `f64` and always writes canonical tags.
impl TryFrom<&GeoJsonGeometry> for geojson::Geometry {
    type Error = ConversionError;

    fn try_from(geometry: &GeoJsonGeometry) -> Result<Self> {
        let value = match geometry {
            GeoJsonGeometry::Point(coord) => {
                geojson::Value::Point(coord.as_ref().map(Vec::from).unwrap_or_default())
            }
            GeoJsonGeometry::MultiPoint(points) => {
                geojson::Value::MultiPoint(points.iter().map(Vec::from).collect())
            }
            GeoJsonGeometry::LineString(line) => geojson::Value::LineString(line_positions(line)?),
            GeoJsonGeometry::MultiLineString(lines) => geojson::Value::MultiLineString(
                lines.iter().map(line_positions).collect::<Result<_>>()?,
            ),
            GeoJsonGeometry::Polygon(rings) => geojson::Value::Polygon(polygon_positions(rings)),
            GeoJsonGeometry::MultiPolygon(polygons) => geojson::Value::MultiPolygon(
                polygons
                    .iter()
                    .map(Vec::as_slice)
                    .map(polygon_positions)
                    .collect(),
            ),
        };
        Ok(geojson::Geometry::new(value))
    }
}

fn coord_from_position(position: &[f64]) -> Result<Coord> {
    match position {
        [x, y, ..] => Coord::from_f64(*x, *y),
        _ => Err(ConversionError::malformed(format!(
            "position needs at least 2 ordinates, got {position:?}"
        ))),
    }
}

fn ring_from_positions(positions: &[geojson::Position]) -> Result<Ring> {
    positions
        .iter()
        .map(Vec::as_slice)
        .map(coord_from_position)
        .collect()
}

fn path_from_positions(positions: &[geojson::Position]) -> Result<Path> {
    Ok(ring_from_positions(positions)?.into_iter().map(Some).collect())
}

fn polygon_from_positions(polygon: &geojson::PolygonType) -> Result<Vec<Ring>> {
    polygon
        .iter()
        .map(Vec::as_slice)
        .map(ring_from_positions)
        .collect()
}

impl TryFrom<&geojson::Geometry> for GeoJsonGeometry {
    type Error = ConversionError;

    fn try_from(geometry: &geojson::Geometry) -> Result<Self> {
        Ok(match &geometry.value {
            geojson::Value::Point(p) if p.is_empty() => GeoJsonGeometry::Point(None),
            geojson::Value::Point(p) => GeoJsonGeometry::Point(Some(coord_from_position(p)?)),
            geojson::Value::MultiPoint(points) => {
                GeoJsonGeometry::MultiPoint(ring_from_positions(points)?)
            }
            geojson::Value::LineString(line) => {
                GeoJsonGeometry::LineString(path_from_positions(line)?)
            }
            geojson::Value::MultiLineString(lines) => GeoJsonGeometry::MultiLineString(
                lines
                    .iter()
                    .map(Vec::as_slice)
                    .map(path_from_positions)
                    .collect::<Result<_>>()?,
            ),
            geojson::Value::Polygon(rings) => GeoJsonGeometry::Polygon(polygon_from_positions(rings)?),
            geojson::Value::MultiPolygon(polygons) => GeoJsonGeometry::MultiPolygon(
                polygons
                    .iter()
                    .map(polygon_from_positions)
                    .collect::<Result<_>>()?,
            ),
            geojson::Value::GeometryCollection(_) => {
                return Err(ConversionError::UnrecognizedFormat(serde_json::to_value(
                    geometry,
                )?))
            }
        })
    }
}
