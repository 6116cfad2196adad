use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::error::{ConversionError, Result};

/// A 2-D position, serialized as `[x, y]`.
///
/// Ordinates keep their JSON number representation, so integers stay
/// integers and large values are not squeezed through `f64`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Coord(pub Number, pub Number);

impl Coord {
    pub fn x(&self) -> &Number {
        &self.0
    }

    pub fn y(&self) -> &Number {
        &self.1
    }

    /// Rounds float ordinates to `precision` decimals; integers are left alone.
    pub fn round(&self, precision: u8) -> Coord {
        Coord(round_ordinate(&self.0, precision), round_ordinate(&self.1, precision))
    }

    pub fn from_f64(x: f64, y: f64) -> Result<Coord> {
        let ordinate = |v: f64| {
            Number::from_f64(v)
                .ok_or_else(|| ConversionError::malformed(format!("non-finite ordinate {v}")))
        };
        Ok(Coord(ordinate(x)?, ordinate(y)?))
    }
}

impl From<(i64, i64)> for Coord {
    fn from((x, y): (i64, i64)) -> Self {
        Coord(x.into(), y.into())
    }
}

impl From<&Coord> for Vec<f64> {
    fn from(coord: &Coord) -> Self {
        vec![as_f64(&coord.0), as_f64(&coord.1)]
    }
}

/// Closed coordinate sequence bounding a polygon (outer boundary or hole).
pub type Ring = Vec<Coord>;

/// One line of a polyline. `None` entries are sentinels carried through untouched.
pub type Path = Vec<Option<Coord>>;

// Every finite JSON number has an f64 form.
fn as_f64(n: &Number) -> f64 {
    n.as_f64().unwrap_or(f64::NAN)
}

pub fn round_ordinate(n: &Number, precision: u8) -> Number {
    if !n.is_f64() {
        return n.clone();
    }
    let scale = 10f64.powi(i32::from(precision));
    Number::from_f64((as_f64(n) * scale).round() / scale).unwrap_or_else(|| n.clone())
}

pub fn round_path(path: &mut Path, precision: u8) {
    for coord in path.iter_mut().flatten() {
        *coord = coord.round(precision);
    }
}

pub fn round_ring(ring: &mut Ring, precision: u8) {
    for coord in ring.iter_mut() {
        *coord = coord.round(precision);
    }
}

pub fn as_array<'a>(value: &'a Value, what: &str) -> Result<&'a Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| ConversionError::malformed(format!("{what} must be an array, got {value}")))
}

fn parse_number(value: &Value) -> Result<Number> {
    match value {
        Value::Number(n) => Ok(n.clone()),
        _ => Err(ConversionError::malformed(format!("non-numeric ordinate {value}"))),
    }
}

/// Reads `[x, y, ...]`; extra ordinates are ignored.
pub fn parse_coord(value: &Value) -> Result<Coord> {
    let ordinates = as_array(value, "position")?;
    if ordinates.len() < 2 {
        return Err(ConversionError::malformed(format!(
            "position needs at least 2 ordinates, got {value}"
        )));
    }
    Ok(Coord(parse_number(&ordinates[0])?, parse_number(&ordinates[1])?))
}

pub fn parse_coords(value: &Value, what: &str) -> Result<Vec<Coord>> {
    as_array(value, what)?.iter().map(parse_coord).collect()
}

/// Polyline vertex: `null` and `[]` both become the sentinel.
pub fn parse_path_vertex(value: &Value) -> Result<Option<Coord>> {
    match value {
        Value::Null => Ok(None),
        Value::Array(a) if a.is_empty() => Ok(None),
        _ => parse_coord(value).map(Some),
    }
}

pub fn parse_path(value: &Value) -> Result<Path> {
    as_array(value, "path")?.iter().map(parse_path_vertex).collect()
}

/// Esri `x`/`y` member; absent and `null` are both "no value".
pub fn parse_ordinate(value: Option<&Value>, name: &str) -> Result<Option<Number>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(Some(n.clone())),
        Some(v) => Err(ConversionError::malformed(format!("{name} must be numeric, got {v}"))),
    }
}

/// Member lookup that prefers an exact key and falls back to any casing.
pub fn get_ci<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    map.get(key).or_else(|| {
        map.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    })
}
