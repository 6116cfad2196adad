//! Packing of polygon rings into Esri's flat `rings` parts.
//!
//! An Esri part stores all rings of one polygon in a single list, with a
//! `null` entry between consecutive rings. The sentinel only exists in that
//! flat form; everywhere else rings are kept as nested vectors.

use crate::coord::{Coord, Path, Ring};

/// Flattens the rings of one polygon into a sentinel-delimited part.
pub fn encode(rings: &[Ring]) -> Path {
    let capacity = rings.iter().map(|r| r.len() + 1).sum::<usize>();
    let mut part = Vec::with_capacity(capacity);
    for (idx, ring) in rings.iter().enumerate() {
        if idx > 0 {
            part.push(None);
        }
        part.extend(ring.iter().cloned().map(Some));
    }
    part
}

/// Splits a sentinel-delimited part back into rings. Empty rings are dropped.
pub fn decode<I>(part: I) -> Vec<Ring>
where
    I: IntoIterator<Item = Option<Coord>>,
{
    let mut rings = Vec::new();
    let mut current: Ring = Vec::new();
    for vertex in part {
        match vertex {
            Some(coord) => current.push(coord),
            None => {
                if !current.is_empty() {
                    rings.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        rings.push(current);
    }
    rings
}
