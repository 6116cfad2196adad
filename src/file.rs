use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::info;
use serde_json::Value;

use crate::error::Result;
use crate::esri::EsriGeometry;
use crate::export;
use crate::geojson_geom::GeoJsonGeometry;
use crate::import::{self, ImportOptions};

/// Reads an Esri JSON file and returns the geometry as GeoJSON.
pub fn load(path: impl AsRef<Path>) -> Result<Value> {
    load_with(path, &ImportOptions::default())
}

pub fn load_with(path: impl AsRef<Path>, options: &ImportOptions) -> Result<Value> {
    let geometry = read_esri(path.as_ref())?;
    import::render(&import::to_geojson(&geometry, options), options)
}

/// Like [`load`], but hands back a `geojson` crate geometry.
pub fn load_geometry(path: impl AsRef<Path>) -> Result<geojson::Geometry> {
    let geometry = read_esri(path.as_ref())?;
    geojson::Geometry::try_from(&import::to_geojson(&geometry, &ImportOptions::default()))
}

fn read_esri(path: &Path) -> Result<EsriGeometry> {
    info!("Loading Esri JSON from {}", path.display());
    let reader = BufReader::new(File::open(path)?);
    let value: Value = serde_json::from_reader(reader)?;
    EsriGeometry::from_value(&value)
}

/// Converts a GeoJSON geometry to Esri JSON and writes it to `path`.
pub fn dump(value: &Value, path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    let esri = export::to_esri(&GeoJsonGeometry::from_value(value)?)?;

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, &esri)?;
    writer.flush()?;

    info!("Wrote Esri JSON {} to {}", esri.kind(), path.display());
    Ok(path.to_path_buf())
}
