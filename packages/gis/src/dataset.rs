//! Loading raw GIS exports.
//!
//! The export is a single JSON document (`ETGIS_Data.json`) with PascalCase
//! keys. Callers that fetch it over the network decode it with
//! [`parse_dataset`]; local tooling reads it with [`load_dataset`].
//!
//! Key names are matched ignoring ASCII case, so `LATITUDE`,
//! `ugLinesegment`, and `NAME_ETS` decode like their canonical spellings.
//! The contents of `ErrorLayers` are passed through untouched.

use std::path::Path;

use load_map_gis_models::GisDataset;
use serde_json::Value;

use crate::GisError;

/// Every key of the export schema in its canonical spelling.
const DATASET_KEYS: &[&str] = &[
    "RequestCriteria",
    "ErrorLayers",
    "ElectricFacilityFence",
    "UGLineSegment",
    "OHLineSegment",
    "DisplayFieldName",
    "Attributes",
    "Polygons",
    "Polylines",
    "Points",
    "Latitude",
    "Longitude",
    "SouthernBoundary",
    "NorthernBoundary",
    "WesternBoundary",
    "EasternBoundary",
    "name_ets",
    "tline_nm",
    "nominal_voltage",
    "status",
    "ratedkv",
];

const OPAQUE_KEY: &str = "ErrorLayers";

fn canonical_key(key: &str) -> Option<&'static str> {
    DATASET_KEYS
        .iter()
        .copied()
        .find(|known| known.eq_ignore_ascii_case(key))
}

/// Rewrites object keys to their canonical spelling, leaving unknown keys
/// and the opaque error layers as they are.
fn canonicalize_keys(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, mut child) in std::mem::take(map) {
                let key = canonical_key(&key).map_or(key, str::to_string);
                if key != OPAQUE_KEY {
                    canonicalize_keys(&mut child);
                }
                map.insert(key, child);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(canonicalize_keys),
        _ => {}
    }
}

/// Decodes a raw GIS export. Key names are matched ignoring case.
///
/// # Errors
///
/// Returns [`GisError::Json`] if the text is not a valid export.
pub fn parse_dataset(json: &str) -> Result<GisDataset, GisError> {
    let mut value: Value = serde_json::from_str(json)?;
    canonicalize_keys(&mut value);
    let dataset: GisDataset = serde_json::from_value(value)?;

    log::debug!(
        "Decoded dataset with {} fence(s), {} underground and {} overhead segment(s)",
        dataset.electric_facility_fence.len(),
        dataset.ug_line_segment.len(),
        dataset.oh_line_segment.len()
    );
    if !dataset.error_layers.is_empty() {
        log::warn!(
            "Dataset reports {} layer(s) that failed to export",
            dataset.error_layers.len()
        );
    }

    Ok(dataset)
}

/// Reads and decodes a raw GIS export from disk.
///
/// # Errors
///
/// Returns [`GisError::Io`] if the file cannot be read, or
/// [`GisError::Json`] if its contents are not a valid export.
pub fn load_dataset(path: &Path) -> Result<GisDataset, GisError> {
    let json = std::fs::read_to_string(path)?;
    let dataset = parse_dataset(&json)?;
    log::info!("Loaded GIS dataset from {}", path.display());
    Ok(dataset)
}
