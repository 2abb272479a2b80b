//! Static intersection metadata (name and coordinates by intersection ID).

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::signals::utility::as_finite_number;

/// Files tried, in order, inside the metadata directory.
pub const META_FILE_CANDIDATES: &[&str] = &["itst-meta.json", "data.json"];

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItstMeta {
    pub itst_nm: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

/// One row as found on disk. Raw exports carry `mapCtptIntLat`/`mapCtptIntLot`,
/// compacted files carry `lat`/`lon`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetaRow {
    itst_id: Option<Value>,
    #[serde(default)]
    itst_nm: Option<Value>,
    #[serde(default)]
    map_ctpt_int_lat: Option<Value>,
    #[serde(default)]
    map_ctpt_int_lot: Option<Value>,
    #[serde(default)]
    lat: Option<Value>,
    #[serde(default)]
    lon: Option<Value>,
}

/// Compact on-disk form, as written to `itst-meta.json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompactRow<'a> {
    pub itst_id: &'a str,
    pub itst_nm: Option<&'a str>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

fn coordinate(primary: Option<&Value>, fallback: Option<&Value>) -> Option<f64> {
    let value = match primary {
        Some(v) if !v.is_null() => v,
        _ => fallback?,
    };
    as_finite_number(value)
}

/// Read-only lookup loaded once at startup and shared by reference.
#[derive(Debug, Default)]
pub struct IntersectionMeta {
    entries: HashMap<String, ItstMeta>,
}

impl IntersectionMeta {
    /// Loads the first readable candidate file in `dir`.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut last_err = None;

        for name in META_FILE_CANDIDATES {
            let path = dir.join(name);
            match std::fs::read_to_string(&path) {
                Ok(content) => {
                    let meta = Self::from_json(&content)
                        .with_context(|| format!("invalid metadata in {}", path.display()))?;
                    debug!(source = %name, bytes = content.len(), size = meta.len(), "Loaded intersection metadata");
                    return Ok(meta);
                }
                Err(e) => last_err = Some(anyhow!(e).context(format!("reading {}", path.display()))),
            }
        }

        Err(last_err.unwrap_or_else(|| anyhow!("no metadata source file")))
    }

    /// Like [`IntersectionMeta::load`], but logs a warning and returns an
    /// empty store on failure.
    pub fn load_or_empty(dir: impl AsRef<Path>) -> Self {
        match Self::load(dir) {
            Ok(meta) => meta,
            Err(e) => {
                warn!(error = %e, "Intersection metadata not loaded");
                Self::default()
            }
        }
    }

    /// Parses a JSON array of metadata rows. Rows without `itstId` are skipped.
    pub fn from_json(content: &str) -> Result<Self> {
        let rows: Vec<Value> = serde_json::from_str(content)?;
        let entries = rows
            .into_iter()
            .filter_map(|row| serde_json::from_value::<MetaRow>(row).ok())
            .filter_map(|row| {
                let id = match row.itst_id? {
                    Value::Null => return None,
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                let itst_nm = match row.itst_nm {
                    Some(Value::String(s)) => Some(s),
                    _ => None,
                };
                let meta = ItstMeta {
                    itst_nm,
                    lat: coordinate(row.map_ctpt_int_lat.as_ref(), row.lat.as_ref()),
                    lon: coordinate(row.map_ctpt_int_lot.as_ref(), row.lon.as_ref()),
                };
                Some((id, meta))
            })
            .collect();

        Ok(Self { entries })
    }

    pub fn get(&self, itst_id: &str) -> Option<&ItstMeta> {
        self.entries.get(itst_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over all `(itst_id, meta)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ItstMeta)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Rows in the compact `itst-meta.json` form, sorted by ID.
    pub fn compact(&self) -> Vec<CompactRow<'_>> {
        let mut rows: Vec<CompactRow<'_>> = self
            .iter()
            .map(|(id, m)| CompactRow {
                itst_id: id,
                itst_nm: m.itst_nm.as_deref(),
                lat: m.lat,
                lon: m.lon,
            })
            .collect();
        rows.sort_by(|a, b| a.itst_id.cmp(b.itst_id));
        rows
    }

    /// Writes [`IntersectionMeta::compact`] to `path` as pretty JSON.
    pub fn write_compact(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(&self.compact())?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), rows = self.len(), "Wrote compact intersection metadata");
        Ok(())
    }
}
