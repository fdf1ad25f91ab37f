//! Per-country render settings, looked up by ISO code from a CSV table.

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use polars::frame::DataFrame;
use polars::prelude::DataType;

use crate::common::read_from_csv;
use crate::error::PlotError;

/// Threshold settings for one target country. Loaded once per render and
/// read-only afterwards.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Target country ISO code (table key).
    pub iso: String,
    /// Working CRS identifier, e.g. `EPSG:3857`.
    pub crs: String,
    /// Population floor for places inside the target country.
    pub own_threshold: f64,
    /// Population floor for places in neighboring countries.
    pub neighbor_threshold: f64,
    /// Water bodies with scale rank below this are labeled.
    pub scale_rank_cutoff: i32,
}

impl Settings {
    /// Read the settings table and pull the row for `iso`.
    pub fn load(path: &Path, iso: &str) -> Result<Self> {
        let df = read_from_csv(path)
            .with_context(|| format!("Failed to read settings table {}", path.display()))?;
        Self::lookup(&df, iso)
    }

    /// Find the row keyed by `iso` in an already-loaded settings table.
    pub fn lookup(df: &DataFrame, iso: &str) -> Result<Self> {
        let iso_col = df.column("iso_name")?.str()?;
        let row = (0..iso_col.len())
            .find(|&i| iso_col.get(i) == Some(iso))
            .ok_or_else(|| PlotError::SettingsLookup(iso.to_string()))?;

        let crs = df
            .column("crs")?
            .str()?
            .get(row)
            .ok_or_else(|| anyhow!("settings row for {iso} has no CRS"))?
            .to_string();

        let number = |name: &str| -> Result<f64> {
            let column = df.column(name)?.cast(&DataType::Float64)?;
            column.f64()?.get(row).ok_or_else(|| anyhow!("settings row for {iso} has no {name}"))
        };

        Ok(Self {
            iso: iso.to_string(),
            crs,
            own_threshold: number("popthresh_iso")?,
            neighbor_threshold: number("popthresh_ngb")?,
            scale_rank_cutoff: number("scalerank")? as i32,
        })
    }
}
