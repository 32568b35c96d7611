//! VPP dataset wire format.
//!
//! Upstream publishes a JSON object with `angles`, `speeds`, one key per true
//! wind angle holding the boat speeds for every wind speed, and optional
//! beat/run optimum arrays. The object may be wrapped as `{ "vpp": ... }`.

use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::Path;

use crate::error::{PlotError, Result};
use crate::geometry::fmt_num;

/// Optimal VMG angle per wind speed, upwind (beat) or downwind (run).
#[derive(Debug, Clone, PartialEq)]
pub struct VmgOptimum {
    pub angles: Vec<f64>,
    pub vmg: Vec<f64>,
}

impl VmgOptimum {
    pub fn get(&self, speed_index: usize) -> Option<(f64, f64)> {
        Some((*self.angles.get(speed_index)?, *self.vmg.get(speed_index)?))
    }
}

/// A validated velocity prediction table.
#[derive(Debug, Clone, PartialEq)]
pub struct VppDataset {
    pub angles: Vec<f64>,
    pub speeds: Vec<f64>,
    /// One row per entry of `angles`, one column per entry of `speeds`.
    table: Vec<Vec<f64>>,
    pub beat: Option<VmgOptimum>,
    pub run: Option<VmgOptimum>,
}

#[derive(Deserialize)]
struct RawVpp {
    angles: Vec<f64>,
    speeds: Vec<f64>,
    beat_angle: Option<Vec<f64>>,
    beat_vmg: Option<Vec<f64>>,
    run_angle: Option<Vec<f64>>,
    run_vmg: Option<Vec<f64>>,
    #[serde(flatten)]
    rows: BTreeMap<String, Value>,
}

impl VppDataset {
    pub fn new(angles: Vec<f64>, speeds: Vec<f64>, table: Vec<Vec<f64>>) -> Result<Self> {
        let dataset = Self {
            angles,
            speeds,
            table,
            beat: None,
            run: None,
        };
        dataset.validate()?;
        Ok(dataset)
    }

    pub fn with_beat(mut self, angles: Vec<f64>, vmg: Vec<f64>) -> Result<Self> {
        self.beat = Some(VmgOptimum { angles, vmg });
        self.validate()?;
        Ok(self)
    }

    pub fn with_run(mut self, angles: Vec<f64>, vmg: Vec<f64>) -> Result<Self> {
        self.run = Some(VmgOptimum { angles, vmg });
        self.validate()?;
        Ok(self)
    }

    /// Parse a dataset from JSON text, bare or wrapped in a `vpp` envelope.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    pub fn from_reader(mut reader: impl Read) -> Result<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Self::from_json_str(&text)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        let value = match value {
            Value::Object(mut map) if map.contains_key("vpp") => map
                .remove("vpp")
                .unwrap_or(Value::Null),
            other => other,
        };
        let raw: RawVpp = serde_json::from_value(value)?;

        // Row keys are stringified numbers; match them to angles numerically
        // so "52" and "52.0" both resolve.
        let mut keyed_rows: Vec<(f64, Value)> = raw
            .rows
            .into_iter()
            .filter_map(|(key, row)| key.trim().parse::<f64>().ok().map(|k| (k, row)))
            .collect();

        let mut table = Vec::with_capacity(raw.angles.len());
        for &angle in &raw.angles {
            let pos = keyed_rows
                .iter()
                .position(|(key, _)| same_value(*key, angle))
                .ok_or_else(|| {
                    PlotError::InvalidDatasetShape(format!("no boat speeds for angle {}", angle))
                })?;
            let (_, row) = keyed_rows.swap_remove(pos);
            let row: Vec<f64> = serde_json::from_value(row).map_err(|e| {
                PlotError::InvalidDatasetShape(format!("row for angle {}: {}", angle, e))
            })?;
            table.push(row);
        }

        let beat = pair_optimum("beat", raw.beat_angle, raw.beat_vmg)?;
        let run = pair_optimum("run", raw.run_angle, raw.run_vmg)?;

        let dataset = Self {
            angles: raw.angles,
            speeds: raw.speeds,
            table,
            beat,
            run,
        };
        dataset.validate()?;
        Ok(dataset)
    }

    fn validate(&self) -> Result<()> {
        let shape = |msg: String| Err(PlotError::InvalidDatasetShape(msg));

        if let Some(bad) = self.angles.iter().chain(&self.speeds).find(|v| !v.is_finite()) {
            return shape(format!("non-finite axis value {}", bad));
        }
        if self.table.len() != self.angles.len() {
            return shape(format!(
                "{} angles but {} table rows",
                self.angles.len(),
                self.table.len()
            ));
        }
        for (angle, row) in self.angles.iter().zip(&self.table) {
            if row.len() != self.speeds.len() {
                return shape(format!(
                    "angle {} has {} boat speeds, expected {}",
                    angle,
                    row.len(),
                    self.speeds.len()
                ));
            }
        }
        // Speeds and angles become element keys and pointer tags in their
        // formatted form, so two values must not format the same.
        if let Some(speed) = first_key_collision(&self.speeds) {
            return shape(format!("duplicate wind speed {}", speed));
        }
        if let Some(angle) = first_key_collision(&self.angles) {
            return shape(format!("duplicate wind angle {}", angle));
        }
        for (name, optimum) in [("beat", &self.beat), ("run", &self.run)] {
            if let Some(opt) = optimum {
                if opt.angles.len() != self.speeds.len() || opt.vmg.len() != self.speeds.len() {
                    return shape(format!(
                        "{} arrays have {}/{} entries, expected {}",
                        name,
                        opt.angles.len(),
                        opt.vmg.len(),
                        self.speeds.len()
                    ));
                }
            }
        }
        Ok(())
    }

    /// Index of the wind speed whose formatted key matches `speed`.
    pub fn speed_index(&self, speed: f64) -> Option<usize> {
        self.speeds.iter().position(|s| same_key(*s, speed))
    }

    /// Boat speed for a true wind angle (degrees) and wind speed index.
    pub fn sog(&self, angle: f64, speed_index: usize) -> Option<f64> {
        let row = self.angles.iter().position(|a| same_key(*a, angle))?;
        self.table[row].get(speed_index).copied()
    }

    /// Boat speeds of one wind speed, aligned with `angles`.
    pub fn column(&self, speed_index: usize) -> impl Iterator<Item = f64> + '_ {
        self.table
            .iter()
            .map(move |row| row.get(speed_index).copied().unwrap_or(0.0))
    }

    pub fn rows(&self) -> impl Iterator<Item = (f64, &[f64])> {
        self.angles
            .iter()
            .copied()
            .zip(self.table.iter().map(Vec::as_slice))
    }
}

fn pair_optimum(
    name: &str,
    angles: Option<Vec<f64>>,
    vmg: Option<Vec<f64>>,
) -> Result<Option<VmgOptimum>> {
    match (angles, vmg) {
        (Some(angles), Some(vmg)) => Ok(Some(VmgOptimum { angles, vmg })),
        (None, None) => Ok(None),
        _ => Err(PlotError::InvalidDatasetShape(format!(
            "{}_angle and {}_vmg must be given together",
            name, name
        ))),
    }
}

fn same_value(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn same_key(a: f64, b: f64) -> bool {
    fmt_num(a) == fmt_num(b)
}

fn first_key_collision(values: &[f64]) -> Option<f64> {
    let mut seen = BTreeSet::new();
    values.iter().copied().find(|v| !seen.insert(fmt_num(*v)))
}
