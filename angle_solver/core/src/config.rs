//! Solver configuration
//!
//! Defaults reproduce the calibrated behaviour; a JSON file may override any
//! subset of fields.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Trust-gate and comparison tolerances, in degrees
///
/// The gate values are calibration parameters: a relationship between
/// angles is only used when the participants' coordinate-derived values add
/// up to the expected total within the matching tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerances {
    /// Straight paths, linear pairs and derived sub-sums
    pub simple_sum: f64,

    /// Composed parent vs. children
    pub composed: f64,

    /// Full-circle partitions
    pub full_circle: f64,

    /// Comparison of solved values (validator, triangle checks, agreement)
    pub value: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            simple_sum: 10.0,
            composed: 15.0,
            full_circle: 30.0,
            value: 0.01,
        }
    }
}

/// Numeric settings of the linear solvers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinearConfig {
    /// Smallest magnitude accepted as a pivot
    pub pivot_epsilon: f64,

    /// Distance to the nearest integer below which values snap to it
    pub snap_epsilon: f64,

    /// Decimal places kept in reported values
    pub decimals: u32,
}

impl Default for LinearConfig {
    fn default() -> Self {
        Self {
            pivot_epsilon: 1e-10,
            snap_epsilon: 1e-9,
            decimals: 7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Soft cap on rule engine passes
    pub max_iterations: usize,

    /// Cap on chains produced by one partition query
    pub max_partitions: usize,

    pub tolerances: Tolerances,

    pub linear: LinearConfig,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            max_partitions: 4096,
            tolerances: Tolerances::default(),
            linear: LinearConfig::default(),
        }
    }
}

impl SolverConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&contents)
    }
}
