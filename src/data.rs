//! Raw transaction inputs, feature derivation and the reference point table

use crate::error::{ArtifactError, InputError};
use crate::segments::ClusterId;
use ndarray::Array1;
use polars::prelude::{CsvReadOptions, DataFrame, DataType, PolarsResult, SerReader};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Number of model features
pub const N_FEATURES: usize = 9;

/// Column order the frozen scaler, projector and centers were fit against
pub const FEATURE_NAMES: [&str; N_FEATURES] = [
    "days_since_last_txn",
    "active_days",
    "num_txn",
    "total_amount",
    "num_unique_merchants",
    "num_chip_txn",
    "num_online_txn",
    "num_swipe_txn",
    "avg_txn_amount",
];

/// One customer's transaction activity, as entered by the user
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RawInput {
    pub days_since_last_txn: u64,
    pub active_days: u64,
    pub total_amount: f64,
    pub num_unique_merchants: u64,
    pub num_chip_txn: u64,
    pub num_online_txn: u64,
    pub num_swipe_txn: u64,
}

impl RawInput {
    /// Check what the field types do not already guarantee
    pub fn validate(&self) -> Result<(), InputError> {
        if self.checked_num_txn().is_none() {
            return Err(InputError::TooManyTransactions {
                chip: self.num_chip_txn,
                online: self.num_online_txn,
                swipe: self.num_swipe_txn,
            });
        }
        if !self.total_amount.is_finite() {
            return Err(InputError::NonFiniteAmount(self.total_amount));
        }
        if self.total_amount < 0.0 {
            return Err(InputError::NegativeAmount(self.total_amount));
        }
        Ok(())
    }

    /// Total transactions across all channels, `None` if the sum overflows
    pub fn checked_num_txn(&self) -> Option<u64> {
        self.num_chip_txn
            .checked_add(self.num_online_txn)?
            .checked_add(self.num_swipe_txn)
    }

    /// Total transactions across all channels. Saturates on inputs that fail [`RawInput::validate`].
    pub fn num_txn(&self) -> u64 {
        self.checked_num_txn().unwrap_or(u64::MAX)
    }

    /// Average amount per transaction, 0.0 when there are no transactions
    pub fn avg_txn_amount(&self) -> f64 {
        match self.num_txn() {
            0 => 0.0,
            n => self.total_amount / n as f64,
        }
    }
}

/// Model-ready features in [`FEATURE_NAMES`] order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; N_FEATURES]);

impl FeatureVector {
    pub fn from_raw(raw: &RawInput) -> Self {
        Self([
            raw.days_since_last_txn as f64,
            raw.active_days as f64,
            raw.num_txn() as f64,
            raw.total_amount,
            raw.num_unique_merchants as f64,
            raw.num_chip_txn as f64,
            raw.num_online_txn as f64,
            raw.num_swipe_txn as f64,
            raw.avg_txn_amount(),
        ])
    }

    /// Element-wise `ln(1 + x)`
    pub fn log1p(&self) -> Self {
        Self(self.0.map(f64::ln_1p))
    }

    pub fn values(&self) -> &[f64; N_FEATURES] {
        &self.0
    }

    pub fn as_array(&self) -> Array1<f64> {
        Array1::from_vec(self.0.to_vec())
    }
}

/// A previously projected customer, shown as background context in the plot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferencePoint {
    pub id: i64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub cluster: ClusterId,
}

/// Load the reference point table from CSV
///
/// # Arguments
/// * `file_path` - CSV with columns `x`, `y`, `z`, `cluster` and an optional `id`
///
/// # Returns
/// * Points in file order; rows without an `id` column are numbered from 0
pub fn load_reference_points(file_path: &Path) -> Result<Vec<ReferencePoint>, ArtifactError> {
    let csv_err = |source| ArtifactError::Csv {
        path: file_path.to_path_buf(),
        source,
    };

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(file_path.to_path_buf()))
        .and_then(|reader| reader.finish())
        .map_err(csv_err)?;

    let xs = float_column(&df, "x").map_err(csv_err)?;
    let ys = float_column(&df, "y").map_err(csv_err)?;
    let zs = float_column(&df, "z").map_err(csv_err)?;
    let clusters = int_column(&df, "cluster").map_err(csv_err)?;
    let ids = if df.get_column_names().contains(&"id") {
        Some(int_column(&df, "id").map_err(csv_err)?)
    } else {
        None
    };

    let mut points = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let missing = |column: &str| ArtifactError::ReferencePoint {
            row,
            reason: format!("missing value in column '{}'", column),
        };

        let x = xs[row].ok_or_else(|| missing("x"))?;
        let y = ys[row].ok_or_else(|| missing("y"))?;
        let z = zs[row].ok_or_else(|| missing("z"))?;
        if ![x, y, z].iter().all(|v| v.is_finite()) {
            return Err(ArtifactError::ReferencePoint {
                row,
                reason: "non-finite coordinate".to_string(),
            });
        }

        let raw_cluster = clusters[row].ok_or_else(|| missing("cluster"))?;
        let cluster = usize::try_from(raw_cluster)
            .ok()
            .and_then(|c| ClusterId::try_from(c).ok())
            .ok_or_else(|| ArtifactError::ReferencePoint {
                row,
                reason: format!("unknown cluster id {}", raw_cluster),
            })?;

        let id = match &ids {
            Some(ids) => ids[row].ok_or_else(|| missing("id"))?,
            None => row as i64,
        };

        points.push(ReferencePoint { id, x, y, z, cluster });
    }

    Ok(points)
}

fn float_column(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    let series = df.column(name)?.cast(&DataType::Float64)?;
    Ok(series.f64()?.into_iter().collect())
}

fn int_column(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<i64>>> {
    let series = df.column(name)?.cast(&DataType::Int64)?;
    Ok(series.i64()?.into_iter().collect())
}
