//! Typed errors for artifact loading, input validation and configuration

use std::path::PathBuf;
use thiserror::Error;

/// Failure to load one of the frozen model artifacts. Always fatal at start-up.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("cannot read artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse artifact {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot load reference points from {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: polars::prelude::PolarsError,
    },

    #[error("{artifact}: expected {expected}, found {found}")]
    Shape {
        artifact: &'static str,
        expected: String,
        found: String,
    },

    #[error("{artifact}: non-finite value at position {position}")]
    NonFinite {
        artifact: &'static str,
        position: usize,
    },

    #[error("reference point row {row}: {reason}")]
    ReferencePoint { row: usize, reason: String },
}

/// Raw input outside the declared domain
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("total_amount must be non-negative, got {0}")]
    NegativeAmount(f64),

    #[error("total_amount must be finite, got {0}")]
    NonFiniteAmount(f64),

    #[error("transaction counts overflow when summed: chip={chip}, online={online}, swipe={swipe}")]
    TooManyTransactions { chip: u64, online: u64, swipe: u64 },

    #[error("invalid value for {field}: {value:?}")]
    Unparseable { field: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("confidence thresholds must satisfy 0 < close < weak, got close={close}, weak={weak}")]
    Thresholds { close: f64, weak: f64 },
}
