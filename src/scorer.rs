//! Segment scoring: raw input → log1p → robust scaling → nearest center → projection

use crate::config::ConfidenceThresholds;
use crate::data::{FeatureVector, RawInput, ReferencePoint};
use crate::error::ConfigError;
use crate::model::{Artifacts, N_COMPONENTS};
use crate::segments::ClusterId;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How far the input sits from its assigned cluster center
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceTier {
    CloseMatch,
    WeakMatch,
    Unreliable,
}

impl ConfidenceTier {
    pub fn from_distance(distance: f64, thresholds: &ConfidenceThresholds) -> Self {
        if distance < thresholds.close {
            ConfidenceTier::CloseMatch
        } else if distance < thresholds.weak {
            ConfidenceTier::WeakMatch
        } else {
            ConfidenceTier::Unreliable
        }
    }

    /// Sentence shown to the user alongside the distance
    pub fn message(self) -> &'static str {
        match self {
            ConfidenceTier::CloseMatch => "This input closely matches the assigned cluster.",
            ConfidenceTier::WeakMatch => "This input somewhat matches the assigned cluster.",
            ConfidenceTier::Unreliable => {
                "This input is far from any cluster center. The assignment may be unreliable."
            }
        }
    }
}

impl fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConfidenceTier::CloseMatch => "close match",
            ConfidenceTier::WeakMatch => "weak match",
            ConfidenceTier::Unreliable => "unreliable",
        };
        f.write_str(name)
    }
}

/// Outcome of scoring one customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub cluster: ClusterId,
    pub label: String,
    pub description: String,
    /// Coordinates in the 3-d PCA space, for visualization only
    pub projection: [f64; N_COMPONENTS],
    /// Euclidean distance to the assigned center in standardized space
    pub distance: f64,
    pub confidence: ConfidenceTier,
    pub num_txn: u64,
    pub avg_txn_amount: f64,
}

/// Scores inputs against a set of frozen artifacts. Holds no mutable state.
#[derive(Debug, Clone, Copy)]
pub struct SegmentScorer<'a> {
    artifacts: &'a Artifacts,
    thresholds: ConfidenceThresholds,
}

impl<'a> SegmentScorer<'a> {
    /// Fails if the thresholds are not ordered `0 < close < weak`
    pub fn new(
        artifacts: &'a Artifacts,
        thresholds: ConfidenceThresholds,
    ) -> Result<Self, ConfigError> {
        thresholds.validate()?;
        Ok(Self {
            artifacts,
            thresholds,
        })
    }

    /// Log-transform then robust-scale. The order matters: the scaler was fit on log1p features.
    pub fn standardize(&self, features: &FeatureVector) -> Array1<f64> {
        self.artifacts
            .scaler
            .transform(&features.log1p().as_array())
    }

    pub fn score(&self, raw: &RawInput) -> ScoreResult {
        let features = FeatureVector::from_raw(raw);
        let scaled = self.standardize(&features);

        let (cluster, distance) = self.artifacts.clusters.predict(&scaled);
        let projection = self.artifacts.projector.project(&scaled);
        let confidence = ConfidenceTier::from_distance(distance, &self.thresholds);

        tracing::debug!(
            cluster = cluster.index(),
            distance,
            confidence = %confidence,
            "scored input"
        );

        ScoreResult {
            cluster,
            label: cluster.label().to_string(),
            description: cluster.description().to_string(),
            projection,
            distance,
            confidence,
            num_txn: raw.num_txn(),
            avg_txn_amount: raw.avg_txn_amount(),
        }
    }

    /// Background points for the visualization, unmodified
    pub fn reference_points(&self) -> &'a [ReferencePoint] {
        &self.artifacts.reference_points
    }
}
