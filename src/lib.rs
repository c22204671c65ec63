//! SegmentForge: assigns customers to transaction-behavior segments
//!
//! Scoring runs a fixed pipeline over frozen, pre-fitted artifacts:
//! log1p transform, robust scaling, nearest K-Means center, PCA projection
//! for visualization, and a distance-based confidence tier.

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod model;
pub mod scorer;
pub mod segments;
pub mod viz;

// Re-export public items for easier access
pub use cli::Args;
pub use config::{ConfidenceThresholds, ScorerConfig};
pub use data::{FeatureVector, RawInput, ReferencePoint};
pub use error::{ArtifactError, ConfigError, InputError};
pub use model::Artifacts;
pub use scorer::{ConfidenceTier, ScoreResult, SegmentScorer};
pub use segments::ClusterId;
pub use viz::{print_score_report, render_cluster_plot};

/// Common result type used throughout the application
pub type Result<T> = anyhow::Result<T>;
