//! Frozen model artifacts: robust scaler, PCA projector and K-Means centers

use crate::data::{load_reference_points, ReferencePoint, N_FEATURES};
use crate::error::ArtifactError;
use crate::segments::{ClusterId, N_CLUSTERS};
use linfa_nn::distance::{Distance, L2Dist};
use ndarray::{Array1, Array2};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::Path;

/// Dimensions of the projected visualization space
pub const N_COMPONENTS: usize = 3;

pub const SCALER_FILE: &str = "robust_scaler.json";
pub const PROJECTOR_FILE: &str = "pca_model.json";
pub const CLUSTERS_FILE: &str = "kmeans_model.json";
pub const REFERENCE_POINTS_FILE: &str = "pca_cluster_points.csv";

/// Median/IQR standardization fitted offline
#[derive(Debug, Clone, PartialEq)]
pub struct RobustScaler {
    center: Array1<f64>,
    scale: Array1<f64>,
}

impl RobustScaler {
    /// Build from per-feature centers and scales. Zero scales are replaced by 1.0.
    pub fn new(center: Vec<f64>, scale: Vec<f64>) -> Result<Self, ArtifactError> {
        check_len("robust scaler center", &center, N_FEATURES)?;
        check_len("robust scaler scale", &scale, N_FEATURES)?;
        check_finite("robust scaler center", &center)?;
        check_finite("robust scaler scale", &scale)?;

        let scale = scale
            .into_iter()
            .map(|s| if s == 0.0 { 1.0 } else { s })
            .collect::<Vec<_>>();

        Ok(Self {
            center: Array1::from_vec(center),
            scale: Array1::from_vec(scale),
        })
    }

    pub fn transform(&self, features: &Array1<f64>) -> Array1<f64> {
        (features - &self.center) / &self.scale
    }
}

/// Linear map from standardized feature space onto the first three principal axes
#[derive(Debug, Clone, PartialEq)]
pub struct PcaProjector {
    mean: Array1<f64>,
    components: Array2<f64>,
}

impl PcaProjector {
    pub fn new(mean: Option<Vec<f64>>, components: Vec<Vec<f64>>) -> Result<Self, ArtifactError> {
        let mean = mean.unwrap_or_else(|| vec![0.0; N_FEATURES]);
        check_len("pca mean", &mean, N_FEATURES)?;
        check_finite("pca mean", &mean)?;
        let components = to_matrix("pca components", components, N_COMPONENTS)?;

        Ok(Self {
            mean: Array1::from_vec(mean),
            components,
        })
    }

    pub fn project(&self, scaled: &Array1<f64>) -> [f64; N_COMPONENTS] {
        let coords = self.components.dot(&(scaled - &self.mean));
        [coords[0], coords[1], coords[2]]
    }
}

/// Fitted K-Means centers in standardized feature space
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterModel {
    centers: Array2<f64>,
}

impl ClusterModel {
    pub fn new(centers: Vec<Vec<f64>>) -> Result<Self, ArtifactError> {
        Ok(Self {
            centers: to_matrix("kmeans cluster centers", centers, N_CLUSTERS)?,
        })
    }

    /// Euclidean distance to every center, in cluster id order
    pub fn distances(&self, features: &Array1<f64>) -> [f64; N_CLUSTERS] {
        let mut distances = [0.0; N_CLUSTERS];
        for (slot, centroid) in distances.iter_mut().zip(self.centers.outer_iter()) {
            *slot = L2Dist.distance(features.view(), centroid);
        }
        distances
    }

    /// Predict the nearest cluster and the distance to its center
    ///
    /// Equidistant centers resolve to the lowest cluster id.
    pub fn predict(&self, features: &Array1<f64>) -> (ClusterId, f64) {
        let mut min_distance = f64::INFINITY;
        let mut closest_cluster = ClusterId::ALL[0];

        for (cluster, distance) in ClusterId::ALL.into_iter().zip(self.distances(features)) {
            if distance < min_distance {
                min_distance = distance;
                closest_cluster = cluster;
            }
        }

        (closest_cluster, min_distance)
    }
}

#[derive(Deserialize)]
struct ScalerFile {
    center: Vec<f64>,
    scale: Vec<f64>,
}

#[derive(Deserialize)]
struct ProjectorFile {
    #[serde(default)]
    mean: Option<Vec<f64>>,
    components: Vec<Vec<f64>>,
}

#[derive(Deserialize)]
struct ClustersFile {
    cluster_centers: Vec<Vec<f64>>,
}

/// Everything the scorer needs, loaded once at start-up and never mutated
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub scaler: RobustScaler,
    pub projector: PcaProjector,
    pub clusters: ClusterModel,
    pub reference_points: Vec<ReferencePoint>,
}

impl Artifacts {
    /// Load all artifacts from a directory; any missing or malformed file is an error
    pub fn load(dir: &Path) -> Result<Self, ArtifactError> {
        tracing::info!(dir = %dir.display(), "loading model artifacts");

        let scaler_file: ScalerFile = read_json(&dir.join(SCALER_FILE))?;
        let scaler = RobustScaler::new(scaler_file.center, scaler_file.scale)?;

        let projector_file: ProjectorFile = read_json(&dir.join(PROJECTOR_FILE))?;
        let projector = PcaProjector::new(projector_file.mean, projector_file.components)?;

        let clusters_file: ClustersFile = read_json(&dir.join(CLUSTERS_FILE))?;
        let clusters = ClusterModel::new(clusters_file.cluster_centers)?;

        let reference_points = load_reference_points(&dir.join(REFERENCE_POINTS_FILE))?;

        tracing::info!(
            reference_points = reference_points.len(),
            "model artifacts loaded"
        );

        Ok(Self {
            scaler,
            projector,
            clusters,
            reference_points,
        })
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let data = std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&data).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn check_len(artifact: &'static str, values: &[f64], expected: usize) -> Result<(), ArtifactError> {
    if values.len() != expected {
        return Err(ArtifactError::Shape {
            artifact,
            expected: format!("{} values", expected),
            found: format!("{} values", values.len()),
        });
    }
    Ok(())
}

fn check_finite(artifact: &'static str, values: &[f64]) -> Result<(), ArtifactError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(position) => Err(ArtifactError::NonFinite { artifact, position }),
        None => Ok(()),
    }
}

/// Convert row vectors into a `rows × N_FEATURES` matrix
fn to_matrix(
    artifact: &'static str,
    rows: Vec<Vec<f64>>,
    expected_rows: usize,
) -> Result<Array2<f64>, ArtifactError> {
    if rows.len() != expected_rows {
        return Err(ArtifactError::Shape {
            artifact,
            expected: format!("{} rows", expected_rows),
            found: format!("{} rows", rows.len()),
        });
    }

    let mut flat = Vec::with_capacity(expected_rows * N_FEATURES);
    for row in &rows {
        check_len(artifact, row, N_FEATURES)?;
        flat.extend_from_slice(row);
    }
    check_finite(artifact, &flat)?;

    Array2::from_shape_vec((expected_rows, N_FEATURES), flat).map_err(|e| ArtifactError::Shape {
        artifact,
        expected: format!("{}x{} matrix", expected_rows, N_FEATURES),
        found: e.to_string(),
    })
}
