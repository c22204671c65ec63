//! Integration tests for SegmentForge against fixture artifacts

use segmentforge::model::{CLUSTERS_FILE, PROJECTOR_FILE, REFERENCE_POINTS_FILE, SCALER_FILE};
use segmentforge::{
    ArtifactError, Artifacts, ClusterId, ConfidenceThresholds, ConfidenceTier, FeatureVector,
    RawInput, ScoreResult, SegmentScorer,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const TOLERANCE: f64 = 1e-9;

const SCALER_JSON: &str = r#"{
    "center": [1.5, 4.0, 4.2, 7.5, 2.5, 3.0, 2.0, 2.0, 3.5],
    "scale":  [1.2, 1.0, 1.5, 2.0, 0.8, 1.6, 1.8, 1.4, 1.1]
}"#;

const PROJECTOR_JSON: &str = r#"{
    "mean": [0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1],
    "components": [
        [0.4, 0.3, 0.3, 0.4, 0.3, 0.3, 0.2, 0.1, -0.1],
        [-0.2, 0.1, 0.1, 0.0, 0.2, 0.5, 0.6, -0.4, 0.1],
        [0.1, -0.3, -0.2, 0.1, 0.0, -0.2, 0.3, 0.4, 0.7]
    ]
}"#;

const CLUSTERS_JSON: &str = r#"{
    "cluster_centers": [
        [-1.0, 0.8, 0.5, 0.7, 0.9, 0.6, 0.9, 0.5, -0.3],
        [1.2, -1.0, -1.1, -0.8, -0.9, -0.5, -1.0, -0.6, 1.0],
        [0.0, 0.0, -0.2, 0.0, 0.0, -1.8, 0.1, 0.8, 0.2],
        [-0.5, 0.6, 0.4, 0.5, 0.6, 0.9, -1.1, -0.2, 0.1]
    ]
}"#;

const REFERENCE_CSV: &str = "id,x,y,z,cluster
101,1.1,0.4,0.2,0
102,-5.2,-2.4,-1.3,1
103,-0.6,-2.0,1.1,2
104,0.3,1.2,-0.9,3
105,0.8,0.7,0.5,0
";

/// Write a complete artifact directory
fn write_artifacts() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(SCALER_FILE), SCALER_JSON).unwrap();
    fs::write(dir.path().join(PROJECTOR_FILE), PROJECTOR_JSON).unwrap();
    fs::write(dir.path().join(CLUSTERS_FILE), CLUSTERS_JSON).unwrap();
    fs::write(dir.path().join(REFERENCE_POINTS_FILE), REFERENCE_CSV).unwrap();
    dir
}

fn load_fixture() -> (TempDir, Artifacts) {
    let dir = write_artifacts();
    let artifacts = Artifacts::load(dir.path()).unwrap();
    (dir, artifacts)
}

fn example_input() -> RawInput {
    RawInput {
        days_since_last_txn: 5,
        active_days: 100,
        total_amount: 5000.0,
        num_unique_merchants: 20,
        num_chip_txn: 50,
        num_online_txn: 30,
        num_swipe_txn: 20,
    }
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < TOLERANCE,
        "expected {}, got {}",
        expected,
        actual
    );
}

fn score(artifacts: &Artifacts, raw: &RawInput) -> ScoreResult {
    SegmentScorer::new(artifacts, ConfidenceThresholds::default())
        .unwrap()
        .score(raw)
}

#[test]
fn test_golden_example_input() {
    let (_dir, artifacts) = load_fixture();
    let result = score(&artifacts, &example_input());

    assert_eq!(result.num_txn, 100);
    assert_eq!(result.avg_txn_amount, 50.0);
    assert_eq!(result.cluster, ClusterId::MultichannelPowerUsers);
    assert_close(result.distance, 1.5050952226169922);
    assert_eq!(result.confidence, ConfidenceTier::WeakMatch);
    assert_close(result.projection[0], 0.9218890508547792);
    assert_close(result.projection[1], 0.5867039225833096);
    assert_close(result.projection[2], 0.4410501658212266);
}

#[test]
fn test_golden_swipe_only_customer() {
    let (_dir, artifacts) = load_fixture();
    let raw = RawInput {
        days_since_last_txn: 30,
        active_days: 40,
        total_amount: 1500.0,
        num_unique_merchants: 8,
        num_chip_txn: 0,
        num_online_txn: 4,
        num_swipe_txn: 36,
    };
    let result = score(&artifacts, &raw);

    assert_eq!(result.avg_txn_amount, 37.5);
    assert_eq!(result.cluster, ClusterId::SwipeTraditionalists);
    assert_close(result.distance, 1.7549516257257038);
    assert_eq!(result.confidence, ConfidenceTier::WeakMatch);
    assert_eq!(result.label, "Mid-Value Swipe-Only Traditionalists");
}

#[test]
fn test_golden_out_of_distribution_customer() {
    let (_dir, artifacts) = load_fixture();
    let raw = RawInput {
        days_since_last_txn: 200,
        active_days: 3,
        total_amount: 900.0,
        num_unique_merchants: 2,
        num_chip_txn: 0,
        num_online_txn: 0,
        num_swipe_txn: 3,
    };
    let result = score(&artifacts, &raw);

    assert_eq!(result.avg_txn_amount, 300.0);
    assert_eq!(result.cluster, ClusterId::PremiumSpenders);
    assert_close(result.distance, 3.310005307844923);
    assert_eq!(result.confidence, ConfidenceTier::Unreliable);
}

#[test]
fn test_all_zero_input() {
    let (_dir, artifacts) = load_fixture();
    let result = score(&artifacts, &RawInput::default());

    assert_eq!(result.num_txn, 0);
    assert_eq!(result.avg_txn_amount, 0.0);
    assert_eq!(result.cluster, ClusterId::PremiumSpenders);
    assert_close(result.distance, 7.184895935018292);
    assert_close(result.projection[0], -5.806897546897547);
}

#[test]
fn test_assignment_is_minimum_distance() {
    let (_dir, artifacts) = load_fixture();
    let scorer = SegmentScorer::new(&artifacts, ConfidenceThresholds::default()).unwrap();

    for raw in [example_input(), RawInput::default()] {
        let scaled = scorer.standardize(&FeatureVector::from_raw(&raw));
        let distances = artifacts.clusters.distances(&scaled);
        let result = scorer.score(&raw);

        let min = distances.iter().cloned().fold(f64::INFINITY, f64::min);
        let first_min = distances.iter().position(|&d| d == min).unwrap();
        assert_eq!(result.cluster.index(), first_min);
        assert_eq!(result.distance, min);
        assert!(result.cluster.index() < 4);
    }
}

#[test]
fn test_log_transform_applied_before_scaling() {
    let (_dir, artifacts) = load_fixture();
    let scorer = SegmentScorer::new(&artifacts, ConfidenceThresholds::default()).unwrap();
    let features = FeatureVector::from_raw(&example_input());

    let standardized = scorer.standardize(&features);
    let log_then_scale = artifacts.scaler.transform(&features.log1p().as_array());
    let scale_then_log = artifacts
        .scaler
        .transform(&features.as_array())
        .mapv(f64::ln_1p);

    assert_eq!(standardized, log_then_scale);
    assert!((standardized[0] - scale_then_log[0]).abs() > 0.1);
    assert_close(standardized[0], (6.0f64.ln() - 1.5) / 1.2);
}

#[test]
fn test_scoring_is_deterministic() {
    let (_dir, artifacts) = load_fixture();
    let first = score(&artifacts, &example_input());
    let second = score(&artifacts, &example_input());
    assert_eq!(first, second);
}

#[test]
fn test_custom_thresholds() {
    let (_dir, artifacts) = load_fixture();
    let thresholds = ConfidenceThresholds {
        close: 2.0,
        weak: 4.0,
    };
    let result = SegmentScorer::new(&artifacts, thresholds)
        .unwrap()
        .score(&example_input());
    assert_eq!(result.confidence, ConfidenceTier::CloseMatch);
}

#[test]
fn test_reference_points_pass_through() {
    let (_dir, artifacts) = load_fixture();
    let scorer = SegmentScorer::new(&artifacts, ConfidenceThresholds::default()).unwrap();

    let points = scorer.reference_points();
    assert_eq!(points.len(), 5);
    assert_eq!(points[0].id, 101);
    assert_eq!(points[1].cluster, ClusterId::PremiumSpenders);
    assert_eq!((points[4].x, points[4].y, points[4].z), (0.8, 0.7, 0.5));
}

#[test]
fn test_missing_artifact_fails_fast() {
    let dir = write_artifacts();
    fs::remove_file(dir.path().join(PROJECTOR_FILE)).unwrap();

    let result = Artifacts::load(dir.path());
    assert!(matches!(result, Err(ArtifactError::Io { .. })));
}

#[test]
fn test_corrupt_artifact_fails_fast() {
    let dir = write_artifacts();
    fs::write(dir.path().join(SCALER_FILE), "{\"center\": [1.0, 2.0").unwrap();

    let result = Artifacts::load(dir.path());
    assert!(matches!(result, Err(ArtifactError::Parse { .. })));
}

#[test]
fn test_wrong_center_count_fails_fast() {
    let dir = write_artifacts();
    fs::write(
        dir.path().join(CLUSTERS_FILE),
        r#"{"cluster_centers": [[0, 0, 0, 0, 0, 0, 0, 0, 0]]}"#,
    )
    .unwrap();

    let result = Artifacts::load(dir.path());
    assert!(matches!(result, Err(ArtifactError::Shape { .. })));
}

#[test]
fn test_missing_directory_fails_fast() {
    let result = Artifacts::load(Path::new("no/such/artifacts"));
    assert!(result.is_err());
}

#[test]
fn test_result_serializes_to_json() {
    let (_dir, artifacts) = load_fixture();
    let result = score(&artifacts, &example_input());

    let json: serde_json::Value = serde_json::to_value(&result).unwrap();
    assert_eq!(json["cluster"], 0);
    assert_eq!(json["confidence"], "weak_match");
    assert_eq!(json["num_txn"], 100);
    assert_eq!(json["projection"].as_array().unwrap().len(), 3);

    let back: ScoreResult = serde_json::from_value(json).unwrap();
    assert_eq!(back.cluster, result.cluster);
    assert_eq!(back.confidence, result.confidence);
    assert_eq!(back.label, result.label);
}
