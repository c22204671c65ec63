//! Visualization and reporting: 3-d PCA scatter with Plotters, console score report

use crate::data::{RawInput, ReferencePoint};
use crate::scorer::{ConfidenceTier, ScoreResult};
use crate::segments::{ClusterId, N_CLUSTERS};
use plotters::prelude::*;
use std::ops::Range;

/// Plotly qualitative palette, one color per cluster
const CLUSTER_COLORS: [RGBColor; N_CLUSTERS] = [
    RGBColor(0x63, 0x6E, 0xFA),
    RGBColor(0xEF, 0x55, 0x3B),
    RGBColor(0x00, 0xCC, 0x96),
    RGBColor(0xAB, 0x63, 0xFA),
];

const ASSIGNED_OPACITY: f64 = 0.9;
const BACKGROUND_OPACITY: f64 = 0.1;

/// Axis ranges covering every point, padded on each side
#[derive(Debug, Clone, PartialEq)]
pub struct PlotBounds {
    pub x: Range<f64>,
    pub y: Range<f64>,
    pub z: Range<f64>,
}

impl PlotBounds {
    pub fn from_points(points: &[ReferencePoint], extra: [f64; 3], padding: f64) -> Self {
        let mut min = extra;
        let mut max = extra;
        for p in points {
            for (axis, v) in [p.x, p.y, p.z].into_iter().enumerate() {
                min[axis] = min[axis].min(v);
                max[axis] = max[axis].max(v);
            }
        }
        let range = |axis: usize| (min[axis] - padding)..(max[axis] + padding);
        Self {
            x: range(0),
            y: range(1),
            z: range(2),
        }
    }
}

/// Reference points grouped per cluster, in cluster id order
pub fn points_by_cluster(points: &[ReferencePoint]) -> [Vec<(f64, f64, f64)>; N_CLUSTERS] {
    let mut groups: [Vec<(f64, f64, f64)>; N_CLUSTERS] = Default::default();
    for p in points {
        groups[p.cluster.index()].push((p.x, p.y, p.z));
    }
    groups
}

/// Render the reference points with the scored input highlighted
///
/// # Arguments
/// * `reference_points` - Previously projected customers, colored by cluster
/// * `result` - Score of the new input; its cluster is drawn opaque, the rest faint
/// * `output_path` - Path to save the PNG plot
pub fn render_cluster_plot(
    reference_points: &[ReferencePoint],
    result: &ScoreResult,
    output_path: &str,
) -> crate::Result<()> {
    let bounds = PlotBounds::from_points(reference_points, result.projection, 0.5);

    let root = BitMapBackend::new(output_path, (900, 700)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("PCA Cluster Visualization", ("sans-serif", 30))
        .margin(20)
        .build_cartesian_3d(bounds.x.clone(), bounds.y.clone(), bounds.z.clone())?;

    chart.with_projection(|mut pb| {
        pb.yaw = 0.6;
        pb.pitch = 0.35;
        pb.scale = 0.8;
        pb.into_matrix()
    });

    chart.configure_axes().draw()?;

    for (cluster, points) in ClusterId::ALL.into_iter().zip(points_by_cluster(reference_points)) {
        let opacity = if cluster == result.cluster {
            ASSIGNED_OPACITY
        } else {
            BACKGROUND_OPACITY
        };
        let color = CLUSTER_COLORS[cluster.index()];

        chart
            .draw_series(
                points
                    .into_iter()
                    .map(move |coord| Circle::new(coord, 3, color.mix(opacity).filled())),
            )?
            .label(cluster.label())
            .legend(move |(x, y)| Circle::new((x, y), 4, color.filled()));
    }

    let [x, y, z] = result.projection;
    chart
        .draw_series(std::iter::once(Cross::new((x, y, z), 6, BLACK.stroke_width(2))))?
        .label("New Input")
        .legend(|(x, y)| Cross::new((x, y), 4, BLACK.stroke_width(2)));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerMiddle)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .label_font(("sans-serif", 12))
        .draw()?;

    root.present()?;
    tracing::info!(path = output_path, "cluster plot saved");

    Ok(())
}

/// Format an amount as `$1,234.56`
pub fn format_currency(amount: f64) -> String {
    let cents = format!("{:.2}", amount.abs());
    let (whole, fraction) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, fraction)
}

/// Print the assignment, its confidence and an input summary to the console
pub fn print_score_report(raw: &RawInput, result: &ScoreResult) {
    println!(
        "Assigned to: Cluster {} ({})",
        result.cluster, result.label
    );

    println!("\n=== Cluster Description ===");
    println!("{}", result.description);

    println!("\nDistance to Cluster Center: {:.3}", result.distance);
    let marker = match result.confidence {
        ConfidenceTier::CloseMatch => "✓",
        ConfidenceTier::WeakMatch => "!",
        ConfidenceTier::Unreliable => "✗",
    };
    println!("{} {}", marker, result.confidence.message());

    println!("\n=== Input Summary ===");
    println!("  Days Since Last Transaction: {}", raw.days_since_last_txn);
    println!("  Active Days:                 {}", raw.active_days);
    println!("  Number of Transactions:      {}", result.num_txn);
    println!("  Total Amount:                {}", format_currency(raw.total_amount));
    println!("  Avg Transaction Amount:      {}", format_currency(result.avg_txn_amount));
    println!("  Unique Merchants:            {}", raw.num_unique_merchants);

    let [x, y, z] = result.projection;
    println!("\nPCA coordinates: ({:.3}, {:.3}, {:.3})", x, y, z);
}
