//! SegmentForge: customer segment assignment CLI
//!
//! Loads the frozen artifacts once, scores a single input, prints the report
//! and renders the PCA cluster plot.

use anyhow::{Context, Result};
use clap::Parser;
use segmentforge::{logging, viz, Args, Artifacts, ScorerConfig, SegmentScorer};
use std::time::Instant;

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ScorerConfig::load(&args.config)
        .with_context(|| format!("failed to load config {}", args.config.display()))?;
    if let Some(ref dir) = args.artifacts {
        config.artifacts_dir = dir.clone();
    }

    logging::init(&config.log);

    let raw = args.raw_input().context("invalid input")?;

    let start_time = Instant::now();
    let artifacts = Artifacts::load(&config.artifacts_dir).with_context(|| {
        format!(
            "failed to load model artifacts from {}",
            config.artifacts_dir.display()
        )
    })?;

    if args.verbose {
        println!("SegmentForge - Customer Transaction Behavior Segmentation");
        println!("=========================================================\n");
        println!("Artifacts: {}", config.artifacts_dir.display());
        println!(
            "  Loaded in {:.3}s, {} reference points",
            start_time.elapsed().as_secs_f64(),
            artifacts.reference_points.len()
        );
        println!(
            "  Confidence thresholds: close < {}, weak < {}\n",
            config.confidence.close, config.confidence.weak
        );
    }

    let scorer = SegmentScorer::new(&artifacts, config.confidence)
        .context("invalid confidence thresholds")?;
    let result = scorer.score(&raw);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        viz::print_score_report(&raw, &result);
    }

    if !args.no_plot {
        viz::render_cluster_plot(scorer.reference_points(), &result, &args.output)
            .with_context(|| format!("failed to render plot {}", args.output))?;
        if !args.json {
            println!("\nCluster plot saved to: {}", args.output);
        }
    }

    Ok(())
}
