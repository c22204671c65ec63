//! Command-line interface definitions and argument parsing

use crate::data::RawInput;
use crate::error::InputError;
use clap::Parser;
use std::path::PathBuf;

/// Assign a customer to a transaction-behavior segment
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Days since the customer's last transaction
    #[arg(long, default_value_t = 0)]
    pub days_since_last_txn: u64,

    /// Number of days with at least one transaction
    #[arg(long, default_value_t = 0)]
    pub active_days: u64,

    /// Total amount spent
    #[arg(long, default_value_t = 0.0)]
    pub total_amount: f64,

    /// Number of unique merchants
    #[arg(long, default_value_t = 0)]
    pub num_unique_merchants: u64,

    /// Number of chip transactions
    #[arg(long, default_value_t = 0)]
    pub num_chip_txn: u64,

    /// Number of online transactions
    #[arg(long, default_value_t = 0)]
    pub num_online_txn: u64,

    /// Number of swipe transactions
    #[arg(long, default_value_t = 0)]
    pub num_swipe_txn: u64,

    /// All seven inputs as one comma-separated record, overriding the individual flags.
    /// Order: days,active_days,total_amount,merchants,chip,online,swipe
    /// Example: --record "5,100,5000.0,20,50,30,20"
    #[arg(short, long)]
    pub record: Option<String>,

    /// Directory containing the model artifacts (overrides the config file)
    #[arg(short, long)]
    pub artifacts: Option<PathBuf>,

    /// Path to a JSON config file
    #[arg(short, long, default_value = "segmentforge.json")]
    pub config: PathBuf,

    /// Output path for the 3-d cluster plot
    #[arg(short, long, default_value = "segment_plot.png")]
    pub output: String,

    /// Skip rendering the cluster plot
    #[arg(long)]
    pub no_plot: bool,

    /// Print the score result as JSON instead of the text report
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Build the validated input from `--record` if given, otherwise from the individual flags
    pub fn raw_input(&self) -> Result<RawInput, InputError> {
        let raw = match self.record {
            Some(ref record) => parse_record(record)?,
            None => RawInput {
                days_since_last_txn: self.days_since_last_txn,
                active_days: self.active_days,
                total_amount: self.total_amount,
                num_unique_merchants: self.num_unique_merchants,
                num_chip_txn: self.num_chip_txn,
                num_online_txn: self.num_online_txn,
                num_swipe_txn: self.num_swipe_txn,
            },
        };
        raw.validate()?;
        Ok(raw)
    }
}

const RECORD_FIELDS: [&str; 7] = [
    "days_since_last_txn",
    "active_days",
    "total_amount",
    "num_unique_merchants",
    "num_chip_txn",
    "num_online_txn",
    "num_swipe_txn",
];

/// Parse "days,active_days,total_amount,merchants,chip,online,swipe"
fn parse_record(record: &str) -> Result<RawInput, InputError> {
    let parts: Vec<&str> = record.split(',').map(str::trim).collect();
    if parts.len() != RECORD_FIELDS.len() {
        return Err(InputError::Unparseable {
            field: "record",
            value: record.to_string(),
        });
    }

    let count = |i: usize| -> Result<u64, InputError> {
        parts[i].parse().map_err(|_| InputError::Unparseable {
            field: RECORD_FIELDS[i],
            value: parts[i].to_string(),
        })
    };
    let total_amount: f64 = parts[2].parse().map_err(|_| InputError::Unparseable {
        field: RECORD_FIELDS[2],
        value: parts[2].to_string(),
    })?;

    Ok(RawInput {
        days_since_last_txn: count(0)?,
        active_days: count(1)?,
        total_amount,
        num_unique_merchants: count(3)?,
        num_chip_txn: count(4)?,
        num_online_txn: count(5)?,
        num_swipe_txn: count(6)?,
    })
}
