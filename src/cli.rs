//! Command-line interface argument parsing.

use clap::Parser;
use std::path::PathBuf;

/// Shopping Trends Dashboard
///
/// Explore a retail shopping-trends table: narrow it with the sidebar
/// filters and read the charts.
///
/// Examples:
///   shopping-trends shopping_trends.csv
///   shopping-trends data.parquet --bins 30 --top 10
///   shopping-trends --config dashboard.json
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Dataset to open at startup (.csv, .tsv, .json or .parquet)
    ///
    /// Without it the dashboard starts empty; use File → Open….
    #[arg(value_name = "FILE", env = "SHOPPING_TRENDS_DATA")]
    pub data: Option<PathBuf>,

    /// Path to a JSON configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Number of bins in the age histogram
    #[arg(long, value_name = "COUNT")]
    pub bins: Option<usize>,

    /// Number of locations in the top-locations chart
    #[arg(long, value_name = "COUNT")]
    pub top: Option<usize>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}
