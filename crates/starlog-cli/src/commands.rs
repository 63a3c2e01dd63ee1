use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "starlog")]
#[command(about = "Telemetry ingestion and derivation pipeline", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the full pipeline: merge snapshots, derive columns, detect
    /// missing-data dates, write the processed tables
    Process {
        /// Override the detection window start (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// Override the detection window end, exclusive (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },
    /// Merge new registry snapshots only, without reprocessing event logs
    MergeSnapshots,
    /// Load the processed tables and print summary statistics
    Stats,
    /// Print configuration values
    PrintConfig,
}
