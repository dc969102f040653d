use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "item_batch")]
#[command(about = "Concurrently mark every stored item as processed")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create sample items in a store
    Seed {
        /// JSON store file (in-memory store when omitted)
        #[arg(short, long)]
        store: Option<PathBuf>,

        /// Number of items to create
        #[arg(short, long, default_value = "10")]
        count: usize,

        /// Initial status of the created items
        #[arg(long, default_value = "NEW")]
        status: String,
    },

    /// Print every item in a store as JSON
    List {
        /// JSON store file (in-memory store when omitted)
        #[arg(short, long)]
        store: Option<PathBuf>,
    },

    /// Process every item and print the batch report
    Process {
        /// JSON store file (in-memory store when omitted)
        #[arg(short, long)]
        store: Option<PathBuf>,

        /// Number of concurrent workers
        #[arg(short, long)]
        workers: Option<usize>,

        /// Stop starting new items after this many milliseconds
        #[arg(short, long)]
        deadline_ms: Option<u64>,

        /// Configuration preset (default, high_performance, testing)
        #[arg(short = 'p', long)]
        preset: Option<String>,
    },
}
