pub mod report;

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Command-line arguments for osteocat
#[derive(Parser, Debug)]
#[command(name = "osteocat")]
#[command(about = "Bone-metabolism lab panel classification tool")]
#[command(version)]
pub struct Cli {
    /// Path to a JSON evaluation request ("-" reads stdin)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Print the summarization prompt for the request instead of the report
    #[arg(long)]
    pub prompt: bool,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Whether the request should be read from stdin
    pub fn reads_stdin(&self) -> bool {
        self.file.as_os_str() == "-"
    }
}

/// Output format options
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    Text,
    /// JSON evaluation envelope
    Json,
}
