use clap::Args;
use std::path::{Path, PathBuf};

use crate::orchestrator::OutputMode;

/// Flags shared by both front-ends.
#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Number of items to analyze
    #[arg(long, default_value_t = 50)]
    pub limit: usize,

    /// Where to write results
    #[arg(long, value_enum, default_value_t = OutputMode::Console)]
    pub output: OutputMode,

    /// Output CSV path if --output=csv
    #[arg(long)]
    pub csv_path: Option<PathBuf>,

    /// .env file to load credentials from (default: ./.env when present)
    #[arg(long)]
    pub env_file: Option<PathBuf>,
}

impl CommonArgs {
    pub fn csv_path_or<'a>(&'a self, default: &'a str) -> &'a Path {
        self.csv_path.as_deref().unwrap_or(Path::new(default))
    }
}

/// Logs go to stderr; stdout carries only the report.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();
}
